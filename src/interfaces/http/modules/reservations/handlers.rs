//! Reservation REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    CancelReservationRequest, CreateReservationRequest, RefundPreviewResponse,
    ReservationListQuery, ReservationResponse,
};
use crate::application::{BookingService, CreateBooking};
use crate::domain::reservation::ReservationFilter;
use crate::domain::{CancellationReason, DomainError, DomainResult, Reservation, ReservationStatus};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, PaginationParams,
    ValidatedJson,
};

/// State for reservation routes
#[derive(Clone)]
pub struct ReservationState {
    pub booking: Arc<BookingService>,
}

fn respond(result: DomainResult<Reservation>) -> ApiResult<ReservationResponse> {
    result
        .map(|r| Json(ApiResponse::success(r.into())))
        .map_err(domain_error)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ReservationListQuery, PaginationParams),
    responses(
        (status = 200, description = "Reservations ordered by check-in", body = ApiResponse<PaginatedResponse<ReservationResponse>>),
        (status = 422, description = "Unknown status filter")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationState>,
    Query(query): Query<ReservationListQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<ReservationResponse>> {
    let status = match query.status.as_deref() {
        Some(s) => Some(ReservationStatus::parse(s).ok_or_else(|| {
            domain_error(DomainError::Validation(format!("unknown status '{s}'")))
        })?),
        None => None,
    };

    let filter = ReservationFilter {
        property_id: query.property_id,
        guest_id: query.guest_id,
        status,
    };
    let reservations = state.booking.list(&filter).await.map_err(domain_error)?;

    let items: Vec<ReservationResponse> = reservations.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::paginate(items, &page))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationResponse> {
    respond(state.booking.get(id).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Pending reservation created", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Dates taken or blocked, or property not bookable"),
        (status = 422, description = "Invalid stay")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationState>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationResponse>>), ApiError> {
    let request = CreateBooking {
        property_id: req.property_id,
        guest_id: req.guest_id,
        check_in: req.check_in,
        check_out: req.check_out,
        guest_count: req.guest_count,
        special_requests: req.special_requests,
    };

    let reservation = state
        .booking
        .create_booking(request, Utc::now())
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Confirmed", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Invalid transition or dates taken")
    )
)]
pub async fn confirm_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationResponse> {
    respond(state.booking.confirm(id, Utc::now()).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/check-in",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Checked in", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn check_in_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationResponse> {
    respond(state.booking.check_in(id, Utc::now()).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/check-out",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Checked out", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn check_out_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationResponse> {
    respond(state.booking.check_out(id, Utc::now()).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Completed", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Invalid transition")
    )
)]
pub async fn complete_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationResponse> {
    respond(state.booking.complete(id, Utc::now()).await)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = CancelReservationRequest,
    responses(
        (status = 200, description = "Cancelled; refund recorded", body = ApiResponse<ReservationResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Not cancellable"),
        (status = 422, description = "Unknown reason")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CancelReservationRequest>,
) -> ApiResult<ReservationResponse> {
    let reason = CancellationReason::parse(&req.reason).ok_or_else(|| {
        domain_error(DomainError::Validation(format!(
            "unknown cancellation reason '{}'",
            req.reason
        )))
    })?;

    respond(state.booking.cancel(id, reason, req.notes, Utc::now()).await)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/refund-preview",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Refund if cancelled now", body = ApiResponse<RefundPreviewResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn refund_preview(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<RefundPreviewResponse> {
    let now = Utc::now();
    let reservation = state.booking.get(id).await.map_err(domain_error)?;
    let refund_amount = state
        .booking
        .refund_preview(id, now)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(RefundPreviewResponse {
        reservation_id: reservation.id,
        booking_id: reservation.booking_id,
        status: reservation.status.to_string(),
        total: reservation.cost.total,
        refund_amount,
        days_until_check_in: (reservation.check_in - now.date_naive()).num_days(),
    })))
}
