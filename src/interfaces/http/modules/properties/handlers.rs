//! Property REST API handlers: listings, quotes and blocked dates

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};

use super::dto::{
    BlockDateRequest, BlockedDateResponse, CreatePropertyRequest, PropertyListQuery,
    PropertyResponse, QuoteRequest, QuoteResponse, UpdatePropertyRequest,
};
use crate::application::BookingService;
use crate::domain::availability::StayRequest;
use crate::domain::property::PropertyFilter;
use crate::domain::{
    AvailabilityError, BlockReason, BlockedDate, DomainError, Property, PropertyStatus,
    PropertyType, RepositoryProvider,
};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, PaginationParams,
    ValidatedJson,
};

/// State for property routes
#[derive(Clone)]
pub struct PropertyState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub booking: Arc<BookingService>,
}

fn invalid(message: String) -> ApiError {
    domain_error(DomainError::Validation(message))
}

fn parse_property_type(s: &str) -> Result<PropertyType, ApiError> {
    PropertyType::parse(s).ok_or_else(|| invalid(format!("unknown property_type '{s}'")))
}

fn parse_status(s: &str) -> Result<PropertyStatus, ApiError> {
    PropertyStatus::parse(s).ok_or_else(|| invalid(format!("unknown status '{s}'")))
}

async fn load(state: &PropertyState, id: i32) -> Result<Property, ApiError> {
    state
        .repos
        .properties()
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or_else(|| domain_error(DomainError::not_found("Property", "id", id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "Properties",
    params(PropertyListQuery, PaginationParams),
    responses(
        (status = 200, description = "Property list", body = ApiResponse<PaginatedResponse<PropertyResponse>>),
        (status = 422, description = "Price range is inverted")
    )
)]
pub async fn list_properties(
    State(state): State<PropertyState>,
    Query(query): Query<PropertyListQuery>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<PropertyResponse>> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(invalid(format!("min_price ({min}) exceeds max_price ({max})")));
        }
    }

    let filter = PropertyFilter {
        location: query.location.filter(|l| !l.trim().is_empty()),
        city: query.city,
        host_id: query.host_id,
        min_price: query.min_price,
        max_price: query.max_price,
        num_guests: query.num_guests,
        bookable_only: query.bookable_only.unwrap_or(false),
    };
    let properties = state
        .repos
        .properties()
        .find_all(&filter)
        .await
        .map_err(domain_error)?;

    let items: Vec<PropertyResponse> = properties.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::paginate(items, &page))))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property details", body = ApiResponse<PropertyResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_property(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
) -> ApiResult<PropertyResponse> {
    let property = load(&state, id).await?;
    Ok(Json(ApiResponse::success(property.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "Properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<PropertyResponse>),
        (status = 422, description = "Invalid listing")
    )
)]
pub async fn create_property(
    State(state): State<PropertyState>,
    ValidatedJson(req): ValidatedJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyResponse>>), ApiError> {
    let now = Utc::now();

    let property = Property {
        id: 0,
        host_id: req.host_id,
        title: req.title,
        description: req.description.unwrap_or_default(),
        city: req.city,
        state: req.state.unwrap_or_default(),
        country: req.country,
        property_type: match req.property_type.as_deref() {
            Some(t) => parse_property_type(t)?,
            None => PropertyType::EntirePlace,
        },
        nightly_rate: req.nightly_rate,
        cleaning_fee: req.cleaning_fee.unwrap_or_default(),
        security_deposit: req.security_deposit.unwrap_or_default(),
        min_nights: req.min_nights.unwrap_or(Property::DEFAULT_MIN_NIGHTS),
        max_nights: req.max_nights.unwrap_or(Property::DEFAULT_MAX_NIGHTS),
        max_guests: req.max_guests,
        advance_booking_days: req
            .advance_booking_days
            .unwrap_or(Property::DEFAULT_ADVANCE_BOOKING_DAYS),
        status: match req.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => PropertyStatus::default(),
        },
        is_available: req.is_available.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };
    property.validate().map_err(invalid)?;

    let saved = state
        .repos
        .properties()
        .save(property)
        .await
        .map_err(domain_error)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property ID")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<PropertyResponse>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Invalid listing")
    )
)]
pub async fn update_property(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdatePropertyRequest>,
) -> ApiResult<PropertyResponse> {
    let mut p = load(&state, id).await?;

    if let Some(v) = req.title {
        p.title = v;
    }
    if let Some(v) = req.description {
        p.description = v;
    }
    if let Some(v) = req.city {
        p.city = v;
    }
    if let Some(v) = req.state {
        p.state = v;
    }
    if let Some(v) = req.country {
        p.country = v;
    }
    if let Some(v) = req.property_type.as_deref() {
        p.property_type = parse_property_type(v)?;
    }
    if let Some(v) = req.nightly_rate {
        p.nightly_rate = v;
    }
    if let Some(v) = req.cleaning_fee {
        p.cleaning_fee = v;
    }
    if let Some(v) = req.security_deposit {
        p.security_deposit = v;
    }
    if let Some(v) = req.min_nights {
        p.min_nights = v;
    }
    if let Some(v) = req.max_nights {
        p.max_nights = v;
    }
    if let Some(v) = req.max_guests {
        p.max_guests = v;
    }
    if let Some(v) = req.advance_booking_days {
        p.advance_booking_days = v;
    }
    if let Some(v) = req.status.as_deref() {
        p.status = parse_status(v)?;
    }
    if let Some(v) = req.is_available {
        p.is_available = v;
    }
    p.updated_at = Utc::now();
    p.validate().map_err(invalid)?;

    let updated = state
        .repos
        .properties()
        .update(p)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_property(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
) -> ApiResult<String> {
    state
        .repos
        .properties()
        .delete(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(format!("Property {id} deleted"))))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/quote",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property ID")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote, or unavailable with a reason", body = ApiResponse<QuoteResponse>),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Property not accepting bookings"),
        (status = 422, description = "Invalid stay")
    )
)]
pub async fn quote(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> ApiResult<QuoteResponse> {
    let stay = StayRequest::new(req.check_in, req.check_out, req.guest_count);
    let mut response = QuoteResponse {
        property_id: id,
        check_in: req.check_in,
        check_out: req.check_out,
        guest_count: req.guest_count,
        available: false,
        nights: None,
        cost: None,
        reason: None,
    };

    match state.booking.quote(id, stay, Utc::now().date_naive()).await {
        Ok(q) => {
            response.available = true;
            response.nights = Some(q.nights);
            response.cost = Some(q.cost.into());
        }
        Err(
            e @ (DomainError::Availability(AvailabilityError::Unavailable { .. })
            | DomainError::DatesBlocked { .. }),
        ) => {
            response.reason = Some(e.to_string());
        }
        Err(e) => return Err(domain_error(e)),
    }

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/blocked-dates",
    tag = "Blocked Dates",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Blocked dates", body = ApiResponse<Vec<BlockedDateResponse>>),
        (status = 404, description = "Property not found")
    )
)]
pub async fn list_blocked_dates(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<BlockedDateResponse>> {
    load(&state, id).await?;
    let dates = state
        .repos
        .blocked_dates()
        .list_for_property(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        dates.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/blocked-dates",
    tag = "Blocked Dates",
    params(("id" = i32, Path, description = "Property ID")),
    request_body = BlockDateRequest,
    responses(
        (status = 201, description = "Date blocked", body = ApiResponse<BlockedDateResponse>),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Already blocked")
    )
)]
pub async fn add_blocked_date(
    State(state): State<PropertyState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<BlockDateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlockedDateResponse>>), ApiError> {
    load(&state, id).await?;

    let reason = match req.reason.as_deref() {
        Some(r) => BlockReason::parse(r).ok_or_else(|| invalid(format!("unknown reason '{r}'")))?,
        None => BlockReason::default(),
    };

    let saved = state
        .repos
        .blocked_dates()
        .add(BlockedDate::new(id, req.date, reason))
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}/blocked-dates/{date}",
    tag = "Blocked Dates",
    params(
        ("id" = i32, Path, description = "Property ID"),
        ("date" = String, Path, description = "Day to unblock (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Unblocked"),
        (status = 404, description = "Date was not blocked")
    )
)]
pub async fn remove_blocked_date(
    State(state): State<PropertyState>,
    Path((id, date)): Path<(i32, NaiveDate)>,
) -> ApiResult<String> {
    let removed = state
        .repos
        .blocked_dates()
        .remove(id, date)
        .await
        .map_err(domain_error)?;

    if !removed {
        return Err(domain_error(DomainError::not_found(
            "BlockedDate",
            "date",
            date,
        )));
    }
    Ok(Json(ApiResponse::success(format!("{date} unblocked"))))
}
