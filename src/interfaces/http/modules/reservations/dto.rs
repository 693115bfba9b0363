//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::reservation::Cancellation;
use crate::domain::Reservation;
use crate::interfaces::http::modules::properties::CostBreakdownResponse;

/// Request to book a stay
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    pub property_id: i32,
    #[validate(length(min = 1, max = 100, message = "guest_id is required"))]
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "at least one guest"))]
    pub guest_count: u32,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

/// Request to cancel a reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelReservationRequest {
    /// guest_request, host_cancelled, payment_failed, policy_violation, emergency
    pub reason: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CancellationResponse {
    pub cancelled_at: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub refund_amount: Decimal,
}

impl From<Cancellation> for CancellationResponse {
    fn from(c: Cancellation) -> Self {
        Self {
            cancelled_at: c.cancelled_at,
            reason: c.reason.to_string(),
            notes: c.notes,
            refund_amount: c.refund_amount,
        }
    }
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i32,
    /// Public reference, `BK` + 8 digits
    pub booking_id: String,
    pub property_id: i32,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guest_count: u32,
    pub special_requests: Option<String>,
    /// pending, confirmed, checked_in, checked_out, cancelled, completed
    pub status: String,
    pub cost: CostBreakdownResponse,
    pub confirmation_code: Option<String>,
    pub cancellation: Option<CancellationResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            booking_id: r.booking_id,
            property_id: r.property_id,
            guest_id: r.guest_id,
            check_in: r.check_in,
            check_out: r.check_out,
            nights: r.nights,
            guest_count: r.guest_count,
            special_requests: r.special_requests,
            status: r.status.to_string(),
            cost: r.cost.into(),
            confirmation_code: r.confirmation_code,
            cancellation: r.cancellation.map(Into::into),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Reservation list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationListQuery {
    pub property_id: Option<i32>,
    pub guest_id: Option<String>,
    pub status: Option<String>,
}

/// What a cancellation right now would refund
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefundPreviewResponse {
    pub reservation_id: i32,
    pub booking_id: String,
    pub status: String,
    pub total: Decimal,
    pub refund_amount: Decimal,
    /// Whole days until check-in; negative once the stay has begun
    pub days_until_check_in: i64,
}
