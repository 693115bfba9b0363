//! Property, quote and blocked-date DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{BlockedDate, CostBreakdown, Property};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    pub id: i32,
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// entire_place, private_room, shared_room
    pub property_type: String,
    pub nightly_rate: Decimal,
    pub cleaning_fee: Decimal,
    pub security_deposit: Decimal,
    pub min_nights: u32,
    pub max_nights: u32,
    pub max_guests: u32,
    pub advance_booking_days: u32,
    /// active, inactive, pending, suspended
    pub status: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            host_id: p.host_id,
            title: p.title,
            description: p.description,
            city: p.city,
            state: p.state,
            country: p.country,
            property_type: p.property_type.to_string(),
            nightly_rate: p.nightly_rate,
            cleaning_fee: p.cleaning_fee,
            security_deposit: p.security_deposit,
            min_nights: p.min_nights,
            max_nights: p.max_nights,
            max_guests: p.max_guests,
            advance_booking_days: p.advance_booking_days,
            status: p.status.to_string(),
            is_available: p.is_available,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, max = 100, message = "host_id is required"))]
    pub host_id: String,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    /// Default: entire_place
    pub property_type: Option<String>,
    pub nightly_rate: Decimal,
    pub cleaning_fee: Option<Decimal>,
    pub security_deposit: Option<Decimal>,
    #[validate(range(min = 1))]
    pub min_nights: Option<u32>,
    #[validate(range(min = 1))]
    pub max_nights: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub max_guests: u32,
    pub advance_booking_days: Option<u32>,
    /// Default: pending
    pub status: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    pub property_type: Option<String>,
    pub nightly_rate: Option<Decimal>,
    pub cleaning_fee: Option<Decimal>,
    pub security_deposit: Option<Decimal>,
    #[validate(range(min = 1))]
    pub min_nights: Option<u32>,
    #[validate(range(min = 1))]
    pub max_nights: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub max_guests: Option<u32>,
    pub advance_booking_days: Option<u32>,
    pub status: Option<String>,
    pub is_available: Option<bool>,
}

/// Property list filters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PropertyListQuery {
    /// Case-insensitive match against city, state or country
    pub location: Option<String>,
    pub city: Option<String>,
    pub host_id: Option<String>,
    /// Lowest nightly rate, inclusive
    pub min_price: Option<Decimal>,
    /// Highest nightly rate, inclusive
    pub max_price: Option<Decimal>,
    /// Listings that sleep at least this many guests
    pub num_guests: Option<u32>,
    /// Only listings that accept bookings right now
    pub bookable_only: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "at least one guest"))]
    pub guest_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdownResponse {
    pub accommodation_cost: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl From<CostBreakdown> for CostBreakdownResponse {
    fn from(c: CostBreakdown) -> Self {
        Self {
            accommodation_cost: c.accommodation_cost,
            cleaning_fee: c.cleaning_fee,
            service_fee: c.service_fee,
            taxes: c.taxes,
            total: c.total,
        }
    }
}

/// Quote result. Taken dates answer `available: false` with a reason
/// rather than an error status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub property_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nights: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostBreakdownResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BlockDateRequest {
    pub date: NaiveDate,
    /// maintenance, personal_use, host_blocked (default)
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockedDateResponse {
    pub id: i32,
    pub property_id: i32,
    pub date: NaiveDate,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<BlockedDate> for BlockedDateResponse {
    fn from(b: BlockedDate) -> Self {
        Self {
            id: b.id,
            property_id: b.property_id,
            date: b.date,
            reason: b.reason.to_string(),
            created_at: b.created_at,
        }
    }
}
