//! Shared HTTP pieces: response envelope, pagination, error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{AvailabilityError, DomainError};

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Result type for handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// HTTP status for a domain failure
pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) | DomainError::AdvanceNoticeViolation { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::Availability(a) => match a {
            AvailabilityError::Unavailable { .. } => StatusCode::CONFLICT,
            AvailabilityError::InvalidRange { .. }
            | AvailabilityError::StayLengthViolation { .. }
            | AvailabilityError::CapacityViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        },
        DomainError::Conflict(_)
        | DomainError::DatesBlocked { .. }
        | DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error to the `(status, envelope)` pair handlers return.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        error!(error = %e, "Request failed");
        return (status, Json(ApiResponse::error("Internal storage error")));
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

/// 400 for bodies that never reached validation.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// Pagination parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number starting at 1. Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// A page of items plus paging metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Slice an already filtered, ordered list into the requested page.
    pub fn paginate(all: Vec<T>, params: &PaginationParams) -> Self {
        let limit = params.limit.clamp(1, 100);
        let page = params.page.max(1);
        let total = all.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let skip = ((page - 1) as usize).saturating_mul(limit as usize);
        let items = all.into_iter().skip(skip).take(limit as usize).collect();
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn availability_errors_split_between_422_and_409() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let unavailable = DomainError::from(AvailabilityError::Unavailable {
            check_in: d,
            check_out: d,
            conflicting_reservation_id: None,
        });
        assert_eq!(status_for(&unavailable), StatusCode::CONFLICT);

        let capacity = DomainError::from(AvailabilityError::CapacityViolation {
            requested: 5,
            max_guests: 4,
        });
        assert_eq!(status_for(&capacity), StatusCode::UNPROCESSABLE_ENTITY);

        let notice = DomainError::AdvanceNoticeViolation {
            required_days: 2,
            actual_days: 0,
        };
        assert_eq!(status_for(&notice), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_errors_hide_details() {
        let (status, Json(body)) = domain_error(DomainError::Storage("disk I/O error".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.unwrap().contains("disk"));
    }

    #[test]
    fn pagination_slices_and_counts() {
        let page = PaginatedResponse::paginate(
            (1..=7).collect::<Vec<_>>(),
            &PaginationParams { page: 2, limit: 3 },
        );
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let past_end = PaginatedResponse::paginate(vec![1, 2], &PaginationParams { page: 5, limit: 10 });
        assert!(past_end.items.is_empty());
    }
}
