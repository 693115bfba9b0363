use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::availability::AvailabilityError;
use crate::domain::reservation::ReservationStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Check-in must be at least {required_days} day(s) ahead, got {actual_days}")]
    AdvanceNoticeViolation {
        required_days: u32,
        actual_days: i64,
    },

    #[error("Dates blocked by host: {}", format_dates(.dates))]
    DatesBlocked { dates: Vec<NaiveDate> },

    #[error("Cannot {action} a reservation that is {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }

    /// Short machine-readable label, used for metrics and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Availability(e) => e.kind(),
            Self::AdvanceNoticeViolation { .. } => "advance_notice_violation",
            Self::DatesBlocked { .. } => "dates_blocked",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_transient() {
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(!DomainError::Validation("bad".into()).is_transient());
    }

    #[test]
    fn availability_errors_keep_their_kind() {
        let err: DomainError = AvailabilityError::CapacityViolation {
            requested: 5,
            max_guests: 4,
        }
        .into();
        assert_eq!(err.kind(), "capacity_violation");
        assert_eq!(err.to_string(), "Requested 5 guests, maximum is 4");
    }

    #[test]
    fn blocked_dates_are_listed_in_message() {
        let err = DomainError::DatesBlocked {
            dates: vec![
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Dates blocked by host: 2024-06-02, 2024-06-03"
        );
    }
}
