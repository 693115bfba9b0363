//! Property (listing) domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// What part of the place the guest gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    EntirePlace,
    PrivateRoom,
    SharedRoom,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntirePlace => "entire_place",
            Self::PrivateRoom => "private_room",
            Self::SharedRoom => "shared_room",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entire_place" => Some(Self::EntirePlace),
            "private_room" => Some(Self::PrivateRoom),
            "shared_room" => Some(Self::SharedRoom),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyStatus {
    Active,
    Inactive,
    /// Awaiting approval
    #[default]
    Pending,
    Suspended,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "pending" => Some(Self::Pending),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable accommodation listed by a host.
///
/// Money fields carry two decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: i32,
    /// Host identity as issued by the surrounding account system
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    /// State, province or region; may be empty
    pub state: String,
    pub country: String,
    pub property_type: PropertyType,
    pub nightly_rate: Decimal,
    pub cleaning_fee: Decimal,
    /// Held against damage; never part of the stay cost
    pub security_deposit: Decimal,
    pub min_nights: u32,
    pub max_nights: u32,
    pub max_guests: u32,
    /// Minimum whole days between booking day and check-in
    pub advance_booking_days: u32,
    pub status: PropertyStatus,
    /// Host toggle, independent of `status`
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub const DEFAULT_MIN_NIGHTS: u32 = 1;
    pub const DEFAULT_MAX_NIGHTS: u32 = 365;
    pub const DEFAULT_ADVANCE_BOOKING_DAYS: u32 = 1;
    /// Ceiling for every money field (1,000,000.00)
    pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);
    /// Ceiling for `max_nights`; with `MAX_MONEY_AMOUNT` keeps any stay total
    /// inside stored minor units
    pub const MAX_STAY_NIGHTS: u32 = 3650;

    /// Whether the listing currently accepts quotes and bookings
    pub fn is_bookable(&self) -> bool {
        self.status == PropertyStatus::Active && self.is_available
    }

    /// Check the listing's own limits for consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.nightly_rate <= Decimal::ZERO {
            return Err("nightly_rate must be positive".into());
        }
        if self.cleaning_fee < Decimal::ZERO || self.security_deposit < Decimal::ZERO {
            return Err("fees must not be negative".into());
        }
        for (field, amount) in [
            ("nightly_rate", self.nightly_rate),
            ("cleaning_fee", self.cleaning_fee),
            ("security_deposit", self.security_deposit),
        ] {
            if amount > Self::MAX_MONEY_AMOUNT {
                return Err(format!(
                    "{field} must not exceed {}",
                    Self::MAX_MONEY_AMOUNT
                ));
            }
        }
        if self.max_nights > Self::MAX_STAY_NIGHTS {
            return Err(format!(
                "max_nights must not exceed {}",
                Self::MAX_STAY_NIGHTS
            ));
        }
        if self.min_nights == 0 {
            return Err("min_nights must be at least 1".into());
        }
        if self.min_nights > self.max_nights {
            return Err(format!(
                "min_nights ({}) exceeds max_nights ({})",
                self.min_nights, self.max_nights
            ));
        }
        if self.max_guests == 0 {
            return Err("max_guests must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::testing::property;

    #[test]
    fn bookable_needs_active_and_available() {
        let mut p = property();
        assert!(p.is_bookable());

        p.is_available = false;
        assert!(!p.is_bookable());

        p.is_available = true;
        p.status = PropertyStatus::Suspended;
        assert!(!p.is_bookable());
    }

    #[test]
    fn validate_rejects_inverted_night_limits() {
        let mut p = property();
        p.min_nights = 10;
        p.max_nights = 5;
        assert!(p.validate().unwrap_err().contains("exceeds"));
    }

    #[test]
    fn validate_rejects_free_nights() {
        let mut p = property();
        p.nightly_rate = Decimal::ZERO;
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_caps_money_and_stay_length() {
        let mut p = property();
        p.nightly_rate = "79228162514264337593543950335".parse().unwrap();
        assert!(p.validate().unwrap_err().contains("nightly_rate"));

        let mut p = property();
        p.security_deposit = Property::MAX_MONEY_AMOUNT + Decimal::new(1, 2);
        assert!(p.validate().unwrap_err().contains("security_deposit"));

        let mut p = property();
        p.nightly_rate = Property::MAX_MONEY_AMOUNT;
        p.max_nights = Property::MAX_STAY_NIGHTS;
        assert!(p.validate().is_ok());

        p.max_nights = Property::MAX_STAY_NIGHTS + 1;
        assert!(p.validate().unwrap_err().contains("max_nights"));
    }

    #[test]
    fn enum_strings_roundtrip() {
        for t in [
            PropertyType::EntirePlace,
            PropertyType::PrivateRoom,
            PropertyType::SharedRoom,
        ] {
            assert_eq!(PropertyType::parse(t.as_str()), Some(t));
        }
        for s in [
            PropertyStatus::Active,
            PropertyStatus::Inactive,
            PropertyStatus::Pending,
            PropertyStatus::Suspended,
        ] {
            assert_eq!(PropertyStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(PropertyStatus::parse("archived"), None);
    }
}
