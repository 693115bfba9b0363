//! Blocked date domain entity

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockReason {
    Maintenance,
    PersonalUse,
    #[default]
    HostBlocked,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::PersonalUse => "personal_use",
            Self::HostBlocked => "host_blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "maintenance" => Some(Self::Maintenance),
            "personal_use" => Some(Self::PersonalUse),
            "host_blocked" => Some(Self::HostBlocked),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single night the host has taken off the calendar.
/// At most one per (property, date).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockedDate {
    pub id: i32,
    pub property_id: i32,
    pub date: NaiveDate,
    pub reason: BlockReason,
    pub created_at: DateTime<Utc>,
}

impl BlockedDate {
    pub fn new(property_id: i32, date: NaiveDate, reason: BlockReason) -> Self {
        Self {
            id: 0,
            property_id,
            date,
            reason,
            created_at: Utc::now(),
        }
    }
}
