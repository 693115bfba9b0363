//! Blocked date repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::BlockedDate;
use crate::domain::DomainResult;

#[async_trait]
pub trait BlockedDateRepository: Send + Sync {
    /// Block a day; fails with `Conflict` if it is already blocked
    async fn add(&self, blocked: BlockedDate) -> DomainResult<BlockedDate>;

    /// Unblock a day; returns whether a row was removed
    async fn remove(&self, property_id: i32, date: NaiveDate) -> DomainResult<bool>;

    /// All blocked days of a property in date order
    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<BlockedDate>>;

    /// Blocked days within `[from, until)`
    async fn find_in_range(
        &self,
        property_id: i32,
        from: NaiveDate,
        until: NaiveDate,
    ) -> DomainResult<Vec<BlockedDate>>;
}
