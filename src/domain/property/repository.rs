//! Property repository interface

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::Property;
use crate::domain::DomainResult;

/// Listing filters; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Case-insensitive substring of city, state or country
    pub location: Option<String>,
    /// Exact city
    pub city: Option<String>,
    pub host_id: Option<String>,
    /// Nightly rate bounds, both inclusive
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Minimum guest capacity
    pub num_guests: Option<u32>,
    /// Only listings that currently accept bookings
    pub bookable_only: bool,
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Insert a new property; the returned copy carries the assigned ID
    async fn save(&self, property: Property) -> DomainResult<Property>;

    /// Find property by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Property>>;

    /// Replace an existing property
    async fn update(&self, property: Property) -> DomainResult<Property>;

    /// Delete a property together with its reservations and blocked dates
    async fn delete(&self, id: i32) -> DomainResult<()>;

    /// List properties matching `filter`, newest first
    async fn find_all(&self, filter: &PropertyFilter) -> DomainResult<Vec<Property>>;
}
