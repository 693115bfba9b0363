//! SeaORM implementation of PropertyRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{cents, column_int, count, corrupt, db_err};
use crate::domain::availability::from_minor_units;
use crate::domain::property::{
    Property, PropertyFilter, PropertyRepository, PropertyStatus, PropertyType,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{blocked_date, property, reservation};

pub struct SeaOrmPropertyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPropertyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: property::Model) -> DomainResult<Property> {
    Ok(Property {
        id: m.id,
        property_type: PropertyType::parse(&m.property_type)
            .ok_or_else(|| corrupt("property", "property_type", &m.property_type))?,
        status: PropertyStatus::parse(&m.status)
            .ok_or_else(|| corrupt("property", "status", &m.status))?,
        host_id: m.host_id,
        title: m.title,
        description: m.description,
        city: m.city,
        state: m.state,
        country: m.country,
        nightly_rate: from_minor_units(m.nightly_rate),
        cleaning_fee: from_minor_units(m.cleaning_fee),
        security_deposit: from_minor_units(m.security_deposit),
        min_nights: count(m.min_nights, "property", "min_nights")?,
        max_nights: count(m.max_nights, "property", "max_nights")?,
        max_guests: count(m.max_guests, "property", "max_guests")?,
        advance_booking_days: count(m.advance_booking_days, "property", "advance_booking_days")?,
        is_available: m.is_available,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(p: &Property) -> DomainResult<property::ActiveModel> {
    Ok(property::ActiveModel {
        id: if p.id == 0 { NotSet } else { Set(p.id) },
        host_id: Set(p.host_id.clone()),
        title: Set(p.title.clone()),
        description: Set(p.description.clone()),
        city: Set(p.city.clone()),
        state: Set(p.state.clone()),
        country: Set(p.country.clone()),
        property_type: Set(p.property_type.as_str().to_string()),
        nightly_rate: Set(cents(p.nightly_rate, "nightly_rate")?),
        cleaning_fee: Set(cents(p.cleaning_fee, "cleaning_fee")?),
        security_deposit: Set(cents(p.security_deposit, "security_deposit")?),
        min_nights: Set(column_int(p.min_nights, "min_nights")?),
        max_nights: Set(column_int(p.max_nights, "max_nights")?),
        max_guests: Set(column_int(p.max_guests, "max_guests")?),
        advance_booking_days: Set(column_int(p.advance_booking_days, "advance_booking_days")?),
        status: Set(p.status.as_str().to_string()),
        is_available: Set(p.is_available),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    })
}

/// Escape `LIKE` wildcards so user text matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ── PropertyRepository impl ─────────────────────────────────────

#[async_trait]
impl PropertyRepository for SeaOrmPropertyRepository {
    async fn save(&self, p: Property) -> DomainResult<Property> {
        debug!(title = %p.title, host_id = %p.host_id, "Saving property");

        let mut model = domain_to_active(&p)?;
        model.id = NotSet;
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Property>> {
        let model = property::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, p: Property) -> DomainResult<Property> {
        debug!(property_id = p.id, "Updating property");

        let existing = property::Entity::find_by_id(p.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::not_found("Property", "id", p.id));
        }

        let updated = domain_to_active(&p)?
            .update(&self.db)
            .await
            .map_err(db_err)?;
        model_to_domain(updated)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!(property_id = id, "Deleting property");

        let txn = self.db.begin().await.map_err(db_err)?;

        reservation::Entity::delete_many()
            .filter(reservation::Column::PropertyId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        blocked_date::Entity::delete_many()
            .filter(blocked_date::Column::PropertyId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = property::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Property", "id", id));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_all(&self, filter: &PropertyFilter) -> DomainResult<Vec<Property>> {
        let mut query = property::Entity::find();

        if let Some(location) = &filter.location {
            let pattern = format!("%{}%", escape_like(&location.to_lowercase()));
            let lower_like = |col: property::Column| {
                Expr::expr(Func::lower(Expr::col(col)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            query = query.filter(
                Condition::any()
                    .add(lower_like(property::Column::City))
                    .add(lower_like(property::Column::State))
                    .add(lower_like(property::Column::Country)),
            );
        }
        if let Some(city) = &filter.city {
            query = query.filter(property::Column::City.eq(city.as_str()));
        }
        if let Some(host_id) = &filter.host_id {
            query = query.filter(property::Column::HostId.eq(host_id.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(property::Column::NightlyRate.gte(cents(min, "min_price")?));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(property::Column::NightlyRate.lte(cents(max, "max_price")?));
        }
        if let Some(guests) = filter.num_guests {
            query = query.filter(property::Column::MaxGuests.gte(column_int(guests, "num_guests")?));
        }
        if filter.bookable_only {
            query = query
                .filter(property::Column::Status.eq(PropertyStatus::Active.as_str()))
                .filter(property::Column::IsAvailable.eq(true));
        }

        let models = query
            .order_by_desc(property::Column::CreatedAt)
            .order_by_desc(property::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────
