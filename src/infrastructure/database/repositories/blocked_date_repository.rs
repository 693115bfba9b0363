//! SeaORM implementation of BlockedDateRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::{corrupt, db_err};
use crate::domain::blocked_date::{BlockReason, BlockedDate, BlockedDateRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::blocked_date;

pub struct SeaOrmBlockedDateRepository {
    db: DatabaseConnection,
}

impl SeaOrmBlockedDateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: blocked_date::Model) -> DomainResult<BlockedDate> {
    Ok(BlockedDate {
        id: m.id,
        property_id: m.property_id,
        date: m.date,
        reason: BlockReason::parse(&m.reason)
            .ok_or_else(|| corrupt("blocked_date", "reason", &m.reason))?,
        created_at: m.created_at,
    })
}

/// Blocked days of a property within `[from, until)`, usable inside a
/// transaction.
pub(crate) async fn blocked_in_range<C: ConnectionTrait>(
    conn: &C,
    property_id: i32,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<blocked_date::Model>, DbErr> {
    blocked_date::Entity::find()
        .filter(blocked_date::Column::PropertyId.eq(property_id))
        .filter(blocked_date::Column::Date.gte(from))
        .filter(blocked_date::Column::Date.lt(until))
        .order_by_asc(blocked_date::Column::Date)
        .all(conn)
        .await
}

#[async_trait]
impl BlockedDateRepository for SeaOrmBlockedDateRepository {
    async fn add(&self, b: BlockedDate) -> DomainResult<BlockedDate> {
        debug!(property_id = b.property_id, date = %b.date, "Blocking date");

        let existing = blocked_date::Entity::find()
            .filter(blocked_date::Column::PropertyId.eq(b.property_id))
            .filter(blocked_date::Column::Date.eq(b.date))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "{} is already blocked for property {}",
                b.date, b.property_id
            )));
        }

        let model = blocked_date::ActiveModel {
            id: NotSet,
            property_id: Set(b.property_id),
            date: Set(b.date),
            reason: Set(b.reason.as_str().to_string()),
            created_at: Set(b.created_at),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn remove(&self, property_id: i32, date: NaiveDate) -> DomainResult<bool> {
        let result = blocked_date::Entity::delete_many()
            .filter(blocked_date::Column::PropertyId.eq(property_id))
            .filter(blocked_date::Column::Date.eq(date))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<BlockedDate>> {
        let models = blocked_date::Entity::find()
            .filter(blocked_date::Column::PropertyId.eq(property_id))
            .order_by_asc(blocked_date::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_in_range(
        &self,
        property_id: i32,
        from: NaiveDate,
        until: NaiveDate,
    ) -> DomainResult<Vec<BlockedDate>> {
        let models = blocked_in_range(&self.db, property_id, from, until)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::testing::{date, property};
    use crate::domain::property::PropertyRepository;
    use crate::infrastructure::database::repositories::SeaOrmPropertyRepository;
    use crate::infrastructure::database::test_database;

    async fn setup() -> (SeaOrmBlockedDateRepository, i32) {
        let db = test_database().await;
        let p = SeaOrmPropertyRepository::new(db.clone())
            .save(property())
            .await
            .unwrap();
        (SeaOrmBlockedDateRepository::new(db), p.id)
    }

    #[tokio::test]
    async fn add_list_and_remove() {
        let (repo, pid) = setup().await;
        repo.add(BlockedDate::new(pid, date("2024-06-03"), BlockReason::Maintenance))
            .await
            .unwrap();
        repo.add(BlockedDate::new(pid, date("2024-06-01"), BlockReason::PersonalUse))
            .await
            .unwrap();

        let listed = repo.list_for_property(pid).await.unwrap();
        let days: Vec<_> = listed.iter().map(|b| b.date).collect();
        assert_eq!(days, vec![date("2024-06-01"), date("2024-06-03")]);
        assert_eq!(listed[1].reason, BlockReason::Maintenance);

        assert!(repo.remove(pid, date("2024-06-01")).await.unwrap());
        assert!(!repo.remove(pid, date("2024-06-01")).await.unwrap());
        assert_eq!(repo.list_for_property(pid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_day_is_a_conflict() {
        let (repo, pid) = setup().await;
        let day = date("2024-06-03");
        repo.add(BlockedDate::new(pid, day, BlockReason::HostBlocked))
            .await
            .unwrap();
        let err = repo
            .add(BlockedDate::new(pid, day, BlockReason::Maintenance))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn range_is_half_open() {
        let (repo, pid) = setup().await;
        for d in ["2024-06-01", "2024-06-04", "2024-06-05"] {
            repo.add(BlockedDate::new(pid, date(d), BlockReason::HostBlocked))
                .await
                .unwrap();
        }
        let hits = repo
            .find_in_range(pid, date("2024-06-01"), date("2024-06-05"))
            .await
            .unwrap();
        let days: Vec<_> = hits.iter().map(|b| b.date).collect();
        assert_eq!(days, vec![date("2024-06-01"), date("2024-06-04")]);
    }
}
