//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub booking_id: String,

    pub property_id: i32,
    pub guest_id: String,

    /// Stored as `YYYY-MM-DD` text on SQLite
    pub check_in_date: Date,
    pub check_out_date: Date,
    pub nights: i32,
    pub guest_count: i32,

    #[sea_orm(nullable)]
    pub special_requests: Option<String>,

    /// Cost breakdown in minor units (cents)
    pub accommodation_cost: i64,
    pub cleaning_fee: i64,
    pub service_fee: i64,
    pub taxes: i64,
    pub total_amount: i64,

    /// pending, confirmed, checked_in, checked_out, cancelled, completed
    pub status: String,

    #[sea_orm(nullable)]
    pub confirmation_code: Option<String>,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub cancellation_reason: Option<String>,
    #[sea_orm(nullable)]
    pub cancellation_notes: Option<String>,
    #[sea_orm(nullable)]
    pub refund_amount: Option<i64>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
