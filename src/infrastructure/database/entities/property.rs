//! Property entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub host_id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub country: String,

    /// entire_place, private_room, shared_room
    pub property_type: String,

    /// Money columns hold minor units (cents)
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub security_deposit: i64,

    pub min_nights: i32,
    pub max_nights: i32,
    pub max_guests: i32,
    pub advance_booking_days: i32,

    /// active, inactive, pending, suspended
    pub status: String,
    pub is_available: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservation,
    #[sea_orm(has_many = "super::blocked_date::Entity")]
    BlockedDate,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl Related<super::blocked_date::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlockedDate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
