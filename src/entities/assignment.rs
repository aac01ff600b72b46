//! Assignment entity - One giver → receiver pairing produced by the draw.
//!
//! For a drawn event the rows form a derangement of the accepted participants:
//! unique per (`event_id`, `giver_id`) and per (`event_id`, `receiver_id`), and
//! never `giver_id == receiver_id`. Only `revealed` changes after insertion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The event this pairing belongs to
    pub event_id: i64,
    /// User who buys the gift
    pub giver_id: i64,
    /// User who receives the gift
    pub receiver_id: i64,
    /// Whether the giver has chosen to see the receiver
    pub revealed: bool,
    /// When the giver revealed the receiver
    pub revealed_at: Option<DateTimeUtc>,
    /// When the names were drawn
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Assignment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    /// The giving user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::GiverId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Giver,
    /// The receiving user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReceiverId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
