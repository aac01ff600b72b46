//! Event entity - One Secret Santa gift exchange.
//!
//! An event is owned by its organizer, points at a dedicated shared wishlist used
//! as the gift pool, and moves through [`EventStatus`] in one direction only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an exchange event.
///
/// The declaration order is the lifecycle order; see `core::lifecycle` for the
/// allowed transitions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Roster open, no assignments yet
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Names drawn, nobody has looked yet
    #[sea_orm(string_value = "DRAWN")]
    Drawn,
    /// At least one participant revealed their assignment
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Closed by the organizer
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Drawn => "DRAWN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        };
        f.write_str(label)
    }
}

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who created the event and manages its roster
    pub organizer_id: i64,
    /// Dedicated shared wishlist acting as the gift pool
    pub list_id: i64,
    /// Human-readable title (e.g., "Office Secret Santa")
    pub title: String,
    /// Day names are drawn; always before `exchange_date`
    pub draw_date: Date,
    /// Day gifts are exchanged
    pub exchange_date: Date,
    /// Optional spending ceiling per gift
    pub budget: Option<f64>,
    /// ISO 4217 currency code for `budget`
    pub currency: String,
    /// Current lifecycle status
    pub status: EventStatus,
    /// When the event was created
    pub created_at: DateTimeUtc,
    /// When the event was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The organizer
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Organizer,
    /// The gift pool list
    #[sea_orm(
        belongs_to = "super::wishlist::Entity",
        from = "Column::ListId",
        to = "super::wishlist::Column::Id"
    )]
    Wishlist,
    /// One event has many participants
    #[sea_orm(has_many = "super::participant::Entity")]
    Participants,
    /// One event has many assignments once drawn
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
