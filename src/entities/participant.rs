//! Participant entity - One user's membership in one exchange event.
//!
//! Unique per (`event_id`, `user_id`). The organizer's own row is created already
//! accepted; everyone else starts out invited.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invitation state of a participant
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    /// Invited, no answer yet
    #[sea_orm(string_value = "INVITED")]
    Invited,
    /// Joined the exchange
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    /// Turned the invitation down
    #[sea_orm(string_value = "DECLINED")]
    Declined,
}

/// Participant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The event this membership belongs to
    pub event_id: i64,
    /// The participating user
    pub user_id: i64,
    /// Invitation state
    pub status: ParticipantStatus,
    /// When the user was (last) invited
    pub invited_at: DateTimeUtc,
    /// When the user accepted or declined
    pub responded_at: Option<DateTimeUtc>,
}

/// Defines relationships between Participant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each participant belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    /// Each participant is one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
