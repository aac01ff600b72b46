//! Friendship entity - One directed friend request between two users.
//!
//! A single row covers both directions: once `status` is `Accepted` the pair is
//! mutual friends regardless of who sent the request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// State of a friend request
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// Sent, not yet answered
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Both sides agreed
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
}

/// Friendship database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendships")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who sent the request
    pub requester_id: i64,
    /// User who received the request
    pub addressee_id: i64,
    /// Request state
    pub status: FriendshipStatus,
    /// When the request was sent
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Sender of the request
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Requester,
    /// Receiver of the request
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AddresseeId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Addressee,
}

impl ActiveModelBehavior for ActiveModel {}
