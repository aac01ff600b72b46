//! Notification entity - In-app inbox entry for a user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipient
    pub user_id: i64,
    /// Type tag, e.g. `"secret_santa_invite"`
    pub kind: String,
    /// Short headline
    pub title: String,
    /// Message text
    pub body: String,
    /// Structured data for the client (event id, etc.)
    pub payload: Json,
    /// Whether the user has seen it
    pub is_read: bool,
    /// When it was sent
    pub created_at: DateTimeUtc,
}

/// Each notification belongs to one user
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Recipient
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
