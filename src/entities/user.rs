//! User entity - The local profile behind an identity-provider subject.
//!
//! Authentication happens upstream; the service only maps the verified subject
//! onto a row here. `display_name` and `avatar_url` are the public profile fields
//! shown to other participants.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque subject issued by the identity provider
    #[sea_orm(unique)]
    pub auth_subject: String,
    /// Name shown to friends and fellow participants
    pub display_name: String,
    /// Optional profile picture
    pub avatar_url: Option<String>,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// Other tables point at users; a user has no outgoing relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
