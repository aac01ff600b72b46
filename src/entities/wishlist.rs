//! Wishlist entity - A gift list owned by a user.
//!
//! Every exchange event gets its own shared wishlist acting as the gift pool;
//! participants are granted edit access through `list_collaborator` rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlists")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the list
    pub owner_id: i64,
    /// Display name of the list
    pub name: String,
    /// Whether collaborators besides the owner may see and edit it
    pub is_shared: bool,
    /// When the list was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owner of the list
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// Users granted access to the list
    #[sea_orm(has_many = "super::list_collaborator::Entity")]
    Collaborators,
}

impl Related<super::list_collaborator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collaborators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
