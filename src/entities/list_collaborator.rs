//! List collaborator entity - Grants a user access to someone else's wishlist.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// List collaborator database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "list_collaborators")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The list access is granted on
    pub list_id: i64,
    /// The user receiving access
    pub user_id: i64,
    /// Whether the user may add and edit items
    pub can_edit: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The shared list
    #[sea_orm(
        belongs_to = "super::wishlist::Entity",
        from = "Column::ListId",
        to = "super::wishlist::Column::Id",
        on_delete = "Cascade"
    )]
    Wishlist,
    /// The collaborating user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::wishlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
