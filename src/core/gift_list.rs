//! Gift lists - the shared wishlist that acts as an event's gift pool.
//!
//! All functions are generic over the connection so they can run inside the
//! transaction of the operation that needs them.

use crate::{
    entities::{ListCollaborator, Wishlist, list_collaborator, wishlist},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Creates a shared list owned by `owner_id`.
pub async fn create_shared_list<C>(db: &C, owner_id: i64, name: &str) -> Result<wishlist::Model>
where
    C: ConnectionTrait,
{
    let list = wishlist::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        is_shared: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    debug!(list_id = list.id, "Shared gift list created");
    Ok(list)
}

/// Grants `user_id` edit access to the list. Granting twice is a no-op.
pub async fn grant_edit_access<C>(db: &C, list_id: i64, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = ListCollaborator::find()
        .filter(list_collaborator::Column::ListId.eq(list_id))
        .filter(list_collaborator::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match existing {
        Some(grant) if grant.can_edit => {}
        Some(grant) => {
            let mut active: list_collaborator::ActiveModel = grant.into();
            active.can_edit = Set(true);
            active.update(db).await?;
        }
        None => {
            list_collaborator::ActiveModel {
                list_id: Set(list_id),
                user_id: Set(user_id),
                can_edit: Set(true),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// Removes any access `user_id` has to the list.
pub async fn revoke_access<C>(db: &C, list_id: i64, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    ListCollaborator::delete_many()
        .filter(list_collaborator::Column::ListId.eq(list_id))
        .filter(list_collaborator::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Deletes the list together with all collaborator grants.
pub async fn dispose_list<C>(db: &C, list_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    ListCollaborator::delete_many()
        .filter(list_collaborator::Column::ListId.eq(list_id))
        .exec(db)
        .await?;
    Wishlist::delete_by_id(list_id).exec(db).await?;
    debug!(list_id, "Gift list disposed");
    Ok(())
}

/// Returns the ids of users with edit access, ascending.
pub async fn collaborator_ids<C>(db: &C, list_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let mut ids: Vec<i64> = ListCollaborator::find()
        .filter(list_collaborator::Column::ListId.eq(list_id))
        .filter(list_collaborator::Column::CanEdit.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|grant| grant.user_id)
        .collect();
    ids.sort_unstable();
    Ok(ids)
}
