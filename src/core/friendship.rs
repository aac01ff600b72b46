//! Friendship oracle - answers "are these two users mutual friends?".
//!
//! Invitations to an exchange are gated on this check. Friend requests are kept
//! deliberately small: sending a request to someone who already asked you accepts
//! theirs.

use crate::{
    core::identity::{self, PublicProfile},
    entities::{Friendship, FriendshipStatus, friendship},
    errors::{Error, Result},
};
use sea_orm::{Condition, Set, prelude::*};
use tracing::{info, instrument};

fn pair_condition(a: i64, b: i64) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(friendship::Column::RequesterId.eq(a))
                .add(friendship::Column::AddresseeId.eq(b)),
        )
        .add(
            Condition::all()
                .add(friendship::Column::RequesterId.eq(b))
                .add(friendship::Column::AddresseeId.eq(a)),
        )
}

/// Returns `true` if `a` and `b` are mutually accepted friends.
pub async fn are_mutual_friends<C>(db: &C, a: i64, b: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    if a == b {
        return Ok(false);
    }

    let accepted = Friendship::find()
        .filter(pair_condition(a, b))
        .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted))
        .one(db)
        .await?;
    Ok(accepted.is_some())
}

/// Sends a friend request from `actor_id` to `other_id`, or accepts the pending
/// request `other_id` already sent.
///
/// Returns the friendship row in its new state. Repeating a request that is
/// already pending or accepted returns the existing row unchanged.
#[instrument(skip(db))]
pub async fn add_friend(
    db: &DatabaseConnection,
    actor_id: i64,
    other_id: i64,
) -> Result<friendship::Model> {
    if actor_id == other_id {
        return Err(Error::validation("You cannot befriend yourself"));
    }
    identity::get_user(db, other_id).await?;

    let existing = Friendship::find()
        .filter(pair_condition(actor_id, other_id))
        .one(db)
        .await?;

    match existing {
        Some(row) if row.status == FriendshipStatus::Pending && row.addressee_id == actor_id => {
            let mut active: friendship::ActiveModel = row.into();
            active.status = Set(FriendshipStatus::Accepted);
            let accepted = active.update(db).await?;
            info!(friendship_id = accepted.id, "Friend request accepted");
            Ok(accepted)
        }
        Some(row) => Ok(row),
        None => {
            let created = friendship::ActiveModel {
                requester_id: Set(actor_id),
                addressee_id: Set(other_id),
                status: Set(FriendshipStatus::Pending),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!(friendship_id = created.id, "Friend request sent");
            Ok(created)
        }
    }
}

/// Lists the public profiles of everyone `actor_id` is mutual friends with.
pub async fn list_friends(db: &DatabaseConnection, actor_id: i64) -> Result<Vec<PublicProfile>> {
    let rows = Friendship::find()
        .filter(
            Condition::any()
                .add(friendship::Column::RequesterId.eq(actor_id))
                .add(friendship::Column::AddresseeId.eq(actor_id)),
        )
        .filter(friendship::Column::Status.eq(FriendshipStatus::Accepted))
        .all(db)
        .await?;

    let friend_ids: Vec<i64> = rows
        .iter()
        .map(|row| {
            if row.requester_id == actor_id {
                row.addressee_id
            } else {
                row.requester_id
            }
        })
        .collect();

    let mut profiles = identity::public_profiles(db, &friend_ids).await?;
    let mut friends: Vec<PublicProfile> = friend_ids
        .iter()
        .filter_map(|id| profiles.remove(id))
        .collect();
    friends.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(friends)
}
