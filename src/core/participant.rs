//! Participant business logic - invitations and roster management.
//!
//! The roster can only change while the event is pending. A declined invitation
//! keeps its row (status `DECLINED`) and loses access to the gift list; inviting
//! that user again moves the row back to `INVITED`.

use crate::{
    core::{
        event::{
            find_participant, invitation_notice, load_event, load_for_member, require_organizer,
            require_pending,
        },
        friendship, gift_list,
        identity::{self, PublicProfile},
        notification::{self, Notice, NoticeKind},
        unit_of_work,
    },
    entities::{EventStatus, Participant, ParticipantStatus, event, participant},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{JoinType, PaginatorTrait, QueryOrder, QuerySelect, RelationTrait, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// One roster entry as shown to event members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    /// Public profile of the participant
    pub user: PublicProfile,
    /// Invitation status
    pub status: ParticipantStatus,
    /// Whether this participant organizes the event
    pub is_organizer: bool,
}

/// Invites a friend of the organizer to a pending event.
///
/// Inviting a user who previously declined resets their row to `INVITED`.
///
/// # Errors
/// - [`Error::Forbidden`] unless `actor_id` organizes the event
/// - [`Error::InvalidState`] once names have been drawn
/// - [`Error::Validation`] if the invitee is not a mutual friend of the organizer
///   or is already invited or accepted
#[instrument(skip(db))]
pub async fn invite_participant(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
    invitee_id: i64,
) -> Result<participant::Model> {
    let (invited, notice) = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let event = load_event(txn, event_id).await?;
            require_organizer(&event, actor_id, "invite participants")?;
            require_pending(&event, "invite participants")?;

            if !friendship::are_mutual_friends(txn, event.organizer_id, invitee_id).await? {
                return Err(Error::validation(format!(
                    "User {invitee_id} must be a mutual friend of the organizer to be invited"
                )));
            }

            let now = Utc::now();
            let invited = match find_participant(txn, event_id, invitee_id).await? {
                Some(existing) if existing.status == ParticipantStatus::Declined => {
                    let mut active: participant::ActiveModel = existing.into();
                    active.status = Set(ParticipantStatus::Invited);
                    active.invited_at = Set(now);
                    active.responded_at = Set(None);
                    active.update(txn).await?
                }
                Some(_) => {
                    return Err(Error::validation(format!(
                        "User {invitee_id} is already a participant"
                    )));
                }
                None => {
                    participant::ActiveModel {
                        event_id: Set(event_id),
                        user_id: Set(invitee_id),
                        status: Set(ParticipantStatus::Invited),
                        invited_at: Set(now),
                        responded_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?
                }
            };

            gift_list::grant_edit_access(txn, event.list_id, invitee_id).await?;
            Ok((invited, invitation_notice(invitee_id, &event)))
        })
    })
    .await?;

    info!(event_id, invitee_id, "Participant invited");
    notification::dispatch(db, vec![notice]).await;
    Ok(invited)
}

/// Accepts the caller's pending invitation and tells the organizer.
#[instrument(skip(db))]
pub async fn accept_invitation(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<participant::Model> {
    let (accepted, notice) = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let (event, membership) = open_invitation(txn, actor_id, event_id).await?;

            let mut active: participant::ActiveModel = membership.into();
            active.status = Set(ParticipantStatus::Accepted);
            active.responded_at = Set(Some(Utc::now()));
            let accepted = active.update(txn).await?;

            let name = identity::get_user(txn, actor_id).await?.display_name;
            let notice = Notice::for_event(
                event.organizer_id,
                NoticeKind::InvitationAccepted,
                event.id,
                "Invitation accepted",
                format!("{name} joined {}", event.title),
            );
            Ok((accepted, notice))
        })
    })
    .await?;

    info!(event_id, actor_id, "Invitation accepted");
    notification::dispatch(db, vec![notice]).await;
    Ok(accepted)
}

/// Declines the caller's pending invitation and revokes their gift-list access.
#[instrument(skip(db))]
pub async fn decline_invitation(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<participant::Model> {
    let declined = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let (event, membership) = open_invitation(txn, actor_id, event_id).await?;

            let mut active: participant::ActiveModel = membership.into();
            active.status = Set(ParticipantStatus::Declined);
            active.responded_at = Set(Some(Utc::now()));
            let declined = active.update(txn).await?;

            gift_list::revoke_access(txn, event.list_id, actor_id).await?;
            Ok(declined)
        })
    })
    .await?;

    info!(event_id, actor_id, "Invitation declined");
    Ok(declined)
}

/// Loads the event and the caller's participant row, requiring an unanswered
/// invitation on a pending event.
async fn open_invitation<C>(
    db: &C,
    actor_id: i64,
    event_id: i64,
) -> Result<(event::Model, participant::Model)>
where
    C: ConnectionTrait,
{
    let event = load_event(db, event_id).await?;
    let membership = find_participant(db, event_id, actor_id)
        .await?
        .ok_or_else(|| Error::forbidden("You have not been invited to this event"))?;

    if membership.status != ParticipantStatus::Invited {
        return Err(Error::validation(
            "This invitation has already been answered",
        ));
    }
    require_pending(&event, "respond to the invitation")?;
    Ok((event, membership))
}

/// Removes a participant from a pending event.
///
/// # Errors
/// - [`Error::Forbidden`] unless `actor_id` organizes the event
/// - [`Error::InvalidState`] once names have been drawn
/// - [`Error::Validation`] when the organizer tries to remove themselves
/// - [`Error::NotFound`] if the user is not on the roster
#[instrument(skip(db))]
pub async fn remove_participant(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
    participant_user_id: i64,
) -> Result<()> {
    unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let event = load_event(txn, event_id).await?;
            require_organizer(&event, actor_id, "remove participants")?;
            require_pending(&event, "remove participants")?;

            if participant_user_id == event.organizer_id {
                return Err(Error::validation(
                    "The organizer cannot be removed from their own event",
                ));
            }

            let membership = find_participant(txn, event_id, participant_user_id)
                .await?
                .ok_or_else(|| Error::not_found("Participant", participant_user_id))?;

            membership.delete(txn).await?;
            gift_list::revoke_access(txn, event.list_id, participant_user_id).await?;
            Ok(())
        })
    })
    .await?;

    info!(event_id, participant_user_id, "Participant removed");
    Ok(())
}

/// Lists the roster of an event for its organizer or a participant.
pub async fn list_participants(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<Vec<ParticipantView>> {
    let (event, _) = load_for_member(db, actor_id, event_id).await?;

    let rows = Participant::find()
        .filter(participant::Column::EventId.eq(event_id))
        .order_by_asc(participant::Column::Id)
        .all(db)
        .await?;

    let user_ids: Vec<i64> = rows.iter().map(|p| p.user_id).collect();
    let mut profiles = identity::public_profiles(db, &user_ids).await?;

    rows.into_iter()
        .map(|row| {
            let user = profiles
                .remove(&row.user_id)
                .ok_or_else(|| Error::not_found("User", row.user_id))?;
            Ok(ParticipantView {
                user,
                status: row.status,
                is_organizer: row.user_id == event.organizer_id,
            })
        })
        .collect()
}

/// Returns the user ids of accepted participants, ascending.
pub async fn accepted_participant_ids<C>(db: &C, event_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    Ok(Participant::find()
        .filter(participant::Column::EventId.eq(event_id))
        .filter(participant::Column::Status.eq(ParticipantStatus::Accepted))
        .order_by_asc(participant::Column::UserId)
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.user_id)
        .collect())
}

/// Counts the caller's unanswered invitations on events that are still pending.
pub async fn pending_invitation_count(db: &DatabaseConnection, actor_id: i64) -> Result<u64> {
    Participant::find()
        .join(JoinType::InnerJoin, participant::Relation::Event.def())
        .filter(participant::Column::UserId.eq(actor_id))
        .filter(participant::Column::Status.eq(ParticipantStatus::Invited))
        .filter(event::Column::Status.eq(EventStatus::Pending))
        .count(db)
        .await
        .map_err(Into::into)
}
