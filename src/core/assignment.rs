//! Assignment reveal gate - each giver sees their receiver only after asking to.
//!
//! Until a giver reveals, their view carries no receiver at all. The organizer
//! sees every pairing, but only once the exchange is completed.

use crate::{
    core::{
        draw::compare_and_set_status,
        event::{load_event, require_organizer},
        identity::{self, PublicProfile},
        unit_of_work,
    },
    entities::{Assignment, EventStatus, assignment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// What a giver sees of their own assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentView {
    /// Event the assignment belongs to
    pub event_id: i64,
    /// Whether the giver has looked
    pub revealed: bool,
    /// Present only once revealed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<PublicProfile>,
    /// When the giver first looked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_at: Option<DateTime<Utc>>,
}

/// One full pairing, visible to the organizer after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentPair {
    /// Who buys
    pub giver: PublicProfile,
    /// Who receives
    pub receiver: PublicProfile,
    /// Whether the giver looked before the exchange closed
    pub revealed: bool,
}

async fn find_own<C>(db: &C, actor_id: i64, event_id: i64) -> Result<assignment::Model>
where
    C: ConnectionTrait,
{
    load_event(db, event_id).await?;
    Assignment::find()
        .filter(assignment::Column::EventId.eq(event_id))
        .filter(assignment::Column::GiverId.eq(actor_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Assignment", format!("event {event_id}")))
}

async fn view_of<C>(db: &C, assignment: assignment::Model) -> Result<AssignmentView>
where
    C: ConnectionTrait,
{
    let receiver = if assignment.revealed {
        Some(PublicProfile::from(
            identity::get_user(db, assignment.receiver_id).await?,
        ))
    } else {
        None
    };

    Ok(AssignmentView {
        event_id: assignment.event_id,
        revealed: assignment.revealed,
        receiver,
        revealed_at: assignment.revealed_at,
    })
}

/// Returns the caller's assignment without revealing it.
///
/// # Errors
/// [`Error::NotFound`] if the event does not exist, has not been drawn, or the
/// caller was not an accepted participant at draw time.
pub async fn get_my_assignment(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<AssignmentView> {
    let own = find_own(db, actor_id, event_id).await?;
    view_of(db, own).await
}

/// Reveals the caller's receiver. Calling it again returns the same view.
///
/// The first reveal in a `DRAWN` event moves it to `IN_PROGRESS`; later
/// statuses are left alone.
#[instrument(skip(db))]
pub async fn reveal_assignment(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<AssignmentView> {
    unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let own = find_own(txn, actor_id, event_id).await?;
            if own.revealed {
                debug!(event_id, actor_id, "Assignment already revealed");
                return view_of(txn, own).await;
            }

            let mut active: assignment::ActiveModel = own.into();
            active.revealed = Set(true);
            active.revealed_at = Set(Some(Utc::now()));
            let revealed = active.update(txn).await?;

            if compare_and_set_status(txn, event_id, &[EventStatus::Drawn], EventStatus::InProgress)
                .await?
            {
                info!(event_id, "First reveal, exchange in progress");
            }

            view_of(txn, revealed).await
        })
    })
    .await
}

/// Lists every pairing of a completed event, for its organizer.
///
/// # Errors
/// [`Error::Forbidden`] unless the caller organizes the event and it is
/// `COMPLETED`.
pub async fn get_all_assignments(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<Vec<AssignmentPair>> {
    let event = load_event(db, event_id).await?;
    require_organizer(&event, actor_id, "see all assignments")?;
    if event.status != EventStatus::Completed {
        return Err(Error::forbidden(format!(
            "Assignments stay hidden until the exchange is completed (currently {})",
            event.status
        )));
    }

    let rows = Assignment::find()
        .filter(assignment::Column::EventId.eq(event_id))
        .order_by_asc(assignment::Column::GiverId)
        .all(db)
        .await?;

    let user_ids: Vec<i64> = rows.iter().map(|a| a.giver_id).collect();
    let profiles = identity::public_profiles(db, &user_ids).await?;
    let profile = |id: i64| {
        profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("User", id))
    };

    rows.into_iter()
        .map(|a| {
            Ok(AssignmentPair {
                giver: profile(a.giver_id)?,
                receiver: profile(a.receiver_id)?,
                revealed: a.revealed,
            })
        })
        .collect()
}
