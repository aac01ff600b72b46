//! Event lifecycle - status transitions, completion and progress.
//!
//! ```text
//! PENDING ──draw──▶ DRAWN ──first reveal──▶ IN_PROGRESS ──complete──▶ COMPLETED
//!                     └───────────────complete──────────────────────────▲
//! ```
//!
//! Transitions only move forward. Every status write goes through a
//! compare-and-set on the expected current status, so a stale request can never
//! move an event backward.

use crate::{
    core::{
        draw::compare_and_set_status,
        event::{load_event, load_for_member, require_organizer},
        notification::{self, Notice, NoticeKind},
        participant::accepted_participant_ids,
        unit_of_work,
    },
    entities::{Assignment, EventStatus, assignment, event},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

impl EventStatus {
    /// Position in the lifecycle; later statuses have higher ranks.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Drawn => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
        }
    }

    /// Whether the lifecycle allows moving directly from `self` to `next`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Drawn)
                | (Self::Drawn, Self::InProgress)
                | (Self::Drawn | Self::InProgress, Self::Completed)
        )
    }
}

/// Read-only summary of where an exchange stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Current status
    pub status: EventStatus,
    /// Participants who accepted (including the organizer)
    pub accepted_participants: u64,
    /// Assignments whose giver has looked
    pub revealed_assignments: u64,
    /// Assignments in total
    pub total_assignments: u64,
}

/// Closes the exchange. Only the organizer can do this, and only after the draw.
///
/// # Errors
/// - [`Error::Forbidden`] unless `actor_id` organizes the event
/// - [`Error::InvalidState`] unless the event is `DRAWN` or `IN_PROGRESS`
#[instrument(skip(db))]
pub async fn mark_as_completed(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<event::Model> {
    let (completed, members) = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let current = load_event(txn, event_id).await?;
            require_organizer(&current, actor_id, "complete this event")?;

            let from = [EventStatus::Drawn, EventStatus::InProgress];
            if !current.status.can_advance_to(EventStatus::Completed)
                || !compare_and_set_status(txn, event_id, &from, EventStatus::Completed).await?
            {
                let now = load_event(txn, event_id).await?;
                return Err(Error::InvalidState {
                    action: "complete event".to_string(),
                    required: format!("{} or {}", EventStatus::Drawn, EventStatus::InProgress),
                    actual: now.status,
                });
            }

            let completed = load_event(txn, event_id).await?;
            let members = accepted_participant_ids(txn, event_id).await?;
            Ok((completed, members))
        })
    })
    .await?;

    info!(event_id, "Event completed");
    let notices = members
        .into_iter()
        .filter(|&user_id| user_id != completed.organizer_id)
        .map(|user_id| {
            Notice::for_event(
                user_id,
                NoticeKind::ExchangeCompleted,
                completed.id,
                "Secret Santa completed",
                format!("{} is wrapped up. Thanks for taking part!", completed.title),
            )
        })
        .collect();
    notification::dispatch(db, notices).await;

    Ok(completed)
}

/// Reports progress to the organizer or any participant. No side effects.
pub async fn get_progress(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
) -> Result<Progress> {
    let (event, _) = load_for_member(db, actor_id, event_id).await?;

    let accepted_participants = accepted_participant_ids(db, event_id).await?.len() as u64;
    let total_assignments = Assignment::find()
        .filter(assignment::Column::EventId.eq(event_id))
        .count(db)
        .await?;
    let revealed_assignments = Assignment::find()
        .filter(assignment::Column::EventId.eq(event_id))
        .filter(assignment::Column::Revealed.eq(true))
        .count(db)
        .await?;

    Ok(Progress {
        status: event.status,
        accepted_participants,
        revealed_assignments,
        total_assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{assignment::reveal_assignment, draw::draw_names};
    use crate::test_utils::*;
    use sea_orm::Iterable;

    #[test]
    fn test_transitions_only_move_forward() {
        for from in EventStatus::iter() {
            for to in EventStatus::iter() {
                if from.can_advance_to(to) {
                    assert!(to.rank() > from.rank(), "{from} -> {to} moves backward");
                }
            }
        }
        assert!(EventStatus::Pending.can_advance_to(EventStatus::Drawn));
        assert!(EventStatus::Drawn.can_advance_to(EventStatus::Completed));
        assert!(!EventStatus::Pending.can_advance_to(EventStatus::Completed));
        assert!(!EventStatus::Pending.can_advance_to(EventStatus::InProgress));
        assert!(!EventStatus::Completed.can_advance_to(EventStatus::Completed));
        assert!(!EventStatus::InProgress.can_advance_to(EventStatus::Drawn));
    }

    #[tokio::test]
    async fn test_complete_from_pending_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 3).await?;

        let result = mark_as_completed(&db, organizer.id, event.id).await;
        assert!(matches!(
            result,
            Err(Error::InvalidState {
                actual: EventStatus::Pending,
                ..
            })
        ));
        assert_eq!(load_event(&db, event.id).await?.status, EventStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_from_drawn_and_not_twice() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, members) = setup_accepted_event(&db, 3).await?;
        draw_names(&db, organizer.id, event.id, 100).await?;

        assert!(matches!(
            mark_as_completed(&db, members[0].id, event.id).await,
            Err(Error::Forbidden { .. })
        ));

        let completed = mark_as_completed(&db, organizer.id, event.id).await?;
        assert_eq!(completed.status, EventStatus::Completed);

        let inbox = notification::list_notifications(&db, members[0].id).await?;
        assert_eq!(inbox[0].kind, NoticeKind::ExchangeCompleted.as_str());

        assert!(matches!(
            mark_as_completed(&db, organizer.id, event.id).await,
            Err(Error::InvalidState {
                actual: EventStatus::Completed,
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_reveal_after_completion_keeps_status() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, members) = setup_accepted_event(&db, 3).await?;
        draw_names(&db, organizer.id, event.id, 100).await?;
        mark_as_completed(&db, organizer.id, event.id).await?;

        reveal_assignment(&db, members[1].id, event.id).await?;
        assert_eq!(load_event(&db, event.id).await?.status, EventStatus::Completed);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, members) = setup_accepted_event(&db, 4).await?;
        let outsider = create_test_user(&db, "Outsider").await?;

        let progress = get_progress(&db, members[0].id, event.id).await?;
        assert_eq!(
            progress,
            Progress {
                status: EventStatus::Pending,
                accepted_participants: 4,
                revealed_assignments: 0,
                total_assignments: 0,
            }
        );

        draw_names(&db, organizer.id, event.id, 100).await?;
        reveal_assignment(&db, members[0].id, event.id).await?;
        reveal_assignment(&db, members[0].id, event.id).await?;
        reveal_assignment(&db, members[2].id, event.id).await?;

        let progress = get_progress(&db, organizer.id, event.id).await?;
        assert_eq!(progress.status, EventStatus::InProgress);
        assert_eq!(progress.total_assignments, 4);
        assert_eq!(progress.revealed_assignments, 2);

        assert!(matches!(
            get_progress(&db, outsider.id, event.id).await,
            Err(Error::Forbidden { .. })
        ));
        Ok(())
    }
}
