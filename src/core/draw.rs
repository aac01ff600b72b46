//! Drawing names - turns the accepted roster into giver → receiver assignments.
//!
//! The status check and the status write happen in the same transaction as a
//! compare-and-set (`UPDATE events SET status = 'DRAWN' WHERE id = ? AND status =
//! 'PENDING'`), so of two concurrent draws exactly one changes the row and the
//! other fails without writing anything. The unique (event, giver) and
//! (event, receiver) indexes back this up at the storage level.

use crate::{
    core::{
        derangement::{self, MIN_DRAW_PARTICIPANTS},
        event::{load_event, require_organizer, require_pending},
        format,
        notification::{self, Notice, NoticeKind},
        participant::accepted_participant_ids,
        unit_of_work,
    },
    entities::{Event, EventStatus, assignment, event},
    errors::{Error, Result},
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Outcome of a successful draw.
#[derive(Debug, Clone)]
pub struct DrawResult {
    /// The event, now `DRAWN`
    pub event: event::Model,
    /// Number of assignments created (one per accepted participant)
    pub assignment_count: usize,
}

/// Moves the event from `from` to `to` only if it is still in `from`.
///
/// Returns `false` when another request changed the status first.
pub(crate) async fn compare_and_set_status<C>(
    db: &C,
    event_id: i64,
    from: &[EventStatus],
    to: EventStatus,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Event::update_many()
        .set(event::ActiveModel {
            status: Set(to),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .filter(event::Column::Id.eq(event_id))
        .filter(event::Column::Status.is_in(from.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Draws names for an event: exactly once, organizer only, at least
/// [`MIN_DRAW_PARTICIPANTS`] accepted participants.
///
/// # Errors
/// - [`Error::Forbidden`] unless `actor_id` organizes the event
/// - [`Error::InvalidState`] if names were already drawn
/// - [`Error::Validation`] if fewer than three participants accepted
/// - [`Error::DrawExhausted`] if no derangement was found within `max_attempts`
#[instrument(skip(db))]
pub async fn draw_names(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
    max_attempts: usize,
) -> Result<DrawResult> {
    let (drawn, givers) = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let current = load_event(txn, event_id).await?;
            require_organizer(&current, actor_id, "draw names")?;
            require_pending(&current, "draw names")?;

            let givers = accepted_participant_ids(txn, event_id).await?;
            if givers.len() < MIN_DRAW_PARTICIPANTS {
                return Err(Error::validation(format!(
                    "At least {MIN_DRAW_PARTICIPANTS} participants must accept before names can be drawn ({} accepted)",
                    givers.len()
                )));
            }

            if !compare_and_set_status(txn, event_id, &[EventStatus::Pending], EventStatus::Drawn)
                .await?
            {
                let now = load_event(txn, event_id).await?;
                return Err(Error::InvalidState {
                    action: "draw names".to_string(),
                    required: EventStatus::Pending.to_string(),
                    actual: now.status,
                });
            }

            let pairs = derangement::derange(&givers, &mut StdRng::from_entropy(), max_attempts)?;

            let now = Utc::now();
            for (giver_id, receiver_id) in pairs {
                assignment::ActiveModel {
                    event_id: Set(event_id),
                    giver_id: Set(giver_id),
                    receiver_id: Set(receiver_id),
                    revealed: Set(false),
                    revealed_at: Set(None),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
            }

            let drawn = load_event(txn, event_id).await?;
            Ok((drawn, givers))
        })
    })
    .await?;

    info!(event_id, participants = givers.len(), "Names drawn");

    let body = format!(
        "Names have been drawn for {}. Open the app to see who you are buying for ({}).",
        drawn.title,
        format::format_budget(drawn.budget, &drawn.currency)
    );
    let notices = givers
        .iter()
        .map(|&user_id| {
            Notice::for_event(
                user_id,
                NoticeKind::NamesDrawn,
                event_id,
                "Secret Santa names drawn",
                body.clone(),
            )
        })
        .collect();
    notification::dispatch(db, notices).await;

    Ok(DrawResult {
        event: drawn,
        assignment_count: givers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::create_event;
    use crate::core::participant::accept_invitation;
    use crate::entities::{Assignment, AssignmentModel};
    use crate::test_utils::*;
    use sea_orm::{PaginatorTrait, QueryOrder};
    use std::collections::HashSet;

    async fn assignments_of(db: &DatabaseConnection, event_id: i64) -> Result<Vec<AssignmentModel>> {
        Ok(Assignment::find()
            .filter(assignment::Column::EventId.eq(event_id))
            .order_by_asc(assignment::Column::GiverId)
            .all(db)
            .await?)
    }

    #[tokio::test]
    async fn test_draw_produces_derangement() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 6).await?;

        let result = draw_names(&db, organizer.id, event.id, 100).await?;
        assert_eq!(result.event.status, EventStatus::Drawn);
        assert_eq!(result.assignment_count, 6);

        let rows = assignments_of(&db, event.id).await?;
        assert_eq!(rows.len(), 6);
        let givers: HashSet<i64> = rows.iter().map(|a| a.giver_id).collect();
        let receivers: HashSet<i64> = rows.iter().map(|a| a.receiver_id).collect();
        assert_eq!(givers, receivers);
        assert!(rows.iter().all(|a| a.giver_id != a.receiver_id));
        assert!(rows.iter().all(|a| !a.revealed));

        for giver in givers {
            let inbox = notification::list_notifications(&db, giver).await?;
            assert!(inbox.iter().any(|n| n.kind == NoticeKind::NamesDrawn.as_str()));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_draw_three_participants_is_a_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 3).await?;
        draw_names(&db, organizer.id, event.id, 100).await?;

        let rows = assignments_of(&db, event.id).await?;
        assert_eq!(rows.len(), 3);
        // Following the chain from any giver visits everyone before returning.
        let next = |id: i64| rows.iter().find(|a| a.giver_id == id).map(|a| a.receiver_id);
        let start = rows[0].giver_id;
        let second = next(start).ok_or_else(|| Error::validation("broken chain"))?;
        let third = next(second).ok_or_else(|| Error::validation("broken chain"))?;
        assert_ne!(second, start);
        assert_ne!(third, start);
        assert_eq!(next(third), Some(start));
        Ok(())
    }

    #[tokio::test]
    async fn test_draw_requires_three_accepted() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, friends) = setup_circle(&db, 2).await?;
        let ids = vec![friends[0].id, friends[1].id];
        let event = create_event(&db, organizer.id, new_event_input(ids), "USD").await?;
        accept_invitation(&db, friends[0].id, event.id).await?;

        // Organizer + one accepted; the other invitee has not answered
        let result = draw_names(&db, organizer.id, event.id, 100).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Nothing changed
        let unchanged = load_event(&db, event.id).await?;
        assert_eq!(unchanged.status, EventStatus::Pending);
        assert_eq!(Assignment::find().count(&db).await?, 0);

        accept_invitation(&db, friends[1].id, event.id).await?;
        let result = draw_names(&db, organizer.id, event.id, 100).await?;
        assert_eq!(result.assignment_count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_draw_requires_organizer() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, event, members) = setup_accepted_event(&db, 3).await?;

        let result = draw_names(&db, members[0].id, event.id, 100).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_draw_twice_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 4).await?;

        draw_names(&db, organizer.id, event.id, 100).await?;
        let before = assignments_of(&db, event.id).await?;

        let result = draw_names(&db, organizer.id, event.id, 100).await;
        assert!(matches!(
            result,
            Err(Error::InvalidState {
                actual: EventStatus::Drawn,
                ..
            })
        ));
        assert_eq!(assignments_of(&db, event.id).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_draws_write_once() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 5).await?;

        let (first, second) = tokio::join!(
            draw_names(&db, organizer.id, event.id, 100),
            draw_names(&db, organizer.id, event.id, 100)
        );

        assert_eq!(
            usize::from(first.is_ok()) + usize::from(second.is_ok()),
            1,
            "exactly one draw must succeed"
        );
        assert!(
            matches!(first, Err(Error::InvalidState { .. }))
                || matches!(second, Err(Error::InvalidState { .. }))
        );
        assert_eq!(assignments_of(&db, event.id).await?.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_exhausted_draw_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let (organizer, event, _) = setup_accepted_event(&db, 3).await?;

        let result = draw_names(&db, organizer.id, event.id, 0).await;
        assert!(matches!(result, Err(Error::DrawExhausted { .. })));

        let unchanged = load_event(&db, event.id).await?;
        assert_eq!(unchanged.status, EventStatus::Pending);
        assert_eq!(Assignment::find().count(&db).await?, 0);
        Ok(())
    }
}
