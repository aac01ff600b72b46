//! Event business logic - creating, changing and querying exchange events.
//!
//! Creating an event is one unit of work: the shared gift list, the event itself,
//! the organizer's pre-accepted participant row, one invited row per invitee and
//! their list grants are committed together or not at all. Invitation notices go
//! out after commit.

use crate::{
    core::{
        format, friendship, gift_list,
        notification::{self, Notice, NoticeKind},
        unit_of_work,
    },
    entities::{
        Assignment, Event, EventStatus, Participant, ParticipantStatus, assignment, event,
        participant,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// Input for [`create_event`].
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event title
    pub title: String,
    /// Day names are drawn
    pub draw_date: NaiveDate,
    /// Day gifts are exchanged; must be after `draw_date`
    pub exchange_date: NaiveDate,
    /// Optional spending ceiling
    pub budget: Option<f64>,
    /// Currency code; the configured default is used when absent
    pub currency: Option<String>,
    /// Users to invite; each must be a mutual friend of the organizer
    pub participant_ids: Vec<i64>,
}

/// Field changes for [`update_event`]; `None` leaves a field untouched.
///
/// `budget` is doubly optional: `Some(None)` removes the budget.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    /// New title
    pub title: Option<String>,
    /// New draw date
    pub draw_date: Option<NaiveDate>,
    /// New exchange date
    pub exchange_date: Option<NaiveDate>,
    /// New budget, or `Some(None)` to remove it
    pub budget: Option<Option<f64>>,
    /// New currency code
    pub currency: Option<String>,
}

/// An event as seen by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    /// The event
    #[serde(flatten)]
    pub event: event::Model,
    /// Whether the viewer organizes it
    pub is_organizer: bool,
    /// The viewer's own participant status
    pub my_status: Option<ParticipantStatus>,
}

/// Checks that the draw happens strictly before the exchange.
pub fn validate_dates(draw_date: NaiveDate, exchange_date: NaiveDate) -> Result<()> {
    if draw_date >= exchange_date {
        return Err(Error::InvalidDateRange {
            draw_date,
            exchange_date,
        });
    }
    Ok(())
}

/// Validates a currency code and returns it upper-cased.
pub fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::validation(format!(
            "Currency must be a three-letter code, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("Event title cannot be empty"));
    }
    Ok(title.to_string())
}

fn validate_budget(budget: Option<f64>) -> Result<()> {
    match budget {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(Error::InvalidAmount { amount })
        }
        _ => Ok(()),
    }
}

/// Loads an event or fails with not-found.
pub async fn load_event<C>(db: &C, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Event", event_id))
}

/// Number of stored events; health reporting uses it to prove the database answers.
pub async fn event_count<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    Event::find().count(db).await.map_err(Into::into)
}

/// Fails with forbidden unless `actor_id` organizes the event.
pub fn require_organizer(event: &event::Model, actor_id: i64, action: &str) -> Result<()> {
    if event.organizer_id != actor_id {
        return Err(Error::forbidden(format!(
            "Only the organizer can {action}"
        )));
    }
    Ok(())
}

/// Fails with an invalid-state error unless the event is still pending.
pub fn require_pending(event: &event::Model, action: &str) -> Result<()> {
    if event.status != EventStatus::Pending {
        return Err(Error::InvalidState {
            action: action.to_string(),
            required: EventStatus::Pending.to_string(),
            actual: event.status,
        });
    }
    Ok(())
}

/// Finds the participant row of `user_id` in the event, if any.
pub async fn find_participant<C>(
    db: &C,
    event_id: i64,
    user_id: i64,
) -> Result<Option<participant::Model>>
where
    C: ConnectionTrait,
{
    Participant::find()
        .filter(participant::Column::EventId.eq(event_id))
        .filter(participant::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the event and checks that `actor_id` is its organizer or one of its
/// participants. Returns the event and the actor's participant row.
pub async fn load_for_member<C>(
    db: &C,
    actor_id: i64,
    event_id: i64,
) -> Result<(event::Model, Option<participant::Model>)>
where
    C: ConnectionTrait,
{
    let event = load_event(db, event_id).await?;
    let membership = find_participant(db, event_id, actor_id).await?;
    if event.organizer_id != actor_id && membership.is_none() {
        return Err(Error::forbidden("You are not part of this event"));
    }
    Ok((event, membership))
}

/// Creates an event with its gift list, organizer membership and invitations.
///
/// # Errors
/// - [`Error::InvalidDateRange`] unless `draw_date < exchange_date`
/// - [`Error::Validation`] for a blank title, bad currency, duplicate or
///   self-invitations, or an invitee who is not a mutual friend of the organizer
/// - [`Error::InvalidAmount`] for a negative or non-finite budget
#[instrument(skip(db, new_event), fields(title = %new_event.title))]
pub async fn create_event(
    db: &DatabaseConnection,
    organizer_id: i64,
    new_event: NewEvent,
    default_currency: &str,
) -> Result<event::Model> {
    let title = validate_title(&new_event.title)?;
    validate_dates(new_event.draw_date, new_event.exchange_date)?;
    validate_budget(new_event.budget)?;
    let currency =
        normalize_currency(new_event.currency.as_deref().unwrap_or(default_currency))?;

    let mut seen = HashSet::new();
    for &invitee in &new_event.participant_ids {
        if invitee == organizer_id {
            return Err(Error::validation(
                "The organizer is added automatically and cannot be invited",
            ));
        }
        if !seen.insert(invitee) {
            return Err(Error::validation(format!(
                "User {invitee} is listed more than once"
            )));
        }
    }

    let mut not_friends = Vec::new();
    for &invitee in &new_event.participant_ids {
        if !friendship::are_mutual_friends(db, organizer_id, invitee).await? {
            not_friends.push(invitee.to_string());
        }
    }
    if !not_friends.is_empty() {
        return Err(Error::validation(format!(
            "Participants must be mutual friends of the organizer; not friends: {}",
            not_friends.join(", ")
        )));
    }

    let invitees = new_event.participant_ids;
    let draw_date = new_event.draw_date;
    let exchange_date = new_event.exchange_date;
    let budget = new_event.budget;

    let (created, notices) = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let now = Utc::now();
            let list =
                gift_list::create_shared_list(txn, organizer_id, &format!("{title} gift pool"))
                    .await?;

            let created = event::ActiveModel {
                organizer_id: Set(organizer_id),
                list_id: Set(list.id),
                title: Set(title),
                draw_date: Set(draw_date),
                exchange_date: Set(exchange_date),
                budget: Set(budget),
                currency: Set(currency),
                status: Set(EventStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            participant::ActiveModel {
                event_id: Set(created.id),
                user_id: Set(organizer_id),
                status: Set(ParticipantStatus::Accepted),
                invited_at: Set(now),
                responded_at: Set(Some(now)),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let mut notices = Vec::with_capacity(invitees.len());
            for invitee in invitees {
                participant::ActiveModel {
                    event_id: Set(created.id),
                    user_id: Set(invitee),
                    status: Set(ParticipantStatus::Invited),
                    invited_at: Set(now),
                    responded_at: Set(None),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                gift_list::grant_edit_access(txn, list.id, invitee).await?;
                notices.push(invitation_notice(invitee, &created));
            }

            Ok((created, notices))
        })
    })
    .await?;

    info!(
        event_id = created.id,
        invited = notices.len(),
        "Secret Santa event created"
    );
    notification::dispatch(db, notices).await;
    Ok(created)
}

/// Builds the notice sent to a freshly invited user.
#[must_use]
pub fn invitation_notice(invitee_id: i64, event: &event::Model) -> Notice {
    Notice::for_event(
        invitee_id,
        NoticeKind::Invited,
        event.id,
        "You're invited to a Secret Santa!",
        format::event_summary(event),
    )
}

/// Changes title, dates, budget or currency of a pending event.
///
/// The date ordering is checked against the dates the event would end up with.
#[instrument(skip(db, changes))]
pub async fn update_event(
    db: &DatabaseConnection,
    actor_id: i64,
    event_id: i64,
    changes: EventChanges,
) -> Result<event::Model> {
    let title = changes.title.as_deref().map(validate_title).transpose()?;
    let currency = changes
        .currency
        .as_deref()
        .map(normalize_currency)
        .transpose()?;
    validate_budget(changes.budget.flatten())?;

    let updated = unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let current = load_event(txn, event_id).await?;
            require_organizer(&current, actor_id, "update this event")?;
            require_pending(&current, "update event")?;

            let draw_date = changes.draw_date.unwrap_or(current.draw_date);
            let exchange_date = changes.exchange_date.unwrap_or(current.exchange_date);
            validate_dates(draw_date, exchange_date)?;

            let mut active: event::ActiveModel = current.into();
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(currency) = currency {
                active.currency = Set(currency);
            }
            if let Some(budget) = changes.budget {
                active.budget = Set(budget);
            }
            active.draw_date = Set(draw_date);
            active.exchange_date = Set(exchange_date);
            active.updated_at = Set(Utc::now());
            Ok(active.update(txn).await?)
        })
    })
    .await?;

    info!(event_id, "Event updated");
    Ok(updated)
}

/// Deletes an event with its assignments, participants and gift list.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, actor_id: i64, event_id: i64) -> Result<()> {
    unit_of_work::run(db, move |txn| {
        Box::pin(async move {
            let existing = load_event(txn, event_id).await?;
            require_organizer(&existing, actor_id, "delete this event")?;

            Assignment::delete_many()
                .filter(assignment::Column::EventId.eq(event_id))
                .exec(txn)
                .await?;
            Participant::delete_many()
                .filter(participant::Column::EventId.eq(event_id))
                .exec(txn)
                .await?;
            Event::delete_by_id(event_id).exec(txn).await?;
            gift_list::dispose_list(txn, existing.list_id).await?;
            Ok(())
        })
    })
    .await?;

    info!(event_id, "Event deleted");
    Ok(())
}

/// Returns one event for its organizer or a participant.
pub async fn get_event(db: &DatabaseConnection, actor_id: i64, event_id: i64) -> Result<EventView> {
    let (event, membership) = load_for_member(db, actor_id, event_id).await?;
    Ok(EventView {
        is_organizer: event.organizer_id == actor_id,
        my_status: membership.map(|p| p.status),
        event,
    })
}

/// Lists every event the caller organizes or participates in, soonest exchange first.
pub async fn list_events(db: &DatabaseConnection, actor_id: i64) -> Result<Vec<EventView>> {
    let memberships: HashMap<i64, ParticipantStatus> = Participant::find()
        .filter(participant::Column::UserId.eq(actor_id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.event_id, p.status))
        .collect();

    let events = Event::find()
        .filter(
            sea_orm::Condition::any()
                .add(event::Column::OrganizerId.eq(actor_id))
                .add(event::Column::Id.is_in(memberships.keys().copied())),
        )
        .order_by_asc(event::Column::ExchangeDate)
        .order_by_asc(event::Column::Id)
        .all(db)
        .await?;

    Ok(events
        .into_iter()
        .map(|event| EventView {
            is_organizer: event.organizer_id == actor_id,
            my_status: memberships.get(&event.id).copied(),
            event,
        })
        .collect())
}
