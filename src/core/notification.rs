//! Notification sink - fire-and-forget messages to users.
//!
//! Operations collect [`Notice`]s while their transaction runs and hand them to
//! [`dispatch`] after commit. A notice that cannot be stored is logged and
//! dropped; it never fails or rolls back the operation that produced it.

use crate::{
    entities::{Notification, notification},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde_json::json;
use tracing::{debug, warn};

/// Type tag of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Invited to an exchange
    Invited,
    /// A participant accepted the organizer's invitation
    InvitationAccepted,
    /// Names have been drawn
    NamesDrawn,
    /// The organizer closed the exchange
    ExchangeCompleted,
}

impl NoticeKind {
    /// Stored tag of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invited => "secret_santa_invite",
            Self::InvitationAccepted => "secret_santa_accepted",
            Self::NamesDrawn => "secret_santa_drawn",
            Self::ExchangeCompleted => "secret_santa_completed",
        }
    }
}

/// A notification waiting to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Recipient
    pub user_id: i64,
    /// Type tag
    pub kind: NoticeKind,
    /// Headline
    pub title: String,
    /// Message text
    pub body: String,
    /// Structured data for the client
    pub payload: serde_json::Value,
}

impl Notice {
    /// Builds a notice about `event_id`; the event id is always part of the payload.
    pub fn for_event(
        user_id: i64,
        kind: NoticeKind,
        event_id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            body: body.into(),
            payload: json!({ "event_id": event_id }),
        }
    }
}

/// Stores each notice, logging and swallowing individual failures.
///
/// Returns how many notices were delivered.
pub async fn dispatch<C>(db: &C, notices: Vec<Notice>) -> usize
where
    C: ConnectionTrait,
{
    let mut delivered = 0;
    for notice in notices {
        let user_id = notice.user_id;
        let kind = notice.kind;
        match store(db, notice).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(user_id, kind = kind.as_str(), "Failed to send notification: {e}"),
        }
    }
    debug!(delivered, "Notifications dispatched");
    delivered
}

async fn store<C>(db: &C, notice: Notice) -> Result<()>
where
    C: ConnectionTrait,
{
    notification::ActiveModel {
        user_id: Set(notice.user_id),
        kind: Set(notice.kind.as_str().to_string()),
        title: Set(notice.title),
        body: Set(notice.body),
        payload: Set(notice.payload),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Lists the caller's notifications, newest first.
pub async fn list_notifications(
    db: &DatabaseConnection,
    actor_id: i64,
) -> Result<Vec<notification::Model>> {
    Notification::find()
        .filter(notification::Column::UserId.eq(actor_id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks one of the caller's notifications as read.
pub async fn mark_read(
    db: &DatabaseConnection,
    actor_id: i64,
    notification_id: i64,
) -> Result<notification::Model> {
    let found = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .filter(|n| n.user_id == actor_id)
        .ok_or_else(|| Error::not_found("Notification", notification_id))?;

    if found.is_read {
        return Ok(found);
    }

    let mut active: notification::ActiveModel = found.into();
    active.is_read = Set(true);
    active.update(db).await.map_err(Into::into)
}
