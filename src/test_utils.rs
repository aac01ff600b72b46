//! Shared test utilities for the Secret Santa service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating users, friend circles and events with sensible defaults.

use crate::{
    core::{
        event::{NewEvent, create_event},
        friendship, identity,
        participant::accept_invitation,
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a user profile whose subject is derived from the display name.
///
/// # Defaults
/// * `auth_subject`: `"test|<lowercased name>"`
/// * `avatar_url`: None
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::UserModel> {
    let subject = format!("test|{}", name.to_lowercase().replace(' ', "-"));
    identity::create_profile(db, &subject, name, None).await
}

/// Makes two users mutual friends.
pub async fn befriend(db: &DatabaseConnection, a: i64, b: i64) -> Result<()> {
    friendship::add_friend(db, a, b).await?;
    friendship::add_friend(db, b, a).await?;
    Ok(())
}

/// Creates an organizer and `friends` users who are each mutual friends with them.
pub async fn setup_circle(
    db: &DatabaseConnection,
    friends: usize,
) -> Result<(entities::UserModel, Vec<entities::UserModel>)> {
    let organizer = create_test_user(db, "Organizer").await?;
    let mut circle = Vec::with_capacity(friends);
    for i in 1..=friends {
        let friend = create_test_user(db, &format!("Friend {i}")).await?;
        befriend(db, organizer.id, friend.id).await?;
        circle.push(friend);
    }
    Ok((organizer, circle))
}

/// Event input with sensible defaults.
///
/// # Defaults
/// * `title`: "Office Secret Santa"
/// * `draw_date`: 2025-12-01
/// * `exchange_date`: 2025-12-25
/// * `budget`: 25.0
/// * `currency`: None (falls back to the configured default)
#[must_use]
pub fn new_event_input(participant_ids: Vec<i64>) -> NewEvent {
    NewEvent {
        title: "Office Secret Santa".to_string(),
        draw_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default(),
        exchange_date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap_or_default(),
        budget: Some(25.0),
        currency: None,
        participant_ids,
    }
}

/// Creates a pending event where `size` people (organizer included) have accepted.
///
/// Returns the organizer, the event and the `size - 1` invitees in creation order.
pub async fn setup_accepted_event(
    db: &DatabaseConnection,
    size: usize,
) -> Result<(
    entities::UserModel,
    entities::EventModel,
    Vec<entities::UserModel>,
)> {
    let (organizer, friends) = setup_circle(db, size.saturating_sub(1)).await?;
    let ids = friends.iter().map(|f| f.id).collect();
    let event = create_event(db, organizer.id, new_event_input(ids), "USD").await?;
    for friend in &friends {
        accept_invitation(db, friend.id, event.id).await?;
    }
    Ok((organizer, event, friends))
}
