//! Identity resolution - maps identity-provider subjects onto local profiles.
//!
//! Token verification happens before a request reaches the service; what arrives
//! here is the verified subject. Lookups that find no profile fail with
//! [`Error::ProfileNotFound`] so clients can route the user to onboarding.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Profile fields other users are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicProfile {
    /// User id
    pub id: i64,
    /// Display name
    pub display_name: String,
    /// Optional profile picture
    pub avatar_url: Option<String>,
}

impl From<user::Model> for PublicProfile {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

/// Resolves the caller's profile from the identity-provider subject.
pub async fn resolve_user<C>(db: &C, subject: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::AuthSubject.eq(subject))
        .one(db)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            subject: subject.to_string(),
        })
}

/// Creates the profile for a subject that has none yet.
///
/// # Errors
/// - [`Error::Validation`] if the display name is blank or the subject already has
///   a profile
#[instrument(skip(db))]
pub async fn create_profile(
    db: &DatabaseConnection,
    subject: &str,
    display_name: &str,
    avatar_url: Option<String>,
) -> Result<user::Model> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(Error::validation("Display name cannot be empty"));
    }
    if subject.trim().is_empty() {
        return Err(Error::validation("Subject cannot be empty"));
    }

    let existing = User::find()
        .filter(user::Column::AuthSubject.eq(subject))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::validation("A profile already exists for this account"));
    }

    let profile = user::ActiveModel {
        auth_subject: Set(subject.to_string()),
        display_name: Set(display_name.to_string()),
        avatar_url: Set(avatar_url),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = profile.id, "Profile created");
    Ok(profile)
}

/// Finds a user by id.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Loads the public profiles of the given users, keyed by id.
pub async fn public_profiles<C>(
    db: &C,
    user_ids: &[i64],
) -> Result<std::collections::HashMap<i64, PublicProfile>>
where
    C: ConnectionTrait,
{
    if user_ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }

    let users = User::find()
        .filter(user::Column::Id.is_in(user_ids.iter().copied()))
        .all(db)
        .await?;

    Ok(users
        .into_iter()
        .map(|u| (u.id, PublicProfile::from(u)))
        .collect())
}
