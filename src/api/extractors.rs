//! Request extractors - caller identity and JSON bodies.
//!
//! Tokens are verified upstream; the gateway forwards the verified subject in
//! [`SUBJECT_HEADER`]. Handlers never read identity from anywhere else.
//! Bodies go through [`ApiJson`] so malformed JSON gets the usual error body.

use crate::{
    api::AppState,
    core::identity,
    entities::UserModel,
    errors::Error,
};
use axum::{
    extract::{FromRequest, FromRequestParts, rejection::JsonRejection},
    http::request::Parts,
};

/// Header carrying the identity provider's verified subject.
pub const SUBJECT_HEADER: &str = "x-auth-subject";

/// The verified subject, whether or not a profile exists for it yet.
#[derive(Debug, Clone)]
pub struct Subject(pub String);

impl<S> FromRequestParts<S> for Subject
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(SUBJECT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
            .ok_or(Error::Unauthenticated)
    }
}

/// The caller's profile, resolved once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserModel);

impl CurrentUser {
    /// Id passed as the acting user to core operations.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Subject(subject) = Subject::from_request_parts(parts, state).await?;
        let user = identity::resolve_user(&state.db, &subject).await?;
        Ok(Self(user))
    }
}

/// `axum::Json` whose rejection is a [`Error::Validation`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}
