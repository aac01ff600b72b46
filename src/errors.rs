//! Unified error type for the exchange service.
//!
//! Core operations return [`Result`]; the API layer maps each variant onto an HTTP
//! status in `api::error`. Validation and state-machine violations are kept apart
//! from authorization failures so callers can tell "not allowed" from "not now".

use crate::entities::event::EventStatus;
use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input rejected before touching any state
    #[error("{message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// The event is not in a status that allows the requested action
    #[error("Cannot {action}: event must be {required} (currently {actual})")]
    InvalidState {
        /// The attempted action, e.g. "draw names"
        action: String,
        /// Human-readable description of the required status
        required: String,
        /// Status the event is actually in
        actual: EventStatus,
    },

    /// Draw date is not strictly before the exchange date
    #[error("Draw date {draw_date} must be before exchange date {exchange_date}")]
    InvalidDateRange {
        /// Proposed draw date
        draw_date: NaiveDate,
        /// Proposed exchange date
        exchange_date: NaiveDate,
    },

    /// Budget amount is negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The caller is known but not allowed to perform the action
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Which rule denied access
        message: String,
    },

    /// A record addressed by id does not exist
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of record, e.g. "Event"
        resource: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The identity provider subject has no profile yet
    #[error("No profile exists for subject {subject}")]
    ProfileNotFound {
        /// Opaque identity-provider subject
        subject: String,
    },

    /// No caller identity was supplied with the request
    #[error("Missing caller identity")]
    Unauthenticated,

    /// Rejection sampling ran out of attempts without finding a derangement
    #[error("Could not draw names after {attempts} attempts")]
    DrawExhausted {
        /// Number of shuffles tried
        attempts: usize,
    },

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
