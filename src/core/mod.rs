//! Core business logic - framework-agnostic exchange operations.
//!
//! Every operation that acts on behalf of a user takes that user's id explicitly;
//! identity is resolved once at the request boundary (see `identity`).

/// Giver → receiver assignments and the reveal gate
pub mod assignment;
/// Pure derangement generation by rejection sampling
pub mod derangement;
/// Drawing names for an event
pub mod draw;
/// Event creation, update, deletion and queries
pub mod event;
/// Display helpers for notification texts
pub mod format;
/// Friendship oracle and friend requests
pub mod friendship;
/// Shared gift lists and collaborator grants
pub mod gift_list;
/// Mapping identity-provider subjects onto profiles
pub mod identity;
/// Event status transitions, completion and progress
pub mod lifecycle;
/// Fire-and-forget notifications
pub mod notification;
/// Invitations and roster management
pub mod participant;
/// Transaction wrapper for multi-step mutations
pub mod unit_of_work;
