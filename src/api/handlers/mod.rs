//! HTTP handlers, one module per resource.
//!
//! Handlers only translate between HTTP and core calls; every rule lives in
//! `core`.

pub mod assignments;
pub mod events;
pub mod health;
pub mod notifications;
pub mod participants;
pub mod profile;
