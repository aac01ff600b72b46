//! Request and response bodies of the REST surface.

use crate::{
    core::{
        draw::DrawResult,
        event::{EventChanges, NewEvent},
    },
    entities::EventModel,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// POST /profile
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    /// Name shown to friends
    pub display_name: String,
    /// Optional profile picture
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// POST /events
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    /// Event title
    pub title: String,
    /// Day names are drawn (`YYYY-MM-DD`)
    pub draw_date: NaiveDate,
    /// Day gifts are exchanged (`YYYY-MM-DD`)
    pub exchange_date: NaiveDate,
    /// Optional spending ceiling
    #[serde(default)]
    pub budget: Option<f64>,
    /// ISO 4217 code, the configured default when absent
    #[serde(default)]
    pub currency: Option<String>,
    /// Friends to invite right away
    #[serde(default)]
    pub participant_ids: Vec<i64>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        Self {
            title: req.title,
            draw_date: req.draw_date,
            exchange_date: req.exchange_date,
            budget: req.budget,
            currency: req.currency,
            participant_ids: req.participant_ids,
        }
    }
}

/// PATCH /events/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEventRequest {
    /// New title
    pub title: Option<String>,
    /// New draw date
    pub draw_date: Option<NaiveDate>,
    /// New exchange date
    pub exchange_date: Option<NaiveDate>,
    /// New budget; an explicit `null` removes it
    #[serde(deserialize_with = "present")]
    pub budget: Option<Option<f64>>,
    /// New currency
    pub currency: Option<String>,
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            draw_date: req.draw_date,
            exchange_date: req.exchange_date,
            budget: req.budget,
            currency: req.currency,
        }
    }
}

/// POST /events/{id}/participants
#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    /// Friend to invite
    pub user_id: i64,
}

/// POST /events/{id}/draw
#[derive(Debug, Clone, Serialize)]
pub struct DrawResponse {
    /// The event, now drawn
    pub event: EventModel,
    /// Number of assignments created
    pub assignment_count: usize,
}

impl From<DrawResult> for DrawResponse {
    fn from(result: DrawResult) -> Self {
        Self {
            event: result.event,
            assignment_count: result.assignment_count,
        }
    }
}

/// Single counter
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Events stored, proves the database answers
    pub events: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_update_budget_absent_null_and_value() {
        let absent: UpdateEventRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(absent.budget, None);
        assert_eq!(absent.title.as_deref(), Some("New"));

        let cleared: UpdateEventRequest = serde_json::from_str(r#"{"budget": null}"#).unwrap();
        assert_eq!(cleared.budget, Some(None));

        let set: UpdateEventRequest = serde_json::from_str(r#"{"budget": 40.5}"#).unwrap();
        assert_eq!(set.budget, Some(Some(40.5)));
        assert_eq!(EventChanges::from(set).budget, Some(Some(40.5)));
    }
}
