//! Event CRUD handlers.

use crate::{
    api::{
        AppState,
        dto::{CreateEventRequest, UpdateEventRequest},
        extractors::{ApiJson, CurrentUser},
    },
    core::event::{self, EventView},
    entities::EventModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /events
pub async fn list_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<EventView>>> {
    Ok(Json(event::list_events(&state.db, user.id()).await?))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventModel>)> {
    let created = event::create_event(
        &state.db,
        user.id(),
        req.into(),
        &state.config.events.default_currency,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<EventView>> {
    Ok(Json(event::get_event(&state.db, user.id(), event_id).await?))
}

/// PATCH /events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateEventRequest>,
) -> Result<Json<EventModel>> {
    let updated = event::update_event(&state.db, user.id(), event_id, req.into()).await?;
    Ok(Json(updated))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<StatusCode> {
    event::delete_event(&state.db, user.id(), event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
