//! Draw, reveal and lifecycle handlers.

use crate::{
    api::{AppState, dto::DrawResponse, extractors::CurrentUser},
    core::{
        assignment::{self, AssignmentPair, AssignmentView},
        draw,
        lifecycle::{self, Progress},
    },
    entities::EventModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// POST /events/{id}/draw
pub async fn draw_names(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<DrawResponse>> {
    let result = draw::draw_names(
        &state.db,
        user.id(),
        event_id,
        state.config.draw.max_attempts,
    )
    .await?;
    Ok(Json(result.into()))
}

/// GET /events/{id}/assignment
pub async fn get_my_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<AssignmentView>> {
    Ok(Json(
        assignment::get_my_assignment(&state.db, user.id(), event_id).await?,
    ))
}

/// POST /events/{id}/assignment/reveal
pub async fn reveal_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<AssignmentView>> {
    Ok(Json(
        assignment::reveal_assignment(&state.db, user.id(), event_id).await?,
    ))
}

/// GET /events/{id}/assignments
pub async fn get_all_assignments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<AssignmentPair>>> {
    Ok(Json(
        assignment::get_all_assignments(&state.db, user.id(), event_id).await?,
    ))
}

/// GET /events/{id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Progress>> {
    Ok(Json(
        lifecycle::get_progress(&state.db, user.id(), event_id).await?,
    ))
}

/// POST /events/{id}/complete
pub async fn mark_as_completed(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<EventModel>> {
    Ok(Json(
        lifecycle::mark_as_completed(&state.db, user.id(), event_id).await?,
    ))
}
