//! Roster and invitation handlers.

use crate::{
    api::{
        AppState,
        dto::{CountResponse, InviteRequest},
        extractors::{ApiJson, CurrentUser},
    },
    core::participant::{self, ParticipantView},
    entities::ParticipantModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /events/{id}/participants
pub async fn list_participants(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<ParticipantView>>> {
    Ok(Json(
        participant::list_participants(&state.db, user.id(), event_id).await?,
    ))
}

/// POST /events/{id}/participants
pub async fn invite_participant(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<InviteRequest>,
) -> Result<(StatusCode, Json<ParticipantModel>)> {
    let invited =
        participant::invite_participant(&state.db, user.id(), event_id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(invited)))
}

/// POST /events/{id}/participants/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ParticipantModel>> {
    Ok(Json(
        participant::accept_invitation(&state.db, user.id(), event_id).await?,
    ))
}

/// POST /events/{id}/participants/decline
pub async fn decline_invitation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<ParticipantModel>> {
    Ok(Json(
        participant::decline_invitation(&state.db, user.id(), event_id).await?,
    ))
}

/// DELETE /events/{id}/participants/{user_id}
pub async fn remove_participant(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((event_id, participant_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    participant::remove_participant(&state.db, user.id(), event_id, participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /invitations/pending/count
pub async fn pending_invitation_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<CountResponse>> {
    let count = participant::pending_invitation_count(&state.db, user.id()).await?;
    Ok(Json(CountResponse { count }))
}
