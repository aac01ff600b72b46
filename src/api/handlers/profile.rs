//! Profile and friendship handlers.

use crate::{
    api::{
        AppState,
        dto::CreateProfileRequest,
        extractors::{ApiJson, CurrentUser, Subject},
    },
    core::{
        friendship,
        identity::{self, PublicProfile},
    },
    entities::FriendshipModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// POST /profile
pub async fn create_profile(
    State(state): State<AppState>,
    Subject(subject): Subject,
    ApiJson(req): ApiJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<PublicProfile>)> {
    let user =
        identity::create_profile(&state.db, &subject, &req.display_name, req.avatar_url).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /profile
pub async fn get_profile(user: CurrentUser) -> Json<PublicProfile> {
    Json(user.0.into())
}

/// GET /friends
pub async fn list_friends(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<PublicProfile>>> {
    Ok(Json(friendship::list_friends(&state.db, user.id()).await?))
}

/// POST /friends/{user_id}
pub async fn add_friend(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(other_id): Path<i64>,
) -> Result<Json<FriendshipModel>> {
    Ok(Json(friendship::add_friend(&state.db, user.id(), other_id).await?))
}
