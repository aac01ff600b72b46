//! Notification inbox handlers.

use crate::{
    api::{AppState, extractors::CurrentUser},
    core::notification,
    entities::NotificationModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<NotificationModel>>> {
    Ok(Json(
        notification::list_notifications(&state.db, user.id()).await?,
    ))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationModel>> {
    Ok(Json(
        notification::mark_read(&state.db, user.id(), notification_id).await?,
    ))
}
