//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::Notification;
use crate::utils::{AppError, AppResult};

/// GET /api/notifications
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Notification>>> {
    let rows = state.notifications.find_all().await?;
    Ok(Json(rows))
}

/// GET /api/notifications/category/:category
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Notification>>> {
    let rows = state.notifications.find_by_category(&category).await?;
    Ok(Json(rows))
}

/// PATCH /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let updated = state
        .notifications
        .mark_read(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Notificación no encontrada".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /api/notifications/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if !state.notifications.delete(&id).await? {
        return Err(AppError::not_found("Notificación no encontrada".to_string()));
    }
    Ok(Json(true))
}
