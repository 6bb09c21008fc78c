//! Restaurant Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    Reservation, ReservationCreate, ReservationStatusChange, ReservationUpdate,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AvailableHoursQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct AvailableHoursResponse {
    pub date: String,
    pub hours: Vec<String>,
}

/// GET /api/restaurant-reservations/available-hours?date=YYYY-MM-DD
pub async fn available_hours(
    State(state): State<ServerState>,
    Query(query): Query<AvailableHoursQuery>,
) -> AppResult<Json<AvailableHoursResponse>> {
    let hours = state.reservations.available_hours(&query.date).await?;
    Ok(Json(AvailableHoursResponse {
        date: query.date,
        hours,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AvailableTablesQuery {
    pub date: String,
    pub time: String,
    pub zone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailableTablesResponse {
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    pub tables: Vec<i32>,
}

/// GET /api/restaurant-reservations/available-tables?date=&time=&zone=
pub async fn available_tables(
    State(state): State<ServerState>,
    Query(query): Query<AvailableTablesQuery>,
) -> AppResult<Json<AvailableTablesResponse>> {
    let tables = state
        .reservations
        .available_tables(&query.date, &query.time, query.zone.as_deref())
        .await?;
    Ok(Json(AvailableTablesResponse {
        date: query.date,
        time: query.time,
        zone: query.zone,
        tables,
    }))
}

/// POST /api/restaurant-reservations - public booking endpoint
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let saved = state.reservations.create(payload).await?;
    Ok(Json(saved))
}

/// GET /api/restaurant-reservations - full list for the staff panel
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    let all = state.reservations.find_all().await?;
    Ok(Json(all))
}

/// GET /api/restaurant-reservations/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let found = state.reservations.find_one(&id).await?;
    Ok(Json(found))
}

/// PATCH /api/restaurant-reservations/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let updated = state.reservations.update(&id, payload).await?;
    Ok(Json(updated))
}

/// PATCH /api/restaurant-reservations/:id/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationStatusChange>,
) -> AppResult<Json<Reservation>> {
    let updated = state.reservations.update_status(&id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/restaurant-reservations/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.reservations.remove(&id).await?;
    Ok(Json(true))
}
