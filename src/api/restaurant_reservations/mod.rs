//! Restaurant Reservation API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/restaurant-reservations/available-hours | GET | bookable slots for a date |
//! | /api/restaurant-reservations/available-tables | GET | free tables for a date/time |
//! | /api/restaurant-reservations | POST | create (public) |
//! | /api/restaurant-reservations | GET | list (staff) |
//! | /api/restaurant-reservations/{id} | GET/PATCH/DELETE | single reservation (staff) |
//! | /api/restaurant-reservations/{id}/status | PATCH | status transition (staff) |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurant-reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/available-hours", get(handler::available_hours))
        .route("/available-tables", get(handler::available_tables))
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
}
