//! Notification API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/notifications | GET | full feed, newest first |
//! | /api/notifications/category/{category} | GET | feed filtered by category |
//! | /api/notifications/{id}/read | PATCH | mark as read |
//! | /api/notifications/{id} | DELETE | delete |

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/category/{category}", get(handler::by_category))
        .route("/{id}/read", patch(handler::mark_read))
        .route("/{id}", delete(handler::delete))
}
