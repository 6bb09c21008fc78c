//! API route modules
//!
//! - [`health`] - liveness probe
//! - [`restaurant_reservations`] - public booking endpoints plus staff CRUD
//! - [`notifications`] - staff panel notification feed

pub mod health;
pub mod notifications;
pub mod restaurant_reservations;

use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(restaurant_reservations::router())
        .merge(notifications::router())
}
