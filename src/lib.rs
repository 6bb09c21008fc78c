//! MUDECOOP Server - reservations and notifications backend for the
//! cooperative's restaurant.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, shared state, HTTP server
//! ├── api/           # HTTP routes and handlers
//! ├── reservations/  # availability math, business rules, service
//! ├── notify/        # dedup guard, dispatcher, email and push channels
//! ├── db/            # embedded SurrealDB models and repositories
//! └── utils/         # errors, logging, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod notify;
pub mod reservations;
pub mod utils;

// Re-export common types
pub use core::{Config, Server, ServerState};
pub use reservations::ReservationService;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
