//! Restaurant reservations: availability math, business-rule validation and
//! the orchestrating service.

pub mod availability;
pub mod service;
pub mod validate;
pub mod zones;

pub use service::ReservationService;
pub use validate::ReservationError;
