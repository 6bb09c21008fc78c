//! Database models

pub mod notification;
pub mod reservation;
pub mod serde_helpers;

pub use notification::{Notification, NotificationKind, NotificationStatus, reservation_link};
pub use reservation::{
    Reservation, ReservationCreate, ReservationStatus, ReservationStatusChange,
    ReservationUpdate,
};
