pub mod dispatcher;
pub mod guard;
pub mod mailer;
pub mod push;
pub mod throttle;

pub use dispatcher::{
    CATEGORY_RESERVATION, DispatchOutcome, NotificationDispatcher, NotificationRequest,
};
pub use guard::{Clock, NotificationGuard, SystemClock};
pub use mailer::{Mailer, MailerError, NoopMailer, OutgoingEmail, SmtpMailer};
pub use push::{PushChannel, SocketIoPush};
pub use throttle::EmailThrottle;
