//! Shared application state
//!
//! Built once at startup and cloned into every handler. Wires the embedded
//! database, the Socket.IO layer, the notification dispatcher and the
//! reservation service together.

use std::sync::Arc;
use std::time::Duration;

use socketioxide::SocketIo;
use socketioxide::extract::SocketRef;
use socketioxide::layer::SocketIoLayer;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{info, warn};

use super::Config;
use crate::db;
use crate::db::repository::{NotificationRepository, ReservationRepository};
use crate::notify::{
    EmailThrottle, Mailer, NoopMailer, NotificationDispatcher, NotificationGuard, SmtpMailer,
    SocketIoPush, SystemClock,
};
use crate::reservations::ReservationService;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: Surreal<Db>,
    pub reservations: Arc<ReservationService>,
    pub notifications: NotificationRepository,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub io: SocketIo,
}

impl ServerState {
    /// Open the database and wire all services; returns the state plus the
    /// Socket.IO layer to mount on the router
    pub async fn initialize(config: Config) -> AppResult<(Self, SocketIoLayer)> {
        let db = db::connect(&config.work_dir.to_string_lossy()).await?;

        let (socket_layer, io) = SocketIo::new_layer();
        io.ns("/", |socket: SocketRef| async move {
            tracing::debug!(sid = %socket.id, "socket connected");
        });

        let clock = Arc::new(SystemClock);

        let mailer: Arc<dyn Mailer> = if config.smtp_configured() {
            let smtp = SmtpMailer::new(
                config.smtp_host.as_deref().unwrap_or_default(),
                config.smtp_port,
                config.smtp_username.clone().unwrap_or_default(),
                config.smtp_password.clone().unwrap_or_default(),
                config.smtp_from.as_deref().unwrap_or_default(),
            )
            .map_err(|e| AppError::internal(e.to_string()))?;
            info!(host = config.smtp_host.as_deref().unwrap_or_default(), "SMTP mailer enabled");
            Arc::new(smtp)
        } else {
            warn!("SMTP not configured, outbound email disabled");
            Arc::new(NoopMailer)
        };

        let dispatcher = Arc::new(NotificationDispatcher::new(
            NotificationRepository::new(db.clone()),
            NotificationGuard::new(clock.clone()),
            EmailThrottle::new(Duration::from_millis(config.mailer_min_interval_ms)),
            mailer,
            Arc::new(SocketIoPush::new(io.clone(), clock)),
            config.admin_email.clone(),
        ));

        let reservations = Arc::new(ReservationService::new(
            ReservationRepository::new(db.clone()),
            Some(dispatcher.clone()),
            config.timezone,
            config.admin_base_url.clone(),
        ));

        let state = Self {
            config: Arc::new(config),
            notifications: NotificationRepository::new(db.clone()),
            db,
            reservations,
            dispatcher,
            io,
        };
        Ok((state, socket_layer))
    }
}
