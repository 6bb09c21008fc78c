//! Notification Dedup & Dispatcher
//!
//! Accepts notification requests and decides persistence plus fan-out:
//!
//! - `PUSH`: persist a row, emit it over the realtime channel, email the
//!   admin, and, when the request carries a customer address, email the
//!   customer with category-specific copy. One request covers all channels.
//! - `EMAIL` with a recipient: customer email only, nothing persisted and
//!   no admin mail.
//! - `EMAIL` without a recipient: legacy user-id lookup, suppressed
//!   entirely for reservation notifications.
//! - `SYSTEM`: persist + push, no email.
//!
//! Delivery is best-effort throughout: transport failures are logged and
//! reported through [`DispatchOutcome`], never raised to the caller, so a
//! broken mail provider can never fail the reservation operation that
//! triggered the notification.

use std::time::Duration;

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::guard::NotificationGuard;
use super::mailer::{Mailer, OutgoingEmail};
use super::push::PushChannel;
use super::throttle::EmailThrottle;
use crate::db::models::{
    Notification, NotificationKind, NotificationStatus, reservation_link,
};
use crate::db::repository::NotificationRepository;
use crate::utils::time::now_millis;

pub const CATEGORY_RESERVATION: &str = "RESERVATION";
pub const CATEGORY_ACTIVITY: &str = "ACTIVITY";

/// Backoff before the single retry of a rate-limited send
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(10);

/// In-process notification request
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRequest {
    pub category: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub to_email: Option<String>,
    #[serde(default)]
    pub reservation_url: Option<String>,
    #[serde(default)]
    pub restaurant_reservation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Outcome of a dispatch; failures here are non-fatal by contract
#[derive(Debug)]
pub enum DispatchOutcome {
    Delivered { persisted: Option<Notification> },
    Suppressed { reason: String },
    Failed { error: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, DispatchOutcome::Suppressed { .. })
    }
}

pub struct NotificationDispatcher {
    repo: NotificationRepository,
    guard: NotificationGuard,
    throttle: EmailThrottle,
    mailer: Arc<dyn Mailer>,
    push: Arc<dyn PushChannel>,
    admin_email: String,
}

impl NotificationDispatcher {
    pub fn new(
        repo: NotificationRepository,
        guard: NotificationGuard,
        throttle: EmailThrottle,
        mailer: Arc<dyn Mailer>,
        push: Arc<dyn PushChannel>,
        admin_email: String,
    ) -> Self {
        Self {
            repo,
            guard,
            throttle,
            mailer,
            push,
            admin_email: admin_email.trim().to_lowercase(),
        }
    }

    pub async fn dispatch(&self, req: NotificationRequest) -> DispatchOutcome {
        // Legacy reservation EMAILs without a recipient would fire alongside
        // the to_email path; drop them outright.
        if req.category == CATEGORY_RESERVATION
            && req.kind == NotificationKind::Email
            && req.to_email.is_none()
        {
            debug!("ignoring legacy reservation EMAIL without recipient");
            return DispatchOutcome::Suppressed {
                reason: "legacy reservation email without recipient".to_string(),
            };
        }

        if self.guard.is_duplicate(&req) {
            return DispatchOutcome::Suppressed {
                reason: "duplicate within dedup window".to_string(),
            };
        }

        debug!(
            category = %req.category,
            kind = ?req.kind,
            to_email = req.to_email.as_deref().unwrap_or("-"),
            "dispatching notification"
        );

        match req.kind {
            NotificationKind::Push | NotificationKind::System => self.persist_and_push(req).await,
            NotificationKind::Email => self.email_only(req).await,
        }
    }

    async fn persist_and_push(&self, req: NotificationRequest) -> DispatchOutcome {
        let row = Notification {
            id: None,
            category: req.category.clone(),
            title: req.title.clone(),
            message: req.message.clone(),
            status: NotificationStatus::New,
            kind: req.kind,
            user_id: req.user_id.clone(),
            restaurant_reservation_id: req
                .restaurant_reservation_id
                .as_deref()
                .map(reservation_link),
            created_at: now_millis(),
        };

        let saved = match self.repo.create(row).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(error = %e, "failed to persist notification");
                return DispatchOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        self.push.emit(&saved).await;

        if req.kind == NotificationKind::Push {
            self.send_admin_email(&req).await;
            if let Some(to) = &req.to_email {
                self.send_client_email(to, &req).await;
            }
        }

        DispatchOutcome::Delivered {
            persisted: Some(saved),
        }
    }

    async fn email_only(&self, req: NotificationRequest) -> DispatchOutcome {
        if let Some(to) = &req.to_email {
            if self.send_client_email(to, &req).await {
                return DispatchOutcome::Delivered { persisted: None };
            }
            return DispatchOutcome::Failed {
                error: format!("failed to send customer email to {to}"),
            };
        }

        if let Some(user_id) = &req.user_id {
            return self.send_legacy_user_email(user_id, &req).await;
        }

        DispatchOutcome::Suppressed {
            reason: "EMAIL notification without recipient".to_string(),
        }
    }

    /// Legacy path: resolve the recipient address from the user table
    async fn send_legacy_user_email(
        &self,
        user_id: &str,
        req: &NotificationRequest,
    ) -> DispatchOutcome {
        let lookup = match self.repo.find_user_email(user_id).await {
            Ok(found) => found,
            Err(e) => {
                error!(error = %e, user_id, "failed to resolve user email");
                return DispatchOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let Some((email, _name)) = lookup else {
            warn!(user_id, "user not found for legacy email notification");
            return DispatchOutcome::Failed {
                error: format!("user {user_id} not found"),
            };
        };

        let sent = self
            .send_with_retry(OutgoingEmail {
                to: email.clone(),
                subject: req.title.clone(),
                body: body_with_link(&req.message, req.reservation_url.as_deref()),
            })
            .await;

        if sent {
            DispatchOutcome::Delivered { persisted: None }
        } else {
            DispatchOutcome::Failed {
                error: format!("failed to send legacy email to {email}"),
            }
        }
    }

    async fn send_admin_email(&self, req: &NotificationRequest) -> bool {
        self.send_with_retry(OutgoingEmail {
            to: self.admin_email.clone(),
            subject: req.title.clone(),
            body: body_with_link(&req.message, req.reservation_url.as_deref()),
        })
        .await
    }

    async fn send_client_email(&self, to: &str, req: &NotificationRequest) -> bool {
        let (subject, message) = client_copy(&req.category, &req.title, &req.message);
        self.send_with_retry(OutgoingEmail {
            to: to.to_string(),
            subject,
            body: body_with_link(&message, req.reservation_url.as_deref()),
        })
        .await
    }

    /// Throttled send; one retry after a fixed backoff when the provider
    /// pushes back on volume, then give up
    async fn send_with_retry(&self, mail: OutgoingEmail) -> bool {
        self.throttle.acquire().await;

        match self.mailer.send(&mail).await {
            Ok(()) => {
                info!(to = %mail.to, "email sent");
                true
            }
            Err(e) if e.is_rate_limited() => {
                warn!(
                    to = %mail.to,
                    "mail provider rate limit hit, retrying in {}s",
                    RATE_LIMIT_BACKOFF.as_secs()
                );
                tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                match self.mailer.send(&mail).await {
                    Ok(()) => {
                        info!(to = %mail.to, "email sent on retry");
                        true
                    }
                    Err(e) => {
                        error!(error = %e, to = %mail.to, "giving up on email after retry");
                        false
                    }
                }
            }
            Err(e) => {
                error!(error = %e, to = %mail.to, "failed to send email");
                false
            }
        }
    }
}

fn body_with_link(message: &str, reservation_url: Option<&str>) -> String {
    match reservation_url {
        Some(url) => format!("{message} | Ver: {url}"),
        None => message.to_string(),
    }
}

/// Customer-facing subject and body, keyed off category and title wording
fn client_copy(category: &str, title: &str, message: &str) -> (String, String) {
    if category == CATEGORY_RESERVATION {
        let lower_title = title.to_lowercase();
        if lower_title.contains("confirmada") {
            (
                "✅ Tu reserva ha sido confirmada - MUDECOOP".to_string(),
                "¡Excelente noticia! Tu reserva ha sido confirmada. Te esperamos con gusto. \
                 ¡Gracias por elegirnos! 💚"
                    .to_string(),
            )
        } else if lower_title.contains("cancelada") {
            (
                "❌ Tu reserva ha sido cancelada - MUDECOOP".to_string(),
                "Lamentamos informarte que tu reserva ha sido cancelada. Si tienes alguna duda, \
                 no dudes en contactarnos. Esperamos verte pronto. 💚"
                    .to_string(),
            )
        } else {
            (
                "Confirmación de tu reserva - MUDECOOP".to_string(),
                "Hemos recibido tu reserva correctamente. Te confirmaremos los detalles \
                 próximamente. ¡Gracias por elegirnos! 💚"
                    .to_string(),
            )
        }
    } else if category == CATEGORY_ACTIVITY {
        (
            "Gracias por contactarnos 💚".to_string(),
            "Hola, hemos recibido tu mensaje. Te responderemos lo antes posible.".to_string(),
        )
    } else {
        (title.to_string(), message.to_string())
    }
}
