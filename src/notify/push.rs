//! Realtime push channel
//!
//! The admin panel subscribes over Socket.IO and receives persisted
//! notifications as `notification:new` events. Delivery is best-effort:
//! emit failures are logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use socketioxide::SocketIo;

use super::guard::Clock;
use crate::db::models::Notification;

/// Low-level same-title suppression window, beneath the dispatcher's
/// 30-second dedup guard
pub const PUSH_DUPLICATE_WINDOW_MS: i64 = 3_000;

#[async_trait]
pub trait PushChannel: Send + Sync {
    async fn emit(&self, notification: &Notification);
}

/// Socket.IO-backed [`PushChannel`]
pub struct SocketIoPush {
    io: SocketIo,
    clock: Arc<dyn Clock>,
    recent: DashMap<String, i64>,
}

impl SocketIoPush {
    pub fn new(io: SocketIo, clock: Arc<dyn Clock>) -> Self {
        Self {
            io,
            clock,
            recent: DashMap::new(),
        }
    }

    fn is_back_to_back(&self, notification: &Notification) -> bool {
        let key = format!("{}|{}", notification.category, notification.title);
        let now = self.clock.now_millis();

        {
            if let Some(last) = self.recent.get(&key)
                && now - *last < PUSH_DUPLICATE_WINDOW_MS
            {
                tracing::warn!(title = %notification.title, "suppressing back-to-back push emit");
                return true;
            }
        }

        self.recent.insert(key, now);
        false
    }

    async fn emit_now(&self, notification: &Notification) {
        match serde_json::to_value(notification) {
            Ok(payload) => {
                if let Err(e) = self.io.emit("notification:new", &payload).await {
                    tracing::warn!(error = %e, "failed to emit push notification");
                } else {
                    tracing::debug!(title = %notification.title, "push notification emitted");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize push notification"),
        }
    }
}

#[async_trait]
impl PushChannel for SocketIoPush {
    async fn emit(&self, notification: &Notification) {
        if self.is_back_to_back(notification) {
            return;
        }

        self.emit_now(notification).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NotificationKind, NotificationStatus};
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(0)))
        }

        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn push_with_clock() -> (SocketIoPush, Arc<ManualClock>) {
        let (_layer, io) = SocketIo::new_layer();
        let clock = ManualClock::new();
        (SocketIoPush::new(io, clock.clone()), clock)
    }

    fn notification(title: &str) -> Notification {
        Notification {
            id: None,
            category: "RESERVATION".to_string(),
            title: title.to_string(),
            message: "mensaje".to_string(),
            status: NotificationStatus::New,
            kind: NotificationKind::Push,
            user_id: None,
            restaurant_reservation_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_back_to_back_same_title_is_suppressed() {
        let (push, clock) = push_with_clock();
        let n = notification("Nueva reserva de restaurante");

        assert!(!push.is_back_to_back(&n));
        clock.advance(PUSH_DUPLICATE_WINDOW_MS - 1);
        assert!(push.is_back_to_back(&n));
    }

    #[test]
    fn test_emit_allowed_after_window_elapses() {
        let (push, clock) = push_with_clock();
        let n = notification("Nueva reserva de restaurante");

        assert!(!push.is_back_to_back(&n));
        clock.advance(PUSH_DUPLICATE_WINDOW_MS);
        assert!(!push.is_back_to_back(&n));
    }

    #[test]
    fn test_different_titles_do_not_suppress_each_other() {
        let (push, _clock) = push_with_clock();

        assert!(!push.is_back_to_back(&notification("Nueva reserva de restaurante")));
        assert!(!push.is_back_to_back(&notification("Nuevo mensaje de contacto")));
    }
}
