//! Notification de-duplication guard
//!
//! Upstream code paths can emit the same logical notification more than
//! once in quick succession (double submits, overlapping handlers). The
//! guard derives a stable key per request and suppresses repeats inside a
//! 30-second window: repeated logically-identical requests within the
//! window produce at most one observable side effect.
//!
//! State is process-local. Running several server instances reintroduces
//! duplicates; that deployment would need a shared store instead.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use super::dispatcher::NotificationRequest;

/// Suppression window for repeated identical requests
pub const DEDUP_WINDOW_MS: i64 = 30_000;

/// Cap on tracked keys; the oldest entry is evicted past this
const MAX_TRACKED_KEYS: usize = 200;

/// Message prefix length folded into keys that lack a reservation id
const MESSAGE_KEY_LEN: usize = 120;

/// Injectable time source
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock [`Clock`]
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

pub struct NotificationGuard {
    clock: Arc<dyn Clock>,
    recent: DashMap<String, i64>,
}

impl NotificationGuard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            recent: DashMap::new(),
        }
    }

    /// Record the request and report whether it repeats one seen within the
    /// window
    pub fn is_duplicate(&self, req: &NotificationRequest) -> bool {
        let key = dedup_key(req);
        let now = self.clock.now_millis();

        {
            if let Some(last) = self.recent.get(&key)
                && now - *last < DEDUP_WINDOW_MS
            {
                tracing::warn!(key = %key, "duplicate notification detected and blocked");
                return true;
            }
        }

        self.recent.insert(key, now);
        self.evict_oldest_if_full();
        false
    }

    fn evict_oldest_if_full(&self) {
        if self.recent.len() <= MAX_TRACKED_KEYS {
            return;
        }
        let oldest = self
            .recent
            .iter()
            .min_by_key(|entry| *entry.value())
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.recent.remove(&key);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.recent.len()
    }
}

/// Stable identity of a logical notification.
///
/// Reservation notifications key on the reservation id plus the normalized
/// title so retries for the same reservation collapse; other categories key
/// on title plus a message prefix.
pub fn dedup_key(req: &NotificationRequest) -> String {
    let res_id = resolve_reservation_id(req);

    if req.category == super::dispatcher::CATEGORY_RESERVATION {
        let mut key = format!(
            "RESERVATION|res:{}|title:{}",
            res_id.as_deref().unwrap_or("none"),
            normalize(&req.title)
        );
        if res_id.is_none() {
            key.push_str(&format!(
                "|msg:{}",
                truncate_chars(&normalize(&req.message), MESSAGE_KEY_LEN)
            ));
        }
        key
    } else {
        format!(
            "{}|title:{}|msg:{}",
            normalize(&req.category),
            normalize(&req.title),
            truncate_chars(&normalize(&req.message), MESSAGE_KEY_LEN)
        )
    }
}

/// Reservation id from the explicit field, else from the
/// `/reservas/{id}` segment of the reservation URL
fn resolve_reservation_id(req: &NotificationRequest) -> Option<String> {
    if let Some(id) = &req.restaurant_reservation_id {
        return Some(id.clone());
    }
    req.reservation_url
        .as_deref()
        .and_then(extract_reservation_segment)
}

fn extract_reservation_segment(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/reservas/")?;
    let segment = rest.split(['/', '?', '#']).next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NotificationKind;
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

    fn reservation_request(title: &str, url: Option<&str>, id: Option<&str>) -> NotificationRequest {
        NotificationRequest {
            category: "RESERVATION".to_string(),
            title: title.to_string(),
            message: "Reserva creada por Ana".to_string(),
            kind: NotificationKind::Push,
            to_email: None,
            reservation_url: url.map(str::to_string),
            restaurant_reservation_id: id.map(str::to_string),
            user_id: None,
        }
    }

    #[test]
    fn test_repeat_within_window_is_duplicate() {
        let clock = ManualClock::new();
        let guard = NotificationGuard::new(clock.clone());
        let req = reservation_request("Nueva reserva", None, Some("reservation:abc"));

        assert!(!guard.is_duplicate(&req));
        clock.advance(5_000);
        assert!(guard.is_duplicate(&req));
    }

    #[test]
    fn test_repeat_after_window_is_allowed() {
        let clock = ManualClock::new();
        let guard = NotificationGuard::new(clock.clone());
        let req = reservation_request("Nueva reserva", None, Some("reservation:abc"));

        assert!(!guard.is_duplicate(&req));
        clock.advance(DEDUP_WINDOW_MS);
        assert!(!guard.is_duplicate(&req));
    }

    #[test]
    fn test_key_resolves_id_from_url() {
        let explicit = reservation_request("Nueva reserva", None, Some("abc"));
        let via_url = reservation_request(
            "Nueva reserva",
            Some("https://admin.mudecoop.cr/reservas/abc?tab=detalle"),
            None,
        );
        assert_eq!(dedup_key(&explicit), dedup_key(&via_url));
    }

    #[test]
    fn test_different_reservations_do_not_collide() {
        let a = reservation_request("Nueva reserva", None, Some("reservation:a"));
        let b = reservation_request("Nueva reserva", None, Some("reservation:b"));
        assert_ne!(dedup_key(&a), dedup_key(&b));
    }

    #[test]
    fn test_key_without_id_includes_message_prefix() {
        let mut a = reservation_request("Nueva reserva", None, None);
        let mut b = reservation_request("Nueva reserva", None, None);
        a.message = "para el 2030-05-10".to_string();
        b.message = "para el 2030-05-11".to_string();
        assert_ne!(dedup_key(&a), dedup_key(&b));
    }

    #[test]
    fn test_title_normalization() {
        let a = reservation_request("  Nueva   Reserva ", None, Some("x"));
        let b = reservation_request("nueva reserva", None, Some("x"));
        assert_eq!(dedup_key(&a), dedup_key(&b));
    }

    #[test]
    fn test_other_category_keys_on_title_and_message() {
        let mut req = reservation_request("Gracias", None, None);
        req.category = "CONTACT".to_string();
        let key = dedup_key(&req);
        assert!(key.starts_with("contact|title:gracias|msg:"));
    }

    #[test]
    fn test_eviction_caps_tracked_keys() {
        let clock = ManualClock::new();
        let guard = NotificationGuard::new(clock.clone());
        for i in 0..250 {
            let req = reservation_request("Nueva reserva", None, Some(&format!("res-{i}")));
            guard.is_duplicate(&req);
            clock.advance(1);
        }
        assert!(guard.tracked() <= 201);
    }
}
