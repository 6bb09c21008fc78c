//! Outbound email rate limiter
//!
//! The SMTP provider rejects bursts, so consecutive sends are spaced by a
//! minimum interval. The limiter delays the next send instead of dropping
//! it; holding the lock across the sleep serializes concurrent senders.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct EmailThrottle {
    min_interval: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl EmailThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent: Mutex::new(None),
        }
    }

    /// Wait until the minimum interval since the previous send has elapsed,
    /// then claim the send slot
    pub async fn acquire(&self) {
        let mut last = self.last_sent.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_send_is_immediate() {
        let throttle = EmailThrottle::new(Duration::from_secs(10));
        let before = Instant::now();
        throttle.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_send_waits_out_the_interval() {
        let throttle = EmailThrottle::new(Duration::from_secs(10));
        throttle.acquire().await;

        let before = Instant::now();
        throttle.acquire().await;
        assert!(before.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let throttle = EmailThrottle::new(Duration::from_secs(10));
        throttle.acquire().await;
        tokio::time::sleep(Duration::from_secs(11)).await;

        let before = Instant::now();
        throttle.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
