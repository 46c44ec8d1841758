//! Minimum spacing between upstream geocoder requests.
//!
//! The public Nominatim instance allows one request per second per client.
//! The last-dispatch marker lives behind an async mutex that is held across
//! the wait, so concurrent callers queue up and each dispatch is at least
//! `min_interval` after the previous one.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug)]
pub(crate) struct RequestThrottle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until a request may be dispatched, then records the dispatch time.
    pub(crate) async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval.saturating_sub(elapsed);
                tracing::debug!(
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "throttling geocoder request"
                );
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
