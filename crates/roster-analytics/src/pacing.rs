use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces provider requests so each one starts at least `gap` after the
/// previous one, however many are in flight.
///
/// Waiters queue on the gate in arrival order.
#[derive(Debug)]
pub(crate) struct RequestGate {
    gap: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RequestGate {
    pub(crate) fn new(gap: Duration) -> Self {
        Self {
            gap,
            last_start: Mutex::new(None),
        }
    }

    /// Waits for the next request slot and claims it.
    pub(crate) async fn wait_for_slot(&self) {
        if self.gap.is_zero() {
            return;
        }
        let mut last = self.last_start.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.gap).await;
        }
        *last = Some(Instant::now());
    }
}
