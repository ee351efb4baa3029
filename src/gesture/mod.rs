//! Hidden admin-entry gesture.
//!
//! Counts taps on a trigger; seven taps with no gap longer than two seconds fire once and reset.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_THRESHOLD: u32 = 7;
pub const DEFAULT_INACTIVITY: Duration = Duration::from_secs(2);

/// Debounced tap counter.
#[derive(Debug, Clone)]
pub struct TapCounter {
    threshold: u32,
    inactivity: Duration,
    count: u32,
    last_tap: Option<Instant>,
}

impl Default for TapCounter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_INACTIVITY)
    }
}

impl TapCounter {
    pub fn new(threshold: u32, inactivity: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            inactivity,
            count: 0,
            last_tap: None,
        }
    }

    /// Register a tap. Returns `true` exactly when the threshold is reached.
    pub fn tap(&mut self) -> bool {
        self.tap_at(Instant::now())
    }

    pub fn tap_at(&mut self, now: Instant) -> bool {
        if self.expired(now) {
            self.count = 0;
        }
        self.count += 1;
        self.last_tap = Some(now);

        if self.count >= self.threshold {
            tracing::info!("Admin entry gesture completed");
            self.reset();
            return true;
        }
        false
    }

    /// Taps counted so far, taking the inactivity window into account.
    pub fn count(&self) -> u32 {
        if self.expired(Instant::now()) {
            0
        } else {
            self.count
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }

    fn expired(&self, now: Instant) -> bool {
        self.last_tap
            .is_some_and(|last| now.saturating_duration_since(last) > self.inactivity)
    }
}
