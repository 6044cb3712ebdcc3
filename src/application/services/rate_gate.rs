use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

// Slack for floating point drift when comparing a refilled balance to a request.
const BALANCE_EPSILON: f64 = 1e-6;

/// Sizing for a [`RateGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateGateConfig {
    /// Tokens granted per refill window; also the bucket ceiling.
    pub capacity: u64,
    pub window: Duration,
    /// Provider-specific characters-per-token ratio used by [`RateGate::estimate_cost`].
    pub chars_per_token: usize,
}

impl Default for RateGateConfig {
    fn default() -> Self {
        Self {
            capacity: 36_000,
            window: Duration::from_secs(60),
            chars_per_token: 4,
        }
    }
}

/// Token bucket guarding a metered upstream API.
///
/// The gate only reports: [`try_acquire`](Self::try_acquire) returns whether the tokens
/// were taken and [`wait_time`](Self::wait_time) how long a refill would take. Callers
/// wait once, try once, and treat a second refusal as terminal.
pub struct RateGate {
    capacity: f64,
    window: Duration,
    chars_per_token: usize,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    available: f64,
    last_refill: Instant,
}

impl RateGate {
    pub fn new(config: RateGateConfig) -> Self {
        let capacity = config.capacity.max(1) as f64;
        let window = if config.window.is_zero() {
            Duration::from_secs(1)
        } else {
            config.window
        };

        Self {
            capacity,
            window,
            chars_per_token: config.chars_per_token.max(1),
            bucket: Mutex::new(Bucket {
                available: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity as u64
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current balance after applying any pending refill.
    pub fn available(&self) -> f64 {
        let mut bucket = self.lock();
        self.refill_locked(&mut bucket);
        bucket.available
    }

    /// Approximate metered cost of sending `payload`, rounded up.
    pub fn estimate_cost(&self, payload: &str) -> u64 {
        payload.chars().count().div_ceil(self.chars_per_token) as u64
    }

    pub fn refill(&self) {
        let mut bucket = self.lock();
        self.refill_locked(&mut bucket);
    }

    /// Takes `tokens` from the bucket if the balance covers them. A refusal leaves the
    /// balance untouched.
    pub fn try_acquire(&self, tokens: u64) -> bool {
        let mut bucket = self.lock();
        self.refill_locked(&mut bucket);

        let needed = tokens as f64;
        if bucket.available + BALANCE_EPSILON >= needed {
            bucket.available = (bucket.available - needed).max(0.0);
            true
        } else {
            false
        }
    }

    /// Time until the bucket would hold `tokens`, zero if it already does. Rounded up to
    /// whole milliseconds so that sleeping for the returned duration is always enough.
    pub fn wait_time(&self, tokens: u64) -> Duration {
        let mut bucket = self.lock();
        self.refill_locked(&mut bucket);

        let deficit = tokens as f64 - bucket.available;
        if deficit <= BALANCE_EPSILON {
            return Duration::ZERO;
        }

        let millis = deficit * self.window.as_secs_f64() * 1000.0 / self.capacity;
        Duration::from_millis(millis.ceil() as u64)
    }

    fn refill_locked(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        if elapsed.is_zero() {
            return;
        }

        let earned = self.capacity * elapsed.as_secs_f64() / self.window.as_secs_f64();
        bucket.available = (bucket.available + earned).min(self.capacity);
        bucket.last_refill = now;
    }

    fn lock(&self) -> MutexGuard<'_, Bucket> {
        // The bucket holds plain numbers, so a poisoned lock still has usable state.
        self.bucket.lock().unwrap_or_else(|e| e.into_inner())
    }
}
