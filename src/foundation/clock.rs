use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// Time source for the frame loop and pause timestamps.
///
/// `now_ms` is monotonic and only meaningful as a difference; `epoch_millis` is wall-clock time
/// used for ids and pause stamps.
pub trait Clock: Send + Sync {
    /// Monotonic milliseconds since an arbitrary origin.
    fn now_ms(&self) -> f64;

    /// Milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> u64;

    /// Let `ms` milliseconds pass before the next frame.
    fn wait(&self, ms: f64);
}

/// Real time backed by [`Instant`] and [`SystemTime`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose monotonic origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn wait(&self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(ms / 1000.0));
        }
    }
}

/// Hand-advanced clock for deterministic tests and offline simulation.
///
/// Clones share the same time line, so a test can keep one handle and give another to a driver.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now_bits: Arc<AtomicU64>,
    epoch_base: u64,
}

impl ManualClock {
    /// Start at monotonic time zero with the given epoch base.
    pub fn new(epoch_base: u64) -> Self {
        Self {
            now_bits: Arc::new(AtomicU64::new(0f64.to_bits())),
            epoch_base,
        }
    }

    /// Move time forward by `ms` milliseconds. Negative values are ignored.
    pub fn advance(&self, ms: f64) {
        if !(ms.is_finite() && ms > 0.0) {
            return;
        }
        let next = self.now_ms() + ms;
        self.now_bits.store(next.to_bits(), Ordering::SeqCst);
    }

    /// Jump to an absolute monotonic time. Going backwards is ignored.
    pub fn set(&self, now_ms: f64) {
        if now_ms.is_finite() && now_ms >= self.now_ms() {
            self.now_bits.store(now_ms.to_bits(), Ordering::SeqCst);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000_000)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::SeqCst))
    }

    fn epoch_millis(&self) -> u64 {
        self.epoch_base + self.now_ms() as u64
    }

    fn wait(&self, ms: f64) {
        self.advance(ms);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
