//! Clock adapters.
//!
//! - [`SystemClock`] uses `std::time::Instant` for elapsed time and
//!   `SystemTime` for wall-clock stamps.
//! - [`ManualClock`] is advanced explicitly, for scenario replay and tests.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::app::ports::Clock;

/// Host clock.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed_since_boot_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn wall_clock_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    elapsed_ms: u64,
    wall_offset_ms: u64,
}

impl ManualClock {
    /// Start at zero elapsed time with wall clock `wall_start_ms`.
    pub fn new(wall_start_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            wall_offset_ms: wall_start_ms,
        }
    }

    /// Jump to an absolute elapsed time.  Never moves backwards.
    pub fn set_elapsed_ms(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.max(elapsed_ms);
    }

    pub fn advance_ms(&mut self, delta_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }
}

impl Clock for ManualClock {
    fn elapsed_since_boot_ms(&self) -> u64 {
        self.elapsed_ms
    }

    fn wall_clock_ms(&self) -> u64 {
        self.wall_offset_ms.saturating_add(self.elapsed_ms)
    }
}
