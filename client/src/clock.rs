//! Wall-clock time source.
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current unix time.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the unix epoch.
    fn now_millis(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}
