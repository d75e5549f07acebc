//! Time source for block timestamps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Supplies the creation time of new blocks, in milliseconds since the
/// Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall-clock time.
///
/// On error (system clock before epoch) this falls back to 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0));
        u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
    }
}
