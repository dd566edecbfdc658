//! Per-store creation clock

use super::traits::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out strictly increasing microsecond timestamps.
///
/// Each tick is `max(now, previous + 1µs)`, so vertices created through the
/// same store never tie and keep their creation order even within a single
/// wall-clock microsecond.
#[derive(Debug, Default)]
pub(crate) struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// Start after an already-issued timestamp (e.g. the newest persisted vertex)
    pub(crate) fn starting_after(last_micros: i64) -> Self {
        Self {
            last_micros: AtomicI64::new(last_micros),
        }
    }

    pub(crate) fn tick(&self) -> StorageResult<DateTime<Utc>> {
        let now = Utc::now().timestamp_micros();
        let mut prev = self.last_micros.load(Ordering::Acquire);
        loop {
            let next = now.max(prev + 1);
            match self.last_micros.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return from_micros(next),
                Err(current) => prev = current,
            }
        }
    }
}

/// Convert stored microseconds back into a timestamp
pub(crate) fn from_micros(micros: i64) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(StorageError::InvalidTimestamp(micros))
}
