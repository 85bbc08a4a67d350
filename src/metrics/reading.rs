/*!
 * Metric Readings
 * Best-effort result type and point-in-time process snapshots
 */

use serde::{Deserialize, Serialize};

/// Outcome of a best-effort introspection read.
///
/// `Unavailable` means the backing kernel file could not be read at all —
/// the process may have exited or the introspection filesystem may be
/// absent. A legitimate zero measurement is `Value(0)`, so pollers can treat
/// repeated `Unavailable` as "target gone" without conflating it with a
/// small reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reading<T> {
    Value(T),
    Unavailable,
}

impl<T> Reading<T> {
    /// Converts to `Option`, discarding the unavailability distinction.
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Reading::Unavailable)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::Unavailable => Reading::Unavailable,
        }
    }
}

impl<T: Default> Reading<T> {
    /// Recovers the legacy "unreadable reads as zero" contract.
    pub fn value_or_zero(self) -> T {
        self.value().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Reading::Value(v),
            None => Reading::Unavailable,
        }
    }
}

/// Point-in-time read of a process's kernel-reported stats.
///
/// Recomputed fully on each query and never cached; every field is a
/// best-effort figure that degrades to zero when its backing file is
/// malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetricsSnapshot {
    /// Proportional-set-size memory, KB.
    pub pss_kb: u64,
    /// Private-dirty memory, KB.
    pub private_dirty_kb: u64,
    /// Resident-set memory, KB.
    pub rss_kb: u64,
    /// Cumulative user+system scheduler ticks. Raw monotonic counter; the
    /// caller differences successive samples to obtain a rate.
    pub cpu_ticks: u64,
    /// Live thread count.
    pub threads: u64,
    /// Machine-wide total memory, KB.
    pub total_system_kb: u64,
}
