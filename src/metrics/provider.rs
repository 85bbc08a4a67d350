/*!
 * Introspection Provider
 * Capability-checked access to platform process introspection
 *
 * Core metrics logic is written once against this trait; the concrete
 * variant is selected at startup by probing for the introspection
 * filesystem rather than by compile-time branching.
 */

use super::procfs;
use super::reading::{ProcessMetricsSnapshot, Reading};
use crate::core::types::Pid;
use log::{info, warn};
use std::path::Path;

/// Read-only access to live process and system state.
pub trait IntrospectionProvider: Send + Sync {
    /// Live thread count of the calling process.
    fn thread_count(&self) -> Reading<u64>;

    /// Proportional-set-size memory for `pid`, KB.
    fn memory_usage_pss_kb(&self, pid: Pid) -> Reading<u64>;

    /// Private-dirty memory for `pid`, KB.
    fn private_dirty_kb(&self, pid: Pid) -> Reading<u64>;

    /// Resident-set memory for `pid`, KB.
    fn memory_usage_rss_kb(&self, pid: Pid) -> Reading<u64>;

    /// Cumulative user+system scheduler ticks for `pid`.
    fn cpu_usage_ticks(&self, pid: Pid) -> Reading<u64>;

    /// Machine-wide total memory, KB.
    fn total_system_memory_kb(&self) -> Reading<u64>;

    /// Full point-in-time snapshot for `pid`. `Unavailable` when the
    /// process's stat record is gone entirely; individual fields degrade to
    /// zero otherwise.
    fn snapshot(&self, pid: Pid) -> Reading<ProcessMetricsSnapshot>;
}

/// Linux procfs-backed provider.
pub struct ProcfsIntrospection;

impl IntrospectionProvider for ProcfsIntrospection {
    fn thread_count(&self) -> Reading<u64> {
        procfs::thread_count()
    }

    fn memory_usage_pss_kb(&self, pid: Pid) -> Reading<u64> {
        procfs::memory_usage_pss_kb(pid)
    }

    fn private_dirty_kb(&self, pid: Pid) -> Reading<u64> {
        procfs::memory_footprint(pid).map(|f| f.private_dirty_kb)
    }

    fn memory_usage_rss_kb(&self, pid: Pid) -> Reading<u64> {
        procfs::memory_usage_rss_kb(pid)
    }

    fn cpu_usage_ticks(&self, pid: Pid) -> Reading<u64> {
        procfs::cpu_usage_ticks(pid)
    }

    fn total_system_memory_kb(&self) -> Reading<u64> {
        procfs::total_system_memory_kb()
    }

    fn snapshot(&self, pid: Pid) -> Reading<ProcessMetricsSnapshot> {
        let cpu_ticks = match procfs::cpu_usage_ticks(pid) {
            Reading::Value(ticks) => ticks,
            Reading::Unavailable => return Reading::Unavailable,
        };
        let footprint = procfs::memory_footprint(pid).value_or_zero();

        Reading::Value(ProcessMetricsSnapshot {
            pss_kb: footprint.pss_kb,
            private_dirty_kb: footprint.private_dirty_kb,
            rss_kb: procfs::memory_usage_rss_kb(pid).value_or_zero(),
            cpu_ticks,
            threads: procfs::thread_count().value_or_zero(),
            total_system_kb: procfs::total_system_memory_kb().value_or_zero(),
        })
    }
}

/// Fallback provider for platforms without an introspection filesystem:
/// every read is `Unavailable`.
pub struct UnsupportedIntrospection;

impl IntrospectionProvider for UnsupportedIntrospection {
    fn thread_count(&self) -> Reading<u64> {
        Reading::Unavailable
    }

    fn memory_usage_pss_kb(&self, _pid: Pid) -> Reading<u64> {
        Reading::Unavailable
    }

    fn private_dirty_kb(&self, _pid: Pid) -> Reading<u64> {
        Reading::Unavailable
    }

    fn memory_usage_rss_kb(&self, _pid: Pid) -> Reading<u64> {
        Reading::Unavailable
    }

    fn cpu_usage_ticks(&self, _pid: Pid) -> Reading<u64> {
        Reading::Unavailable
    }

    fn total_system_memory_kb(&self) -> Reading<u64> {
        Reading::Unavailable
    }

    fn snapshot(&self, _pid: Pid) -> Reading<ProcessMetricsSnapshot> {
        Reading::Unavailable
    }
}

/// Selects the provider for this platform by probing the introspection
/// filesystem once at startup.
pub fn detect() -> Box<dyn IntrospectionProvider> {
    if Path::new("/proc/self/stat").exists() {
        info!("Process introspection: procfs");
        Box::new(ProcfsIntrospection)
    } else {
        warn!("Process introspection unavailable on this platform");
        Box::new(UnsupportedIntrospection)
    }
}
