/*!
 * Procfs Parsing
 * Defensive line-oriented parsing of per-process and machine-wide status files
 *
 * The kernel's text format is not a stable contract: malformed or missing
 * lines contribute zero, unreadable files read as Unavailable, and no path
 * here ever returns an error. The typical consumer is a monitoring loop that
 * must never be blocked by a bad reading.
 */

use super::reading::Reading;
use crate::core::types::Pid;
use log::{error, trace};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::sync::OnceLock;

/// Canonical 1-based field numbers in `/proc/<pid>/stat`.
pub(crate) const STAT_FIELD_UTIME: usize = 14;
pub(crate) const STAT_FIELD_STIME: usize = 15;
pub(crate) const STAT_FIELD_RSS_PAGES: usize = 24;

/// Accumulated smaps figures for one process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFootprint {
    pub pss_kb: u64,
    pub private_dirty_kb: u64,
}

/// Scans an already-open smaps handle for proportional-set-size and
/// private-dirty contributions, rewinding it first.
///
/// Both figures are sums over all mapped regions: a process's PSS is the
/// total of per-mapping proportional shares.
pub fn pss_and_dirty_from_smaps<R: Read + Seek>(handle: &mut R) -> MemoryFootprint {
    let mut footprint = MemoryFootprint::default();
    if handle.seek(SeekFrom::Start(0)).is_err() {
        return footprint;
    }

    for line in BufReader::new(handle).lines() {
        let Ok(line) = line else { break };
        // Shared_Dirty is accounted for by the parent's RSS.
        if let Some(rest) = line.strip_prefix("Private_Dirty:") {
            footprint.private_dirty_kb += leading_number(rest);
        } else if let Some(rest) = line.strip_prefix("Pss:") {
            footprint.pss_kb += leading_number(rest);
        }
    }
    footprint
}

/// Formats the current process's smaps figures as a log line and emits it at
/// trace level.
pub fn memory_stats<R: Read + Seek>(handle: &mut R) -> String {
    let footprint = pss_and_dirty_from_smaps(handle);
    let stats = format!(
        "procmemstats: pid={} pss={} dirty={}",
        std::process::id(),
        footprint.pss_kb,
        footprint.private_dirty_kb
    );
    trace!("Collected {}", stats);
    stats
}

/// Full smaps read for an arbitrary process. `Unavailable` when the pid is
/// invalid or the file cannot be opened (the process may have exited — a
/// normal outcome, not an exceptional one).
pub fn memory_footprint(pid: Pid) -> Reading<MemoryFootprint> {
    if pid <= 0 {
        return Reading::Unavailable;
    }
    match File::open(format!("/proc/{}/smaps", pid)) {
        Ok(mut file) => Reading::Value(pss_and_dirty_from_smaps(&mut file)),
        Err(_) => Reading::Unavailable,
    }
}

/// Proportional-set-size memory for `pid`, KB.
pub fn memory_usage_pss_kb(pid: Pid) -> Reading<u64> {
    memory_footprint(pid).map(|f| f.pss_kb)
}

/// Resident-set memory for `pid`, KB: the stat record's page count scaled by
/// the system page size.
pub fn memory_usage_rss_kb(pid: Pid) -> Reading<u64> {
    stat_value(pid, STAT_FIELD_RSS_PAGES)
        .map(|pages| pages.saturating_mul(page_size_bytes()) / 1024)
}

/// Cumulative user+system scheduler ticks for `pid`.
///
/// A raw monotonically increasing counter: the caller differences successive
/// samples and divides by elapsed wall time and the tick frequency to obtain
/// a utilization percentage.
pub fn cpu_usage_ticks(pid: Pid) -> Reading<u64> {
    read_stat_line(pid).map(|line| {
        stat_field(&line, STAT_FIELD_UTIME) + stat_field(&line, STAT_FIELD_STIME)
    })
}

/// Extracts one numeric field (canonical 1-based index) from the compact
/// stat record of `pid`.
pub fn stat_value(pid: Pid, field: usize) -> Reading<u64> {
    read_stat_line(pid).map(|line| stat_field(&line, field))
}

/// Counts live threads of the calling process via its task directory.
/// `Unavailable` when the directory cannot be opened (introspection
/// filesystem not mounted).
pub fn thread_count() -> Reading<u64> {
    match std::fs::read_dir("/proc/self/task") {
        Ok(entries) => Reading::Value(entries.flatten().count() as u64),
        Err(_) => {
            error!("No proc mounted");
            Reading::Unavailable
        }
    }
}

/// Machine-wide total memory from the memory-summary report, KB. A readable
/// report without the `MemTotal:` label reads as zero.
pub fn total_system_memory_kb() -> Reading<u64> {
    let file = match File::open("/proc/meminfo") {
        Ok(file) => file,
        Err(_) => return Reading::Unavailable,
    };

    for line in BufReader::new(file).lines() {
        let Ok(line) = line else { break };
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            return Reading::Value(leading_number(rest));
        }
    }
    Reading::Value(0)
}

fn read_stat_line(pid: Pid) -> Reading<String> {
    if pid <= 0 {
        return Reading::Unavailable;
    }
    std::fs::read_to_string(format!("/proc/{}/stat", pid))
        .ok()
        .into()
}

/// Extracts the `field`-th (canonical 1-based) value from a stat line.
///
/// The second field is the command name, which may itself contain spaces and
/// parentheses; indexing relative to the final ')' keeps later fields from
/// shifting. Fields before the command name are not numeric and read as
/// zero, as does anything malformed or out of range.
pub(crate) fn stat_field(line: &str, field: usize) -> u64 {
    if field < 3 {
        return 0;
    }
    let Some(pos) = line.rfind(')') else { return 0 };
    line[pos + 1..]
        .split_whitespace()
        .nth(field - 3)
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

fn page_size_bytes() -> u64 {
    static PAGE_SIZE: OnceLock<u64> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        nix::unistd::sysconf(nix::unistd::SysconfVar::PAGE_SIZE)
            .ok()
            .flatten()
            .map(|v| v as u64)
            .unwrap_or(4096)
    })
}

/// Skips to the first digit run in `text` and parses it; anything
/// unparsable reads as zero.
fn leading_number(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
