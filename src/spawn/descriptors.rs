/*!
 * Descriptor Inheritance Policy
 * Allow-list of descriptors that survive into a spawned child
 */

use nix::unistd::{close, sysconf, SysconfVar};
use std::os::fd::RawFd;

const SLOW_PATH_FALLBACK_MAX: RawFd = 1024;

/// Explicit enumeration of which descriptors a child inherits.
///
/// Standard input/output/error always survive; everything else is closed in
/// the child unless listed here. Evaluated once per spawn, in the child,
/// between fork and exec.
#[derive(Debug, Clone, Default)]
pub struct DescriptorPolicy {
    preserved: Vec<RawFd>,
}

impl DescriptorPolicy {
    /// The default policy: only descriptors 0-2 survive.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Additionally lets `fd` survive into the child.
    pub fn preserve(mut self, fd: RawFd) -> Self {
        if fd > 2 && !self.preserved.contains(&fd) {
            self.preserved.push(fd);
        }
        self
    }

    pub fn preserves(&self, fd: RawFd) -> bool {
        (0..=2).contains(&fd) || self.preserved.contains(&fd)
    }
}

/// Closes every inherited descriptor the policy does not preserve.
///
/// Fast path enumerates the per-process descriptor directory and closes
/// exactly what is open; the slow path sweeps every number up to the
/// configured maximum, which can be a million-entry loop on generous limits.
/// Runs in the freshly forked child only, never concurrently with the
/// parent's descriptor table.
pub(crate) fn close_inherited(policy: &DescriptorPolicy) {
    if !close_from_proc(policy) {
        let open_max = sysconf(SysconfVar::OPEN_MAX)
            .ok()
            .flatten()
            .map(|v| v as RawFd)
            .unwrap_or(SLOW_PATH_FALLBACK_MAX);
        for fd in 3..open_max {
            if !policy.preserves(fd) {
                let _ = close(fd);
            }
        }
    }
}

fn close_from_proc(policy: &DescriptorPolicy) -> bool {
    let entries = match std::fs::read_dir("/proc/self/fd") {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    // Snapshot the listing first: the directory handle occupies a
    // descriptor of its own and must be released before the sweep.
    let open_fds: Vec<RawFd> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str().and_then(|n| n.parse().ok()))
        .collect();

    for fd in open_fds {
        if policy.preserves(fd) {
            continue;
        }
        // The enumeration handle's own descriptor is already gone; EBADF
        // here is expected for exactly one entry.
        if let Err(e) = close(fd) {
            if e != nix::errno::Errno::EBADF {
                eprintln!("Unexpected failure to close fd {}: {}", fd, e);
            }
        }
    }
    true
}
