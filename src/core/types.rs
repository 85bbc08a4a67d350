/*!
 * Core Types
 * Common types used across the worker host support layer
 */

/// OS-level process ID. Positive values identify a live process; zero and
/// negative values are invalid and read as "no such process" everywhere in
/// this crate.
pub type Pid = i32;

/// Reserved exit status a spawned child terminates with when exec fails.
///
/// The child cannot return an error to the parent once forked, so this
/// status is the only signal the reaping side ever sees for an exec failure.
pub const EXEC_FAILURE_STATUS: i32 = 42;
