/*!
 * Core Module
 * Shared types and error taxonomy used across the crate
 */

pub mod errors;
pub mod types;

pub use errors::{SpawnError, SpawnResult};
pub use types::{Pid, EXEC_FAILURE_STATUS};
