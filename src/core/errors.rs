/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spawn-related errors with serialization support.
///
/// These are the only failures the parent ever observes from a spawn call.
/// Exec failures are confined to the child and surface as the reserved exit
/// status instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SpawnError {
    #[error("invalid command: {0}")]
    #[diagnostic(
        code(spawn::invalid_command),
        help("Commands must be non-empty and free of interior NUL bytes.")
    )]
    InvalidCommand(String),

    #[error("out of file descriptors: {0}")]
    #[diagnostic(
        code(spawn::pipe_exhausted),
        help("The process is out of file descriptors. Raise RLIMIT_NOFILE or close leaked descriptors.")
    )]
    PipeExhausted(String),

    #[error("fork failed: {0}")]
    #[diagnostic(
        code(spawn::fork_failed),
        help("The kernel refused to fork. Check process count and memory limits.")
    )]
    ForkFailed(String),
}

/// Common result type for spawn operations
pub type SpawnResult<T> = Result<T, SpawnError>;
