/*!
 * Worker Host Support Layer
 * Process-lifecycle and resource-introspection primitives for supervising
 * worker subprocesses: spawning with controlled descriptor inheritance,
 * live memory/CPU/thread metrics, unique-token generation, and log
 * anonymization.
 */

pub mod anonymize;
pub mod core;
pub mod metrics;
pub mod rng;
pub mod spawn;
pub mod telemetry;
pub mod util;

// Re-exports
pub use crate::core::{Pid, SpawnError, SpawnResult, EXEC_FAILURE_STATUS};
pub use anonymize::AnonymizationCache;
pub use metrics::{
    detect, IntrospectionProvider, ProcessMetricsSnapshot, ProcfsIntrospection, Reading,
};
pub use rng::TokenGenerator;
pub use spawn::{DescriptorPolicy, SpawnConfig, SpawnedProcess, Spawner};
pub use telemetry::init_tracing;
