/*!
 * Process Spawning
 * Fork/exec with explicit descriptor inheritance control
 */

mod descriptors;
mod spawner;

pub use descriptors::DescriptorPolicy;
pub use spawner::{SpawnConfig, SpawnedProcess, Spawner};
