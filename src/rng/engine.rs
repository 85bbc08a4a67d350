/*!
 * Random Engine
 * Mutex-guarded seeded PRNG with explicit post-fork reseeding
 */

use parking_lot::Mutex;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Shared pseudo-random engine.
///
/// Seeded from the OS entropy source when available. If that read fails the
/// seed falls back to mixing the wall clock with the process id — an
/// arbitrary but changing value, not a security guarantee.
///
/// N.B. Always call [`reseed`](RandomEngine::reseed) after getting forked!
/// A forked child otherwise continues the parent's sequence and sibling
/// processes produce colliding output.
pub struct RandomEngine {
    rng: Mutex<StdRng>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_seed(seed_material())),
        }
    }

    /// Returns the next engine output. Thread-safe; never fails.
    pub fn next_u32(&self) -> u32 {
        self.rng.lock().next_u32()
    }

    /// Fills `dest` from the seeded engine.
    pub fn fill_bytes(&self, dest: &mut [u8]) {
        self.rng.lock().fill_bytes(dest);
    }

    /// Re-randomizes the engine so a forked branch stops sharing the
    /// parent's sequence. Must run in every forked branch before any
    /// further generation.
    pub fn reseed(&self) {
        *self.rng.lock() = StdRng::from_seed(seed_material());
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_material() -> [u8; 32] {
    let mut seed = [0u8; 32];
    if OsRng.try_fill_bytes(&mut seed).is_err() {
        // Weak-entropy fallback: wall clock mixed with the pid.
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mix = nanos ^ ((std::process::id() as u128) << 64);
        for (chunk, byte) in seed.chunks_mut(16).zip(std::iter::repeat(mix)) {
            chunk.copy_from_slice(&byte.to_le_bytes()[..chunk.len()]);
        }
    }
    seed
}
