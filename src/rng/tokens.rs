/*!
 * Token Generator
 * Random byte/string/filename generation on top of the shared engine
 */

use super::engine::RandomEngine;
use crate::util::encoding::bytes_to_hex;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicU64, Ordering};

const ENTROPY_DEVICE: &str = "/dev/urandom";

/// Thread-safe source of random tokens and unique identifiers.
///
/// Construct one per process and hand references to whichever components
/// need it. Branches created by a fork-like operation must call
/// [`reseed`](TokenGenerator::reseed) before generating anything further;
/// skipping that produces colliding tokens across sibling processes, not a
/// crash, so the obligation is procedural rather than type-enforced.
pub struct TokenGenerator {
    engine: RandomEngine,
    unique_counter: AtomicU64,
}

impl TokenGenerator {
    pub fn new() -> Self {
        Self {
            engine: RandomEngine::new(),
            unique_counter: AtomicU64::new(0),
        }
    }

    /// Returns the next engine output. Thread-safe; never fails.
    pub fn next_u32(&self) -> u32 {
        self.engine.next_u32()
    }

    /// Re-randomizes the shared engine. Must be invoked once, immediately,
    /// in every process branch created by a fork-like operation.
    pub fn reseed(&self) {
        self.engine.reseed();
    }

    /// Reads up to `length` bytes from the system entropy device.
    ///
    /// A short read is returned as-is: callers must treat the result as
    /// best-effort, not an error. If the device cannot be opened at all the
    /// seeded engine fills the buffer instead.
    pub fn random_bytes(&self, length: usize) -> Vec<u8> {
        let mut buf = vec![0u8; length];
        match File::open(ENTROPY_DEVICE) {
            Ok(mut device) => {
                let mut filled = 0;
                while filled < length {
                    match device.read(&mut buf[filled..]) {
                        Ok(0) => break,
                        Ok(n) => filled += n,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(_) => break,
                    }
                }
                buf.truncate(filled);
            }
            Err(_) => self.engine.fill_bytes(&mut buf),
        }
        buf
    }

    /// Generates a string of `length` random hex characters.
    ///
    /// The hex alphabet is not filename-safe by contract; use
    /// [`filename_safe`](TokenGenerator::filename_safe) for names.
    pub fn hex_string(&self, length: usize) -> String {
        let mut s = bytes_to_hex(&self.random_bytes(length.div_ceil(2)));
        s.truncate(length);
        s
    }

    /// Generates a random string of `length` characters in base64.
    /// Note: may contain '/' characters.
    pub fn b64_string(&self, length: usize) -> String {
        let mut s = STANDARD.encode(self.random_bytes(length));
        s.truncate(length);
        s
    }

    /// Generates a random string usable as a filename: no '/', ' ', or '+'.
    ///
    /// Over-generates twice the requested length before stripping, so the
    /// result is `length` characters in all but vanishingly rare cases; it
    /// may legitimately come out shorter and callers must not assume exact
    /// length.
    pub fn filename_safe(&self, length: usize) -> String {
        let mut s = self.b64_string(length * 2);
        s.retain(|c| !matches!(c, '/' | ' ' | '+'));
        s.truncate(length);
        s
    }

    /// Returns a process-unique identifier of the form `<pid>/<counter>`.
    pub fn unique_id(&self) -> String {
        format!(
            "{}/{}",
            std::process::id(),
            self.unique_counter.fetch_add(1, Ordering::Relaxed)
        )
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
