/*!
 * Temp Directory Resolution
 * Environment-driven temp path lookup and private scratch-directory creation
 */

use crate::rng::TokenGenerator;
use log::error;
use std::fs::DirBuilder;
use std::path::PathBuf;

/// Environment variables consulted for the base temp directory, in priority
/// order.
const TMP_ENV_VARS: [&str; 3] = ["TMPDIR", "TEMP", "TMP"];

const TMP_FALLBACK: &str = "/tmp";

/// Resolves the base temp directory from the environment, falling back to
/// `/tmp`.
pub fn default_tmp_dir() -> PathBuf {
    for var in TMP_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return PathBuf::from(value);
            }
        }
    }
    PathBuf::from(TMP_FALLBACK)
}

/// Creates a private (0700) scratch directory named
/// `<base>/<prefix>-<random>` for worker isolation.
///
/// On creation failure the base temp directory is returned instead, so the
/// caller always gets a usable path.
pub fn create_random_tmp_dir(prefix: &str, tokens: &TokenGenerator) -> PathBuf {
    let base = default_tmp_dir();
    let dir = base.join(format!("{}-{}", prefix, tokens.filename_safe(16)));

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    if let Err(e) = builder.create(&dir) {
        error!("Failed to create random temp directory: {}", e);
        return base;
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_tmp_dir_priority() {
        let saved: Vec<_> = TMP_ENV_VARS
            .iter()
            .map(|v| (*v, std::env::var(v).ok()))
            .collect();

        std::env::set_var("TMPDIR", "/first");
        std::env::set_var("TEMP", "/second");
        std::env::set_var("TMP", "/third");
        assert_eq!(default_tmp_dir(), PathBuf::from("/first"));

        std::env::remove_var("TMPDIR");
        assert_eq!(default_tmp_dir(), PathBuf::from("/second"));

        std::env::remove_var("TEMP");
        assert_eq!(default_tmp_dir(), PathBuf::from("/third"));

        std::env::remove_var("TMP");
        assert_eq!(default_tmp_dir(), PathBuf::from("/tmp"));

        for (var, value) in saved {
            match value {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }

    #[test]
    #[serial]
    fn test_create_random_tmp_dir() {
        let scratch = tempfile::tempdir().unwrap();
        let saved = std::env::var("TMPDIR").ok();
        std::env::set_var("TMPDIR", scratch.path());

        let tokens = TokenGenerator::new();
        let dir = create_random_tmp_dir("worker", &tokens);

        assert!(dir.starts_with(scratch.path()));
        assert!(dir.is_dir());
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("worker-"));

        match saved {
            Some(v) => std::env::set_var("TMPDIR", v),
            None => std::env::remove_var("TMPDIR"),
        }
    }
}
