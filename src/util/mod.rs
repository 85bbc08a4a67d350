/*!
 * Utilities
 * Encoding helpers, temp-directory resolution, and thread naming
 */

pub mod encoding;
pub mod thread;
pub mod tmpdir;

pub use encoding::{bytes_from_hex, bytes_to_hex, decode_id, encode_id, humanized_bytes};
pub use tmpdir::{create_random_tmp_dir, default_tmp_dir};
