/*!
 * Encoding Helpers
 * Hex/id conversions and human-readable byte formatting
 */

use std::fmt::Write as _;

/// Hex-encodes a byte slice (lowercase, two digits per byte).
pub fn bytes_to_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Decodes a hex string into bytes.
///
/// Returns `None` on odd-length input or any non-hex digit, leaving nothing
/// partially produced — usable in tight validation loops without error
/// plumbing.
pub fn bytes_from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut data = Vec::with_capacity(hex.len() / 2);
    for pair in hex.as_bytes().chunks(2) {
        let s = std::str::from_utf8(pair).ok()?;
        data.push(u8::from_str_radix(s, 16).ok()?);
    }
    Some(data)
}

/// Hex-encodes a numeric id, zero-padded to `padding` characters.
pub fn encode_id(number: u64, padding: usize) -> String {
    format!("{:0width$x}", number, width = padding)
}

/// Decodes a hex-encoded numeric id. Unparsable input reads as zero.
pub fn decode_id(text: &str) -> u64 {
    u64::from_str_radix(text, 16).unwrap_or(0)
}

/// Formats a byte count with binary prefixes: `0.0 B`, `1.0 kiB`, `1.0 MiB`,
/// `1.0 GiB`, `1.0 TiB`.
pub fn humanized_bytes(bytes: u64) -> String {
    const FACTOR: f64 = 1024.0;
    const UNITS: [&str; 5] = ["B", "kiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut count = 0;
    while value >= FACTOR && count < UNITS.len() - 1 {
        value /= FACTOR;
        count += 1;
    }
    format!("{:.1} {}", value, UNITS[count])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hex_round_trip() {
        let cases: [&[u8]; 4] = [&[], &[0x00], &[0xde, 0xad, 0xbe, 0xef], &[0x0f, 0xf0]];
        for bytes in cases {
            let hex = bytes_to_hex(bytes);
            assert_eq!(bytes_from_hex(&hex).unwrap(), bytes);
        }
    }

    #[test]
    fn test_bytes_from_hex_rejects_odd_length() {
        assert_eq!(bytes_from_hex("abc"), None);
        assert_eq!(bytes_from_hex("f"), None);
    }

    #[test]
    fn test_bytes_from_hex_rejects_bad_digits() {
        assert_eq!(bytes_from_hex("zz"), None);
        assert_eq!(bytes_from_hex("0g"), None);
    }

    #[test]
    fn test_encode_id_padding() {
        assert_eq!(encode_id(0x2a, 0), "2a");
        assert_eq!(encode_id(0x2a, 4), "002a");
        assert_eq!(encode_id(0, 0), "0");
    }

    #[test]
    fn test_decode_id_round_trip() {
        assert_eq!(decode_id(&encode_id(0xdead, 8)), 0xdead);
        assert_eq!(decode_id("not-hex"), 0);
    }

    #[test]
    fn test_humanized_bytes_boundaries() {
        assert_eq!(humanized_bytes(0), "0.0 B");
        assert_eq!(humanized_bytes(1024), "1.0 kiB");
        assert_eq!(humanized_bytes(1024 * 1024), "1.0 MiB");
        assert_eq!(humanized_bytes(1024 * 1024 * 1024), "1.0 GiB");
        assert_eq!(humanized_bytes(1024u64.pow(4)), "1.0 TiB");
    }

    #[test]
    fn test_humanized_bytes_sub_threshold() {
        assert_eq!(humanized_bytes(512), "512.0 B");
        assert_eq!(humanized_bytes(1536), "1.5 kiB");
    }
}
