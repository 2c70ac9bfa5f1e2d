//! SHA-256 checksum utility for drift detection.

use sha2::{Digest, Sha256};

/// Length of a rendered checksum (hex-encoded SHA-256).
pub const CHECKSUM_LEN: usize = 64;

/// Compute the SHA-256 checksum of raw bytes as lowercase hex.
///
/// Migration files are hashed over their exact on-disk bytes, so whitespace
/// and trailing newline changes are significant.
pub fn compute_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Shorten a checksum for display (`a1b2c3d4…`).
pub fn short_checksum(checksum: &str) -> &str {
    checksum.get(..12).unwrap_or(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_fixed_width_hex() {
        let sum = compute_checksum(b"CREATE TABLE t (id INTEGER);");
        assert_eq!(sum.len(), CHECKSUM_LEN);
        assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            compute_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_sensitive_to_trailing_newline() {
        assert_ne!(
            compute_checksum(b"SELECT 1;"),
            compute_checksum(b"SELECT 1;\n")
        );
    }

    #[test]
    fn test_short_checksum() {
        assert_eq!(short_checksum("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_checksum("abc"), "abc");
    }
}
