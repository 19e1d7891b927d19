//! Password digests.
//!
//! Credentials are stored as unsalted SHA-256 hex digests, the scheme the
//! operator's existing account database uses.

use sha2::{Digest, Sha256};
use std::fmt::Write;

/// SHA-256 hex digest of a plaintext password.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Constant-format comparison of a plaintext against a stored digest.
pub fn digest_matches(password: &str, stored_digest: &str) -> bool {
    hash_password(password) == stored_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("password")
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_digest_matches() {
        let digest = hash_password("s3cret");
        assert!(digest_matches("s3cret", &digest));
        assert!(!digest_matches("S3cret", &digest));
    }
}
