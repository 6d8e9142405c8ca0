//! Password hashing and constant-time verification.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes a password to a hex-encoded SHA-256 digest for storage.
///
/// Plaintext passwords are never stored or compared directly.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compares a candidate password against a stored hex-encoded digest in
/// constant time.
///
/// A stored value that is not valid hex (or not a SHA-256 digest length)
/// never matches.
#[must_use]
pub fn verify_password(password: &str, stored_hash_hex: &str) -> bool {
    let Ok(stored) = hex::decode(stored_hash_hex) else {
        return false;
    };
    let digest = Sha256::digest(password.as_bytes());
    if stored.len() != digest.len() {
        return false;
    }
    digest.as_slice().ct_eq(&stored).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("hunter2");
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn invalid_stored_hash_never_matches() {
        assert!(!verify_password("hunter2", "not-hex"));
        assert!(!verify_password("hunter2", "abcd")); // wrong length
        assert!(!verify_password("hunter2", ""));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_password("x");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
