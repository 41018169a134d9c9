//! Password hashing - keyed digests with a per-user random salt.
//!
//! The digest is `HMAC-SHA256(key = salt, message = password)`. The salt is
//! drawn fresh from the OS random source for every registration and is stored
//! next to the digest. Nothing here caches digests or touches the store.

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

use crate::config::PASSWORD_SALT_BYTES;
use crate::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Length of a digest produced by [`hash`].
pub const DIGEST_BYTES: usize = 32;

/// Compute the digest of `plain_text` keyed by `salt`.
///
/// Deterministic for a given salt.
pub fn hash(plain_text: &str, salt: &[u8]) -> AppResult<Vec<u8>> {
    let mut mac = keyed(salt)?;
    mac.update(plain_text.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Generate a fresh random salt.
pub fn new_salt() -> Vec<u8> {
    let mut salt = vec![0u8; PASSWORD_SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Recompute the digest and compare it with `expected` in constant time.
pub fn verify(plain_text: &str, salt: &[u8], expected: &[u8]) -> bool {
    match keyed(salt) {
        Ok(mut mac) => {
            mac.update(plain_text.as_bytes());
            mac.verify_slice(expected).is_ok()
        }
        Err(_) => false,
    }
}

fn keyed(salt: &[u8]) -> AppResult<HmacSha256> {
    HmacSha256::new_from_slice(salt)
        .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
}

/// Salt and digest pair ready to be stored on a user record.
#[derive(Clone, PartialEq, Eq)]
pub struct SaltedHash {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

// Don't expose credential material in debug output
impl std::fmt::Debug for SaltedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltedHash")
            .field("salt", &"[REDACTED]")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl SaltedHash {
    /// Hash `plain_text` under a newly generated salt.
    pub fn generate(plain_text: &str) -> AppResult<Self> {
        let salt = new_salt();
        let hash = hash(plain_text, &salt)?;
        Ok(Self { salt, hash })
    }

    /// Verify a plain text password against this pair.
    pub fn verify(&self, plain_text: &str) -> bool {
        verify(plain_text, &self.salt, &self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let credentials = SaltedHash::generate("Secret1").unwrap();

        assert!(credentials.verify("Secret1"));
        assert!(!credentials.verify("secret1"));
        assert!(!credentials.verify(""));
    }

    #[test]
    fn test_hash_is_deterministic_for_same_salt() {
        let salt = new_salt();
        assert_eq!(hash("password", &salt).unwrap(), hash("password", &salt).unwrap());
    }

    #[test]
    fn test_digest_and_salt_lengths() {
        let credentials = SaltedHash::generate("password").unwrap();
        assert_eq!(credentials.hash.len(), DIGEST_BYTES);
        assert_eq!(credentials.salt.len(), PASSWORD_SALT_BYTES);
        assert!(PASSWORD_SALT_BYTES * 8 >= 256);
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = SaltedHash::generate("SamePassword123").unwrap();
        let second = SaltedHash::generate("SamePassword123").unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
        assert!(first.verify("SamePassword123"));
        assert!(second.verify("SamePassword123"));
    }

    #[test]
    fn test_verify_rejects_wrong_salt() {
        let credentials = SaltedHash::generate("password").unwrap();
        assert!(!verify("password", &new_salt(), &credentials.hash));
    }

    #[test]
    fn test_verify_rejects_truncated_digest() {
        let credentials = SaltedHash::generate("password").unwrap();
        assert!(!verify("password", &credentials.salt, &credentials.hash[..16]));
    }

    #[test]
    fn test_debug_is_redacted() {
        let credentials = SaltedHash::generate("password").unwrap();
        let output = format!("{:?}", credentials);
        assert!(output.contains("[REDACTED]"));
    }
}
