//! HMAC primitives used by the session codec.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

/// Validated HMAC-SHA256 signing key.
///
/// The key bytes are shared, so cloning a key (and the codec holding it) is
/// cheap.
#[derive(Clone)]
pub struct HmacKey {
    secret: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// # Errors
    /// [`HmacKeyError::KeyTooShort`] below [`Self::MIN_KEY_LENGTH`] bytes.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        match secret.as_ref() {
            short if short.len() < Self::MIN_KEY_LENGTH => Err(HmacKeyError::KeyTooShort {
                actual: short.len(),
                minimum: Self::MIN_KEY_LENGTH,
            }),
            secret => Ok(Self {
                secret: Arc::from(secret),
            }),
        }
    }

    fn mac(&self) -> Hmac<Sha256> {
        // HMAC accepts keys of any length; the minimum is our own policy.
        Hmac::<Sha256>::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length")
    }

    /// HMAC-SHA256 of `data`.
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.mac();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Whether `signature` is the MAC of `data`. Compares in constant time.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Returns `false` immediately if the lengths differ; otherwise every byte is
/// visited regardless of where the first difference is.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello world", b"hello world"));
        assert!(!constant_time_eq(b"hello world", b"hello worle"));
        assert!(!constant_time_eq(b"hello", b"hello world"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_hmac_key_too_short() {
        let result = HmacKey::new("short");
        assert_eq!(
            result.unwrap_err(),
            HmacKeyError::KeyTooShort {
                actual: 5,
                minimum: 32
            }
        );
    }

    #[test]
    fn test_hmac_key_boundary() {
        assert!(HmacKey::new("a".repeat(31)).is_err());
        assert!(HmacKey::new("a".repeat(32)).is_ok());
        assert!(HmacKey::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_hmac_sign_verify() {
        let key = HmacKey::new("a]".repeat(32)).unwrap();
        let data = b"test data to sign";
        let signature = key.sign(data);
        assert!(key.verify(data, &signature));
        assert!(!key.verify(b"wrong data", &signature));
        assert!(!key.verify(data, &signature[..31]));
    }

    #[test]
    fn test_different_keys_produce_different_signatures() {
        let key1 = HmacKey::new("a".repeat(32)).unwrap();
        let key2 = HmacKey::new("b".repeat(32)).unwrap();
        assert_ne!(key1.sign(b"test data"), key2.sign(b"test data"));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = HmacKey::new("s3cr3t-s3cr3t-s3cr3t-s3cr3t-s3cr3t").unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("len: 34"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
