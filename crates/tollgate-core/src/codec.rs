//! Token codec: claim <-> signed opaque string.
//!
//! The HMAC codec produces `base64url(json).base64url(hmac)`. Integrity is
//! the codec's job; expiry interpretation is left to the lifecycle.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::claim::SessionClaim;
use crate::crypto::{HmacKey, HmacKeyError};

/// Errors produced while encoding or decoding a token
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Token is not `payload.signature`, or a part is not valid base64/JSON
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("signature invalid")]
    SignatureInvalid,

    /// Claim could not be encoded
    #[error("claim encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Signs claims into opaque strings and verifies them back.
pub trait TokenCodec: Send + Sync {
    fn serialize(&self, claim: &SessionClaim) -> Result<String, CodecError>;

    fn deserialize(&self, token: &str) -> Result<SessionClaim, CodecError>;
}

/// HMAC-SHA256 codec
#[derive(Debug, Clone)]
pub struct HmacCodec {
    key: HmacKey,
}

impl HmacCodec {
    pub fn new(key: HmacKey) -> Self {
        Self { key }
    }

    /// Build a codec straight from secret bytes (must be at least 32 bytes).
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        Ok(Self::new(HmacKey::new(secret)?))
    }
}

impl TokenCodec for HmacCodec {
    fn serialize(&self, claim: &SessionClaim) -> Result<String, CodecError> {
        let payload_json = serde_json::to_vec(claim)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = URL_SAFE_NO_PAD.encode(self.key.sign(payload_b64.as_bytes()));

        Ok(format!("{payload_b64}.{signature}"))
    }

    fn deserialize(&self, token: &str) -> Result<SessionClaim, CodecError> {
        let (payload_b64, signature_b64) = token.rsplit_once('.').ok_or(CodecError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CodecError::Malformed)?;
        if !self.key.verify(payload_b64.as_bytes(), &signature) {
            return Err(CodecError::SignatureInvalid);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CodecError::Malformed)?;

        serde_json::from_slice(&payload_json).map_err(|_| CodecError::Malformed)
    }
}
