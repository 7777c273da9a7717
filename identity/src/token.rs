//! HMAC-signed session tokens.
//!
//! Token format: `hex(payload_json).hex(hmac_sha256(payload_json))`. The
//! payload carries the numeric id and an absolute expiry. The signing
//! secret is process-wide configuration, read at startup and never mutated.

use hmac::{Hmac, Mac};
use outlast_types::{Fid, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::IdentityError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    fid: u64,
    exp: u64,
}

/// Issues and verifies session tokens bound to a numeric id.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_secs: u64,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn mac(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Issue a token for `fid`, expiring `ttl_secs` after `now`.
    pub fn issue(&self, fid: Fid, now: Timestamp) -> String {
        let payload = TokenPayload {
            fid: fid.as_u64(),
            exp: now.as_secs() + self.ttl_secs,
        };
        let payload_json =
            serde_json::to_vec(&payload).expect("token payload is always serializable");
        let tag = self.mac(&payload_json);
        format!("{}.{}", hex::encode(payload_json), hex::encode(tag))
    }

    /// Verify a token and return the bound id.
    ///
    /// Fails with `Unauthorized` on malformed input, a bad MAC, or an
    /// expired token; the specific reason only appears in debug logs.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<Fid, IdentityError> {
        let (payload_hex, tag_hex) = token.split_once('.').ok_or_else(|| {
            tracing::debug!("token rejected: missing separator");
            IdentityError::Unauthorized
        })?;
        let payload_json = hex::decode(payload_hex).map_err(|_| {
            tracing::debug!("token rejected: payload not hex");
            IdentityError::Unauthorized
        })?;
        let tag = hex::decode(tag_hex).map_err(|_| {
            tracing::debug!("token rejected: tag not hex");
            IdentityError::Unauthorized
        })?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(&payload_json);
        mac.verify_slice(&tag).map_err(|_| {
            tracing::debug!("token rejected: bad MAC");
            IdentityError::Unauthorized
        })?;

        let payload: TokenPayload = serde_json::from_slice(&payload_json).map_err(|_| {
            tracing::debug!("token rejected: malformed payload");
            IdentityError::Unauthorized
        })?;
        if now.as_secs() >= payload.exp {
            tracing::debug!(fid = payload.fid, "token rejected: expired");
            return Err(IdentityError::Unauthorized);
        }
        Ok(Fid::new(payload.fid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret".to_vec(), 3600)
    }

    #[test]
    fn issue_then_verify() {
        let signer = signer();
        let token = signer.issue(Fid::new(42), Timestamp::new(1000));
        let fid = signer.verify(&token, Timestamp::new(2000)).unwrap();
        assert_eq!(fid, Fid::new(42));
    }

    #[test]
    fn expired_token_rejected() {
        let signer = signer();
        let token = signer.issue(Fid::new(42), Timestamp::new(1000));
        // exp = 4600; exactly at expiry counts as expired
        assert!(signer.verify(&token, Timestamp::new(4600)).is_err());
        assert!(signer.verify(&token, Timestamp::new(10_000)).is_err());
    }

    #[test]
    fn tampered_payload_rejected() {
        let signer = signer();
        let token = signer.issue(Fid::new(42), Timestamp::new(1000));
        let (payload_hex, tag_hex) = token.split_once('.').unwrap();
        let other = signer.issue(Fid::new(43), Timestamp::new(1000));
        let (other_payload, _) = other.split_once('.').unwrap();
        assert_ne!(payload_hex, other_payload);

        let forged = format!("{other_payload}.{tag_hex}");
        assert!(signer.verify(&forged, Timestamp::new(2000)).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = signer().issue(Fid::new(42), Timestamp::new(1000));
        let other = TokenSigner::new(b"different-secret".to_vec(), 3600);
        assert!(other.verify(&token, Timestamp::new(2000)).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let signer = signer();
        for junk in ["", "nodot", "zz.zz", "00ff.."] {
            assert!(signer.verify(junk, Timestamp::new(0)).is_err());
        }
    }
}
