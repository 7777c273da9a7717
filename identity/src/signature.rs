//! Ed25519 challenge-signature verification.
//!
//! The challenge is a fixed string containing the claimed numeric id, so a
//! captured signature cannot be replayed for a different identity. Wallet
//! addresses are `out_` + lowercase hex of the ed25519 public key, which
//! lets us recompute the signing address from the key a client presents.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use outlast_types::{Fid, WalletAddress};

use crate::IdentityError;

/// Build the challenge string a wallet must sign to authenticate `fid`.
pub fn challenge_message(fid: Fid) -> String {
    format!("Authenticate with Outlast Voting App: {fid}")
}

/// Derive the wallet address for an ed25519 public key.
pub fn derive_address(public_key: &[u8; 32]) -> WalletAddress {
    WalletAddress::new(format!("out_{}", hex::encode(public_key)))
}

/// Verify a signed challenge against a claimed wallet address.
///
/// `public_key_hex` and `signature_hex` come straight off the wire. The
/// address recomputed from the public key must equal the claimed address
/// case-insensitively, and the signature must verify over the challenge
/// for `fid`.
pub fn verify_challenge(
    fid: Fid,
    claimed_address: &str,
    public_key_hex: &str,
    signature_hex: &str,
) -> Result<WalletAddress, IdentityError> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex)
        .ok()
        .and_then(|b| b.try_into().ok())
        .ok_or(IdentityError::InvalidSignature)?;
    let sig_bytes: [u8; 64] = hex::decode(signature_hex)
        .ok()
        .and_then(|b| b.try_into().ok())
        .ok_or(IdentityError::InvalidSignature)?;

    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| IdentityError::InvalidSignature)?;
    let signature = Signature::from_bytes(&sig_bytes);

    let message = challenge_message(fid);
    verifying_key
        .verify(message.as_bytes(), &signature)
        .map_err(|_| IdentityError::InvalidSignature)?;

    let address = derive_address(&key_bytes);
    if !address.matches(claimed_address) {
        return Err(IdentityError::InvalidSignature);
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn sign_challenge(key: &SigningKey, fid: Fid) -> String {
        let sig = key.sign(challenge_message(fid).as_bytes());
        hex::encode(sig.to_bytes())
    }

    #[test]
    fn valid_challenge_accepted() {
        let key = keypair(7);
        let fid = Fid::new(123);
        let address = derive_address(key.verifying_key().as_bytes());

        let result = verify_challenge(
            fid,
            address.as_str(),
            &hex::encode(key.verifying_key().as_bytes()),
            &sign_challenge(&key, fid),
        );
        assert_eq!(result.unwrap(), address);
    }

    #[test]
    fn address_comparison_is_case_insensitive() {
        let key = keypair(7);
        let fid = Fid::new(123);
        let address = derive_address(key.verifying_key().as_bytes());
        let uppercased = address.as_str().to_uppercase().replace("OUT_", "out_");

        assert!(verify_challenge(
            fid,
            &uppercased,
            &hex::encode(key.verifying_key().as_bytes()),
            &sign_challenge(&key, fid),
        )
        .is_ok());
    }

    #[test]
    fn wrong_fid_rejected() {
        let key = keypair(7);
        let address = derive_address(key.verifying_key().as_bytes());
        // Signature covers fid 123 but the claim is for fid 124.
        let result = verify_challenge(
            Fid::new(124),
            address.as_str(),
            &hex::encode(key.verifying_key().as_bytes()),
            &sign_challenge(&key, Fid::new(123)),
        );
        assert!(matches!(result, Err(IdentityError::InvalidSignature)));
    }

    #[test]
    fn mismatched_address_rejected() {
        let key = keypair(7);
        let other = derive_address(keypair(8).verifying_key().as_bytes());
        let fid = Fid::new(123);
        let result = verify_challenge(
            fid,
            other.as_str(),
            &hex::encode(key.verifying_key().as_bytes()),
            &sign_challenge(&key, fid),
        );
        assert!(matches!(result, Err(IdentityError::InvalidSignature)));
    }

    #[test]
    fn garbage_hex_rejected() {
        let result = verify_challenge(Fid::new(1), "out_x", "zzzz", "not-hex");
        assert!(matches!(result, Err(IdentityError::InvalidSignature)));
    }
}
