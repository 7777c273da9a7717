//! Wallet address type.
//!
//! Address format: `out_` + lowercase hex of the 32-byte ed25519 public key.
//! Addresses are compared case-insensitively: clients send whatever casing
//! their wallet produces, so the canonical form is lowercase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix for all Outlast wallet addresses.
pub const ADDRESS_PREFIX: &str = "out_";

/// Expected length: 4 (prefix) + 64 hex chars.
pub const ADDRESS_LEN: usize = 68;

/// A wallet address, stored in canonical lowercase form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create an address, normalizing to lowercase.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address has the expected `out_` + 64-hex shape.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ADDRESS_LEN
            && self.0.starts_with(ADDRESS_PREFIX)
            && self.0[ADDRESS_PREFIX.len()..]
                .bytes()
                .all(|b| b.is_ascii_hexdigit())
    }

    /// Case-insensitive equality against a possibly non-canonical string.
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_addr(byte: char) -> String {
        format!("out_{}", std::iter::repeat(byte).take(64).collect::<String>())
    }

    #[test]
    fn normalizes_to_lowercase() {
        let addr = WalletAddress::new(hex_addr('A'));
        assert_eq!(addr.as_str(), hex_addr('a'));
    }

    #[test]
    fn matches_is_case_insensitive() {
        let addr = WalletAddress::new(hex_addr('a'));
        assert!(addr.matches(&hex_addr('A')));
        assert!(!addr.matches(&hex_addr('b')));
    }

    proptest::proptest! {
        #[test]
        fn normalization_is_idempotent(s in "[0-9a-fA-F]{64}") {
            let addr = WalletAddress::new(format!("out_{s}"));
            let renormalized = WalletAddress::new(addr.as_str());
            proptest::prop_assert_eq!(&addr, &renormalized);
            proptest::prop_assert!(addr.is_well_formed());
            let shouty = format!("OUT_{}", s.to_uppercase());
            proptest::prop_assert!(addr.matches(&shouty));
        }
    }

    #[test]
    fn well_formed_shape() {
        assert!(WalletAddress::new(hex_addr('f')).is_well_formed());
        assert!(!WalletAddress::new("out_short").is_well_formed());
        assert!(!WalletAddress::new(hex_addr('g')).is_well_formed());
        assert!(!WalletAddress::new("abc_no_prefix").is_well_formed());
    }
}
