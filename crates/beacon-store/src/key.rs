//! Slot keys.

use std::fmt;

use beacon_core::Account;

/// Default namespace prefix for property slots.
pub const DEFAULT_PREFIX: &str = "bcn_";

/// Key of a storage slot.
///
/// Property slots are derived from the account credentials so each account
/// gets exactly one slot per client, without the token appearing in the key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey(String);

impl StoreKey {
    /// Derive the property slot key for an account.
    ///
    /// `prefix || hex(Blake3("beacon-props-v1:" || len(input_id) || input_id || len(token) || token))[..32]`
    ///
    /// Lengths are little-endian u64, so no two accounts share a preimage.
    pub fn derive(prefix: &str, account: &Account) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"beacon-props-v1:");
        for field in [&account.input_id, &account.token] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        let digest = hex::encode(hasher.finalize().as_bytes());
        Self(format!("{}{}", prefix, &digest[..32]))
    }

    /// Use a raw string as a key.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreKey({})", self.0)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let account = Account::new("input", "token");
        assert_eq!(
            StoreKey::derive(DEFAULT_PREFIX, &account),
            StoreKey::derive(DEFAULT_PREFIX, &account)
        );
    }

    #[test]
    fn test_derive_shape() {
        let key = StoreKey::derive(DEFAULT_PREFIX, &Account::new("input", "token"));
        assert!(key.as_str().starts_with(DEFAULT_PREFIX));
        assert_eq!(key.as_str().len(), DEFAULT_PREFIX.len() + 32);
        assert!(!key.as_str().contains("token"));
    }

    #[test]
    fn test_derive_separates_fields() {
        let pairs = [
            (("ab", "c"), ("a", "bc")),
            (("a:", "b"), ("a", ":b")),
            (("", "a"), ("a", "")),
        ];
        for ((input_a, token_a), (input_b, token_b)) in pairs {
            assert_ne!(
                StoreKey::derive(DEFAULT_PREFIX, &Account::new(input_a, token_a)),
                StoreKey::derive(DEFAULT_PREFIX, &Account::new(input_b, token_b)),
                "{input_a:?}/{token_a:?} collides with {input_b:?}/{token_b:?}"
            );
        }
    }
}
