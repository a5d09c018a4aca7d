//! Hashing primitives for the ledger
//!
//! This module provides:
//! - SHA-256 hashing rendered as lowercase hex (the wire form for all
//!   record and block hashes)
//! - The proof-of-work difficulty predicate
//!
//! Hashes here are integrity checks, not authenticity proofs: there is no
//! signing key anywhere in this crate.

use sha2::{Digest, Sha256};

/// Hash arbitrary bytes with SHA-256, lowercase hex output.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Incremental SHA-256 over a fixed sequence of fields.
///
/// Variable-length fields are terminated with a unit separator and optional
/// fields carry a presence tag, so the preimage is unambiguous and
/// reproducible across implementations.
pub struct FieldHasher {
    inner: Sha256,
}

impl FieldHasher {
    /// Start a new digest.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Feed a string field.
    pub fn field(mut self, value: &str) -> Self {
        self.inner.update(value.as_bytes());
        self.inner.update([0x1f]);
        self
    }

    /// Feed an optional string field with a presence tag.
    pub fn optional_field(mut self, value: Option<&str>) -> Self {
        match value {
            Some(v) => {
                self.inner.update([0x01]);
                self.inner.update(v.as_bytes());
            }
            None => self.inner.update([0x00]),
        }
        self.inner.update([0x1f]);
        self
    }

    /// Feed raw bytes (fixed-width fields).
    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.inner.update(value);
        self
    }

    /// Finish, returning lowercase hex.
    pub fn finish(self) -> String {
        hex::encode(self.inner.finalize())
    }
}

impl Default for FieldHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FieldHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldHasher").finish_non_exhaustive()
    }
}

/// True when `hash` has at least `difficulty` leading '0' hex characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.as_bytes().iter().take(difficulty).all(|&b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_deterministic() {
        let hash1 = sha256_hex(b"test data");
        let hash2 = sha256_hex(b"test data");
        assert_eq!(hash1, hash2);

        let hash3 = sha256_hex(b"different data");
        assert_ne!(hash1, hash3);

        // 256-bit digest as hex
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash1, hash1.to_lowercase());
    }

    #[test]
    fn test_field_hasher_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc"
        let h1 = FieldHasher::new().field("ab").field("c").finish();
        let h2 = FieldHasher::new().field("a").field("bc").finish();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_field_hasher_none_differs_from_empty() {
        let h1 = FieldHasher::new().optional_field(None).finish();
        let h2 = FieldHasher::new().optional_field(Some("")).finish();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_meets_difficulty() {
        assert!(meets_difficulty("00ab12", 2));
        assert!(meets_difficulty("000000", 2));
        assert!(!meets_difficulty("0ab120", 2));
        assert!(!meets_difficulty("0", 2));
        // Zero difficulty accepts anything
        assert!(meets_difficulty("ffff", 0));
    }
}
