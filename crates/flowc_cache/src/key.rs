//! Cache key and content hashing (`spec.md` §4.10): a compilation is
//! identified by its DAG name plus a hash of its two inputs, source and
//! registry, so either changing invalidates the entry.

use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub dag_name: String,
    pub source_hash: String,
    pub registry_hash: String,
}

impl CacheKey {
    pub fn new(dag_name: impl Into<String>, source_hash: impl Into<String>, registry_hash: impl Into<String>) -> Self {
        Self { dag_name: dag_name.into(), source_hash: source_hash.into(), registry_hash: registry_hash.into() }
    }
}

/// Lower-hex SHA-256 of arbitrary bytes. Used for both `source_hash` (over
/// raw source bytes) and `registry_hash` (over a caller-serialized, sorted
/// list of registered signatures) — the cache doesn't need to know which.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest: [u8; 32] = hasher.finalize().into();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_content_sensitive() {
        let a = hash_bytes(b"pipeline source");
        let b = hash_bytes(b"pipeline source");
        let c = hash_bytes(b"different source");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
