//! Memoization of transform results keyed by input content

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::DealsResult;
use crate::types::Deliverables;

/// SHA-256 over both input files (each length-prefixed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputFingerprint([u8; 32]);

impl InputFingerprint {
    pub fn of(deals: &[u8], headcount: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        for part in [deals, headcount] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough for logs
        f.write_str(&self.to_hex()[..12])
    }
}

/// In-process map from input fingerprint to the derived views
#[derive(Debug, Default)]
pub struct TransformCache {
    entries: HashMap<InputFingerprint, Arc<Deliverables>>,
    hits: u64,
    misses: u64,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &InputFingerprint) -> Option<Arc<Deliverables>> {
        self.entries.get(fingerprint).cloned()
    }

    /// Return the cached views or compute and store them. Errors are not cached.
    pub fn get_or_compute<F>(
        &mut self,
        fingerprint: InputFingerprint,
        compute: F,
    ) -> DealsResult<Arc<Deliverables>>
    where
        F: FnOnce() -> DealsResult<Deliverables>,
    {
        if let Some(hit) = self.entries.get(&fingerprint) {
            self.hits += 1;
            debug!(%fingerprint, "transform cache hit");
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        debug!(%fingerprint, "transform cache miss");
        let computed = Arc::new(compute()?);
        self.entries.insert(fingerprint, Arc::clone(&computed));
        Ok(computed)
    }

    /// Drop one entry; true if it was present
    pub fn invalidate(&mut self, fingerprint: &InputFingerprint) -> bool {
        self.entries.remove(fingerprint).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DealsError;
    use crate::types::Table;

    fn views() -> Deliverables {
        Deliverables {
            internal: Table::new(["a"]),
            client: Table::new(["b"]),
            zinnov: Table::new(["c"]),
        }
    }

    #[test]
    fn test_fingerprint_depends_on_split_point() {
        assert_ne!(InputFingerprint::of(b"ab", b"c"), InputFingerprint::of(b"a", b"bc"));
        assert_eq!(InputFingerprint::of(b"ab", b"c"), InputFingerprint::of(b"ab", b"c"));
        assert_eq!(InputFingerprint::of(b"", b"").to_hex().len(), 64);
    }

    #[test]
    fn test_second_lookup_hits() {
        let mut cache = TransformCache::new();
        let key = InputFingerprint::of(b"deals", b"headcount");
        let mut calls = 0;

        let first = cache
            .get_or_compute(key, || {
                calls += 1;
                Ok(views())
            })
            .unwrap();
        let second = cache
            .get_or_compute(key, || {
                calls += 1;
                Ok(views())
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = TransformCache::new();
        let key = InputFingerprint::of(b"d", b"h");
        cache.get_or_compute(key, || Ok(views())).unwrap();

        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert!(cache.get(&key).is_none());

        cache.get_or_compute(key, || Ok(views())).unwrap();
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_clear_drops_every_entry() {
        let mut cache = TransformCache::new();
        let first = InputFingerprint::of(b"d1", b"h");
        let second = InputFingerprint::of(b"d2", b"h");
        cache.get_or_compute(first, || Ok(views())).unwrap();
        cache.get_or_compute(second, || Ok(views())).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&first).is_none());

        cache.get_or_compute(first, || Ok(views())).unwrap();
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = TransformCache::new();
        let key = InputFingerprint::of(b"d", b"h");
        let result = cache.get_or_compute(key, || Err(DealsError::Config("boom".into())));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
