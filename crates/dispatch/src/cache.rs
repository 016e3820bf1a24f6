//! Process-lifetime result cache.

use dashmap::DashMap;

use finder_core::config::CachePolicy;
use finder_core::ClassificationResult;

/// Concurrency-safe memo of completed classifications.
///
/// Grows monotonically for the process lifetime: no eviction, no TTL. The
/// catalog and workload are small and stable within one process. Entries are
/// written once per key; whether failed results are admitted is governed by
/// [`CachePolicy`].
pub struct ResultCache {
    entries: DashMap<String, ClassificationResult>,
    policy: CachePolicy,
    normalize_keys: bool,
}

impl ResultCache {
    pub fn new(policy: CachePolicy, normalize_keys: bool) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            normalize_keys,
        }
    }

    /// Cache key for an utterance.
    pub fn key_for(&self, utterance: &str) -> String {
        if self.normalize_keys {
            utterance
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            utterance.to_string()
        }
    }

    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    /// Whether the policy admits this result.
    pub fn admits(&self, result: &ClassificationResult) -> bool {
        match self.policy {
            CachePolicy::SuccessOnly => result.success,
            CachePolicy::All => true,
        }
    }

    /// Store a result if the policy admits it. First write per key wins.
    pub fn insert(&self, key: String, result: ClassificationResult) {
        if self.admits(&result) {
            self.entries.entry(key).or_insert(result);
        }
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
