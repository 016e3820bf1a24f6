//! The coalescing dispatcher.
//!
//! Orchestrates a classification: cached results return immediately; for a
//! cold key exactly one caller (the leader) triggers the oracle call through
//! the bounded scheduler while every concurrent caller for the same key
//! subscribes to a shared broadcast and suspends. The leader's unit of work
//! validates the oracle output against the catalog, memoizes it per the cache
//! policy, and fans the identical result out to all waiters.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use finder_core::config::DispatchConfig;
use finder_core::{Catalog, ClassificationResult, OracleClient};

use crate::cache::ResultCache;
use crate::scheduler::OracleScheduler;
use crate::{prompt, reply};

struct Inner {
    catalog: Arc<Catalog>,
    oracle: Arc<dyn OracleClient>,
    cache: ResultCache,
    scheduler: OracleScheduler,
    /// Transient registry of keys with an oracle call in flight. Entries are
    /// created by the first cache-missing caller and removed the instant the
    /// publication for that key lands, success or not.
    in_flight: DashMap<String, broadcast::Sender<ClassificationResult>>,
    system_instruction: Arc<str>,
    timeout: Duration,
}

pub struct CoalescingDispatcher {
    inner: Arc<Inner>,
}

impl CoalescingDispatcher {
    pub fn new(
        catalog: Arc<Catalog>,
        oracle: Arc<dyn OracleClient>,
        config: &DispatchConfig,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                system_instruction: prompt::system_instruction(&catalog).into(),
                cache: ResultCache::new(config.cache_policy, config.normalize_keys),
                scheduler: OracleScheduler::new(config.max_concurrency),
                in_flight: DashMap::new(),
                catalog,
                oracle,
                timeout: oracle_timeout,
            }),
        }
    }

    /// Classify an utterance. Callable concurrently and unboundedly; N
    /// concurrent calls for one previously-unseen utterance produce exactly
    /// one oracle call and N identical results.
    pub async fn classify(&self, utterance: &str) -> ClassificationResult {
        let key = self.inner.cache.key_for(utterance);

        if let Some(hit) = self.inner.cache.get(&key) {
            metrics::counter!("finder_cache_hits_total").increment(1);
            tracing::debug!(key = %key, "cache hit");
            return hit;
        }

        // Check-and-register is a single map entry operation: the entry guard
        // serializes racing callers, so exactly one registration wins per key.
        let mut rx = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                metrics::counter!("finder_coalesced_waiters_total").increment(1);
                tracing::debug!(key = %key, "joining in-flight classification");
                entry.get().subscribe()
            }
            Entry::Vacant(entry) => {
                let (tx, rx) = broadcast::channel(1);
                entry.insert(tx.clone());
                // The publication runs detached: a leader whose own caller
                // disconnects mid-flight must still resolve the key for every
                // other waiter and must still deregister it.
                let inner = self.inner.clone();
                let key = key.clone();
                let utterance = utterance.to_string();
                tokio::spawn(async move {
                    let result = inner.lead(&key, &utterance).await;
                    inner.cache.insert(key.clone(), result.clone());
                    // Deregister only after the cache write, so a caller
                    // arriving in between cannot re-issue the call for a
                    // stored result.
                    inner.in_flight.remove(&key);
                    let _ = tx.send(result);
                });
                rx
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            // Sender dropped without publishing. Does not happen in normal
            // operation; surface a failure rather than hanging.
            Err(_) => ClassificationResult::failure(
                "classification aborted before a result was published",
            ),
        }
    }

    /// Number of memoized results.
    pub fn cached_entries(&self) -> usize {
        self.inner.cache.len()
    }
}

impl Inner {
    /// Leader path: re-check the cache, then run the oracle unit of work
    /// under the concurrency bound.
    async fn lead(&self, key: &str, utterance: &str) -> ClassificationResult {
        // A previous leader may have published between this caller's cache
        // miss and its registration winning.
        if let Some(hit) = self.cache.get(key) {
            return hit;
        }

        metrics::counter!("finder_oracle_calls_total").increment(1);

        let oracle = self.oracle.clone();
        let catalog = self.catalog.clone();
        let system = self.system_instruction.clone();
        let user = prompt::user_message(utterance);
        let budget = self.timeout;

        let outcome = self
            .scheduler
            .run(move || async move {
                // The client owns its transport timeout; this outer budget is
                // containment against a client that ignores that contract.
                let raw = match tokio::time::timeout(budget, oracle.complete(&system, &user)).await
                {
                    Ok(Ok(raw)) => raw,
                    Ok(Err(e)) => {
                        return ClassificationResult::failure(format!("oracle call failed: {}", e))
                    }
                    Err(_) => {
                        return ClassificationResult::failure(format!(
                            "oracle call exceeded the {}ms budget",
                            budget.as_millis()
                        ))
                    }
                };
                reply::resolve(&catalog, &raw)
            })
            .await;

        let result = outcome.unwrap_or_else(|e| ClassificationResult::failure(e.to_string()));
        if !result.success {
            metrics::counter!("finder_oracle_failures_total").increment(1);
            tracing::warn!(key = %key, error = ?result.error, "classification failed");
        }
        result
    }
}
