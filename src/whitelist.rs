//! Bounded LRU cache over the whitelist registry
//!
//! Answers "is this subject currently allowed" without a store round-trip on
//! hot paths. Positive decisions are cached with recency ordering; negative
//! decisions are never cached, so a fresh grant is visible on the very next
//! check. Store failures on the read path fail closed.

use crate::error::Result;
use crate::registry::AccessRegistry;
use crate::subject::SubjectKey;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::warn;

/// Advisory floor for the cache capacity
pub const MIN_CACHE_CAPACITY: usize = 10;

/// Hard ceiling for the cache capacity
pub const MAX_CACHE_CAPACITY: usize = 10_000;

/// Capacity used when none is configured
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Whitelist cache configuration
#[derive(Debug, Clone)]
pub struct WhitelistCacheConfig {
    /// Maximum number of cached admission decisions. Values above
    /// [`MAX_CACHE_CAPACITY`] are capped; values below [`MIN_CACHE_CAPACITY`]
    /// are warned about but honored.
    pub max_capacity: usize,
}

impl Default for WhitelistCacheConfig {
    fn default() -> Self {
        WhitelistCacheConfig {
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl WhitelistCacheConfig {
    /// Resolve the configured capacity against the named limits
    fn effective_capacity(&self) -> NonZeroUsize {
        let capacity = match self.max_capacity {
            0 => {
                warn!(
                    "cache capacity 0 is unusable, raising to minimum {}",
                    MIN_CACHE_CAPACITY
                );
                MIN_CACHE_CAPACITY
            }
            n if n > MAX_CACHE_CAPACITY => {
                warn!(
                    "cache capacity {} too high, capping to {}",
                    n, MAX_CACHE_CAPACITY
                );
                MAX_CACHE_CAPACITY
            }
            n => {
                if n < MIN_CACHE_CAPACITY {
                    warn!(
                        "cache capacity {} is below the advisory minimum {}",
                        n, MIN_CACHE_CAPACITY
                    );
                }
                n
            }
        };
        // capacity is nonzero on every arm above
        NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Bounded, recency-ordered mirror of currently-allowed subjects.
///
/// The LRU structure is keyed by subject, so eviction removes exactly the
/// least-recently-used subject from both the recency order and the key index.
/// One mutex covers hit-promote and insert-evict as atomic units; it is not
/// held across registry lookups, so concurrent misses for the same subject
/// may issue duplicate idempotent reads.
///
/// A registry read that races a revocation must not reinstall the revoked
/// subject afterward: the state carries a revocation epoch, and a miss only
/// caches its positive result if no revocation landed while the read was in
/// flight.
pub struct WhitelistCache {
    registry: AccessRegistry,
    state: Mutex<CacheState>,
}

struct CacheState {
    entries: LruCache<SubjectKey, ()>,
    /// Bumped on every revocation; misses snapshot it before the registry
    /// read and refuse to cache if it moved.
    revocation_epoch: u64,
}

impl WhitelistCache {
    /// Build a cache over the given registry
    pub fn new(registry: AccessRegistry, config: WhitelistCacheConfig) -> Self {
        WhitelistCache {
            registry,
            state: Mutex::new(CacheState {
                entries: LruCache::new(config.effective_capacity()),
                revocation_epoch: 0,
            }),
        }
    }

    /// Is this subject currently allowed?
    ///
    /// A cache hit promotes the entry and answers without touching the
    /// store. A miss consults the registry; only a positive answer is
    /// cached, and only if no revocation arrived while the read was in
    /// flight. A store failure denies and logs, never cached, never
    /// surfaced to the requesting actor.
    pub fn allowed(&self, subject: &SubjectKey) -> bool {
        let epoch = {
            let mut state = self.state.lock();
            if state.entries.get(subject).is_some() {
                return true;
            }
            state.revocation_epoch
        };

        match self.registry.is_authorized(subject) {
            Ok(true) => {
                let mut state = self.state.lock();
                // a revocation may have overtaken this read; the answer it
                // saw still stands, but must not linger in the cache
                if state.revocation_epoch == epoch {
                    state.entries.push(subject.clone(), ());
                }
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("admission check failed closed: {}", e);
                false
            }
        }
    }

    /// Grant relay access: durable first, then immediately visible in the
    /// cache. The cache is left untouched if the registry write fails.
    pub fn set_allowed(&self, subject: &SubjectKey) -> Result<()> {
        self.registry.authorize(subject)?;
        self.state.lock().entries.push(subject.clone(), ());
        Ok(())
    }

    /// Revoke relay access and drop any cached positive decision. The cache
    /// is left untouched if the registry write fails.
    pub fn deactivate(&self, subject: &SubjectKey) -> Result<()> {
        self.registry.revoke(subject)?;
        let mut state = self.state.lock();
        state.entries.pop(subject);
        state.revocation_epoch = state.revocation_epoch.wrapping_add(1);
        Ok(())
    }

    /// Whether the subject currently has a cached decision (no promotion)
    pub fn cached(&self, subject: &SubjectKey) -> bool {
        self.state.lock().entries.contains(subject)
    }

    /// Number of cached decisions
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// True when no decisions are cached
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
