//! Single-slot, time-expiring cache for the index catalog.
//!
//! The catalog changes rarely compared to how often an assistant asks for
//! it, so one successful listing is reused for [`INDEX_CACHE_TTL`]. There is
//! exactly one slot per [`IndexCache`]; a refresh replaces it wholesale.
//!
//! Concurrent misses are not coalesced: two callers that both find the slot
//! stale will both fetch, and the last write wins.

use crate::backend::Backend;
use crate::error::BackendResult;
use crate::types::IndexSummary;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// How long a catalog listing stays fresh.
pub const INDEX_CACHE_TTL: Duration = Duration::from_millis(600_000);

/// Time source for cache freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Vec<IndexSummary>>,
    captured_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < ttl
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CachedIndices {
    pub indices: Arc<Vec<IndexSummary>>,
    pub was_cached: bool,
}

/// Cache of the most recent index listing.
pub struct IndexCache {
    slot: RwLock<Option<CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl IndexCache {
    /// Creates an empty cache on the system clock with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            clock,
            ttl: INDEX_CACHE_TTL,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached listing if fresh, otherwise fetches a new one.
    ///
    /// # Errors
    ///
    /// Propagates the backend error on a failed refresh. The slot is left
    /// exactly as it was.
    pub async fn get_indices(&self, backend: &dyn Backend) -> BackendResult<CachedIndices> {
        let now = self.clock.now();

        if let Some(indices) = self.fresh(now) {
            tracing::debug!(count = indices.len(), "index list served from cache");
            return Ok(CachedIndices {
                indices,
                was_cached: true,
            });
        }

        let raw = backend.cat_indices().await?;
        let indices: Arc<Vec<IndexSummary>> =
            Arc::new(raw.into_iter().map(IndexSummary::from).collect());

        // Never held across the await above.
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(CacheEntry {
            value: Arc::clone(&indices),
            captured_at: now,
        });
        tracing::debug!(count = indices.len(), "index list refreshed");

        Ok(CachedIndices {
            indices,
            was_cached: false,
        })
    }

    fn fresh(&self, now: Instant) -> Option<Arc<Vec<IndexSummary>>> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.value))
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}
