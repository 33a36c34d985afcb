//! Single-entry response cache for the employee collection.
//!
//! The slot lock is only held to inspect or install state, never across a
//! load. The first caller to miss becomes the loader and publishes its
//! outcome on a `watch` channel; callers that miss while that load is in
//! flight wait on the channel instead of issuing their own fetch.
//!
//! [`ResponseCache::invalidate`] bumps a generation counter. A load that
//! started under an older generation still answers its own callers but is
//! not stored.

use employee_core::{EmployeeCollectionResult, EmployeeError, EmployeeResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

type Outcome = EmployeeResult<EmployeeCollectionResult>;

/// A cached collection and when it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached value, never error-tagged
    pub value: EmployeeCollectionResult,
    /// Fetch time
    pub fetched_at: Instant,
}

impl CacheEntry {
    fn new(value: EmployeeCollectionResult) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    /// Whether the entry is still within `ttl`
    #[must_use]
    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    outcome: watch::Receiver<Option<Outcome>>,
}

#[derive(Debug, Default)]
struct Slot {
    entry: Option<CacheEntry>,
    in_flight: Option<InFlight>,
    generation: u64,
    next_load_id: u64,
}

enum Step<'a> {
    Hit(EmployeeCollectionResult),
    Join(watch::Receiver<Option<Outcome>>),
    Load(LoadTicket<'a>),
}

/// Held by the caller running a load. Dropping it unfinished (a cancelled
/// load) clears the in-flight marker, and waiters start over.
struct LoadTicket<'a> {
    cache: &'a ResponseCache,
    id: u64,
    generation: u64,
    publish: watch::Sender<Option<Outcome>>,
}

impl LoadTicket<'_> {
    fn finish(self, outcome: &Outcome) {
        {
            let mut slot = self.cache.slot.lock();
            match outcome {
                Ok(_) if slot.generation != self.generation => {
                    debug!("Discarding employee fetch that raced an invalidation");
                }
                Ok(value) if value.is_ok() && !self.cache.ttl.is_zero() => {
                    slot.entry = Some(CacheEntry::new(value.clone()));
                }
                Ok(_) => debug!("Not caching error-tagged collection"),
                Err(_) => {}
            }
            slot.release(self.id);
        }
        self.publish.send_replace(Some(outcome.clone()));
    }
}

impl Drop for LoadTicket<'_> {
    fn drop(&mut self) {
        self.cache.slot.lock().release(self.id);
    }
}

impl Slot {
    fn release(&mut self, id: u64) {
        if self.in_flight.as_ref().is_some_and(|f| f.id == id) {
            self.in_flight = None;
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from a fresh entry
    pub hits: u64,
    /// Reads that ran the loader
    pub misses: u64,
    /// Reads that shared a concurrent fetch's outcome
    pub shared: u64,
}

/// Single-flight, single-key TTL cache
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    slot: Mutex<Slot>,
    hits: AtomicU64,
    misses: AtomicU64,
    shared: AtomicU64,
}

impl ResponseCache {
    /// Create a cache; a zero `ttl` disables storing
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(Slot::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            shared: AtomicU64::new(0),
        }
    }

    /// Configured TTL
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached collection, or run `load` and cache its result.
    ///
    /// Only `Ok` results that are not error-tagged are stored.
    ///
    /// # Errors
    /// Returns whatever `load` (or the concurrent fetch this call joined) returned
    pub async fn get_or_load<F, Fut>(&self, load: F) -> EmployeeResult<EmployeeCollectionResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EmployeeResult<EmployeeCollectionResult>>,
    {
        let mut load = Some(load);

        loop {
            match self.begin() {
                Step::Hit(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("Employee cache hit");
                    return Ok(value);
                }
                Step::Join(mut pending) => {
                    let published = pending
                        .wait_for(Option::is_some)
                        .await
                        .map(|value| (*value).clone());
                    if let Ok(Some(outcome)) = published {
                        self.shared.fetch_add(1, Ordering::Relaxed);
                        debug!("Sharing result of concurrent employee fetch");
                        return outcome;
                    }
                    debug!("Concurrent employee fetch was abandoned, retrying");
                }
                Step::Load(ticket) => {
                    let load = load
                        .take()
                        .ok_or_else(|| EmployeeError::internal("employee cache loader reused"))?;
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    debug!("Employee cache miss, fetching");

                    let outcome = load().await;
                    ticket.finish(&outcome);
                    return outcome;
                }
            }
        }
    }

    fn begin(&self) -> Step<'_> {
        let mut slot = self.slot.lock();

        if let Some(entry) = &slot.entry {
            if entry.is_valid(self.ttl) {
                return Step::Hit(entry.value.clone());
            }
            debug!("Employee cache entry expired");
            slot.entry = None;
        }

        if let Some(in_flight) = &slot.in_flight {
            return Step::Join(in_flight.outcome.clone());
        }

        let (publish, outcome) = watch::channel(None);
        let id = slot.next_load_id;
        slot.next_load_id += 1;
        slot.in_flight = Some(InFlight { id, outcome });
        Step::Load(LoadTicket {
            cache: self,
            id,
            generation: slot.generation,
            publish,
        })
    }

    /// Drop the cached entry so the next read refetches.
    ///
    /// Never waits on an in-flight load; that load's result is not stored.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.entry = None;
        slot.in_flight = None;
        debug!(generation = slot.generation, "Employee cache invalidated");
    }

    /// Current entry, if any (fresh or not)
    #[must_use]
    pub fn peek(&self) -> Option<CacheEntry> {
        self.slot.lock().entry.clone()
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            shared: self.shared.load(Ordering::Relaxed),
        }
    }
}
