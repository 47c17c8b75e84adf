//! Paginated listing support.
//!
//! This module grows the requested product count in fixed steps up to a
//! cap, and memoizes fetched records by the limit they were fetched with.
//! Neither piece is needed by the fetcher itself.

use crate::models::Record;
use std::collections::HashMap;
use std::num::NonZeroU32;
use tracing::debug;

/// How the listing limit grows with each "fetch more".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSchedule {
    initial: NonZeroU32,
    step: NonZeroU32,
    max: NonZeroU32,
}

impl Default for LimitSchedule {
    fn default() -> Self {
        Self::new(5, 5, 100)
    }
}

impl From<&crate::config::ListingConfig> for LimitSchedule {
    fn from(config: &crate::config::ListingConfig) -> Self {
        Self::new(config.initial_limit, config.step, config.max_limit)
    }
}

impl LimitSchedule {
    /// Zero values are raised to one.
    pub fn new(initial: u32, step: u32, max: u32) -> Self {
        let nonzero = |n: u32| NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
        Self {
            initial: nonzero(initial),
            step: nonzero(step),
            max: nonzero(max),
        }
    }

    pub fn max(&self) -> NonZeroU32 {
        self.max
    }

    /// First limit to request.
    pub fn start(&self) -> NonZeroU32 {
        self.initial.min(self.max)
    }

    /// Limit after one more step, or `None` once the cap is reached.
    pub fn next(&self, current: NonZeroU32) -> Option<NonZeroU32> {
        if self.is_exhausted(current) {
            return None;
        }

        Some(current.saturating_add(self.step.get()).min(self.max))
    }

    pub fn is_exhausted(&self, current: NonZeroU32) -> bool {
        current >= self.max
    }
}

/// Records memoized by the limit they were fetched with.
///
/// Empty results are not stored, so a failed fetch is retried on the next
/// request for the same limit.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<NonZeroU32, Vec<Record>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the records for `limit`, calling `fetch` only on a miss.
    pub fn get_or_fetch<F>(&mut self, limit: NonZeroU32, fetch: F) -> Vec<Record>
    where
        F: FnOnce(NonZeroU32) -> Vec<Record>,
    {
        if let Some(records) = self.entries.get(&limit) {
            debug!(limit = limit.get(), "Cache hit");
            return records.clone();
        }

        let records = fetch(limit);
        if !records.is_empty() {
            self.entries.insert(limit, records.clone());
        }
        records
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Listing state: the current limit, its growth schedule and the cache.
pub struct Session<F> {
    schedule: LimitSchedule,
    limit: NonZeroU32,
    cache: FetchCache,
    fetch: F,
}

impl<F> Session<F>
where
    F: FnMut(NonZeroU32) -> Vec<Record>,
{
    /// Start at the schedule's initial limit.
    pub fn new(schedule: LimitSchedule, fetch: F) -> Self {
        let limit = schedule.start();
        Self::starting_at(schedule, limit, fetch)
    }

    /// Start at an explicit limit, capped at the schedule maximum.
    pub fn starting_at(schedule: LimitSchedule, limit: NonZeroU32, fetch: F) -> Self {
        Self {
            schedule,
            limit: limit.min(schedule.max()),
            cache: FetchCache::new(),
            fetch,
        }
    }

    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// Records for the current limit.
    pub fn current(&mut self) -> Vec<Record> {
        let fetch = &mut self.fetch;
        let records = self.cache.get_or_fetch(self.limit, |limit| fetch(limit));
        debug!(
            limit = self.limit.get(),
            cached_limits = self.cache.len(),
            "Listing ready"
        );
        records
    }

    /// Grow the limit by one step. Returns `false` at the cap.
    pub fn fetch_more(&mut self) -> bool {
        match self.schedule.next(self.limit) {
            Some(next) => {
                debug!(from = self.limit.get(), to = next.get(), "Growing listing limit");
                self.limit = next;
                true
            }
            None => false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.schedule.is_exhausted(self.limit)
    }

    /// Drop memoized records so the next `current` hits the network.
    pub fn refresh(&mut self) {
        self.cache.clear();
    }
}
