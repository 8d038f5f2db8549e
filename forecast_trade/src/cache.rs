//! Caller-owned cache of fetched price history
//!
//! Entries are keyed by instrument and date range and live until the caller
//! invalidates them; the pipeline itself never caches.

use crate::data::DailyBar;
use crate::error::Result;
use crate::provider::{DateRange, InstrumentId, PriceHistoryProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Cache key
pub type CacheKey = (InstrumentId, DateRange);

#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<CacheKey, Arc<Vec<DailyBar>>>,
    hits: u64,
    misses: u64,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached bars or fetch and store them
    pub fn get_or_fetch<P: PriceHistoryProvider + ?Sized>(
        &mut self,
        provider: &P,
        id: &InstrumentId,
        range: &DateRange,
    ) -> Result<Arc<Vec<DailyBar>>> {
        let key = (id.clone(), *range);
        if let Some(bars) = self.entries.get(&key) {
            self.hits += 1;
            debug!(instrument = %id, "price history cache hit");
            return Ok(Arc::clone(bars));
        }

        self.misses += 1;
        let bars = Arc::new(provider.fetch(id, range)?);
        self.entries.insert(key, Arc::clone(&bars));
        Ok(bars)
    }

    /// Cached bars without fetching
    pub fn get(&self, id: &InstrumentId, range: &DateRange) -> Option<Arc<Vec<DailyBar>>> {
        self.entries.get(&(id.clone(), *range)).cloned()
    }

    /// Drop one entry; returns whether it existed
    pub fn invalidate(&mut self, id: &InstrumentId, range: &DateRange) -> bool {
        self.entries.remove(&(id.clone(), *range)).is_some()
    }

    /// Drop every entry of an instrument
    pub fn invalidate_instrument(&mut self, id: &InstrumentId) {
        self.entries.retain(|(cached, _), _| cached != id);
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

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
