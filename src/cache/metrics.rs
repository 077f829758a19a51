// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Thread-safe hit/miss counters for one cache instance.
#[derive(Debug, Default)]
pub struct CacheMetrics {
	hits: AtomicU64,
	misses: AtomicU64,
}
impl CacheMetrics {
	/// Returns the number of lookups served from a stored record.
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	/// Returns the number of lookups that ran an authorization flow.
	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}

	/// Captures both counters.
	pub fn snapshot(&self) -> CacheStats {
		CacheStats { hits: self.hits(), misses: self.misses() }
	}

	pub(crate) fn record_hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}
}

/// Point-in-time copy of [`CacheMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
	/// Lookups served from a stored record.
	pub hits: u64,
	/// Lookups that ran an authorization flow.
	pub misses: u64,
}
impl CacheStats {
	/// Total number of counted lookups.
	pub fn lookups(&self) -> u64 {
		self.hits + self.misses
	}
}
