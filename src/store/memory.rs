//! Thread-safe in-memory store keyed by a policy's cache key.

// self
use crate::_prelude::*;

type StoreMap<K, R> = Arc<RwLock<HashMap<K, R>>>;

/// Keyed map of credential records shared between concurrent resolutions.
///
/// Locks are only held for the duration of a single map operation, so a slow exchange for
/// one key never blocks readers or writers of another key. At most one record exists per key.
pub struct MemoryStore<K, R>(StoreMap<K, R>);
impl<K, R> MemoryStore<K, R>
where
	K: Eq + Hash,
	R: Clone,
{
	/// Returns a copy of the record stored under `key`, if any.
	pub fn fetch(&self, key: &K) -> Option<R> {
		self.0.read().get(key).cloned()
	}

	/// Inserts or replaces the record stored under `key`.
	pub fn save(&self, key: K, record: R) {
		self.0.write().insert(key, record);
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when the store holds no records.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl<K, R> Clone for MemoryStore<K, R> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<K, R> Default for MemoryStore<K, R> {
	fn default() -> Self {
		Self(Arc::new(RwLock::new(HashMap::new())))
	}
}
impl<K, R> Debug for MemoryStore<K, R> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryStore").field("records", &self.0.read().len()).finish()
	}
}
