// self
use crate::{_prelude::*, auth::TokenSecret};

/// One resolution in progress for a store key.
///
/// Callers take turns on `turn`. The first caller to get a turn runs the resolution and
/// settles the outcome; everyone who joined before that reads the settled outcome instead of
/// starting a second exchange.
#[derive(Debug, Default)]
pub(crate) struct Flight {
	turn: AsyncMutex<()>,
	outcome: Mutex<Option<Result<TokenSecret>>>,
}
impl Flight {
	pub(crate) async fn turn(&self) -> async_lock::MutexGuard<'_, ()> {
		self.turn.lock().await
	}

	/// Outcome of the caller that ran this flight, if it finished.
	pub(crate) fn settled(&self) -> Option<Result<TokenSecret>> {
		self.outcome.lock().clone()
	}

	fn settle(&self, outcome: &Result<TokenSecret>) {
		*self.outcome.lock() = Some(outcome.clone());
	}
}

/// In-flight resolutions keyed by store key; entries live only while a resolution runs.
pub(crate) struct FlightRegistry<K>(Mutex<HashMap<K, Arc<Flight>>>);
impl<K> FlightRegistry<K>
where
	K: Clone + Eq + Hash,
{
	/// Returns the running flight for `key`, opening a new one when none is running.
	pub(crate) fn join(&self, key: &K) -> Arc<Flight> {
		self.0.lock().entry(key.clone()).or_default().clone()
	}

	/// Publishes `outcome` to the flight's waiters and closes it for new callers.
	pub(crate) fn land(&self, key: &K, flight: &Arc<Flight>, outcome: &Result<TokenSecret>) {
		flight.settle(outcome);

		let mut flights = self.0.lock();

		if flights.get(key).is_some_and(|current| Arc::ptr_eq(current, flight)) {
			flights.remove(key);
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.0.lock().len()
	}
}
impl<K> Default for FlightRegistry<K> {
	fn default() -> Self {
		Self(Mutex::new(HashMap::new()))
	}
}
