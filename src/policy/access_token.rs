// self
use crate::{
	_prelude::*,
	auth::{IdentityDescriptor, TokenSecret},
	cache::ExchangeRunner,
	exchange::TokenPair,
	policy::{CachePolicy, HitOutcome, PolicyFuture, PolicyKind},
	settings::CacheSettings,
};

/// Caches access tokens keyed by the full identity descriptor.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessTokenPolicy;
impl CachePolicy for AccessTokenPolicy {
	type Key = IdentityDescriptor;
	type Record = AccessTokenRecord;

	fn kind(&self) -> PolicyKind {
		PolicyKind::AccessToken
	}

	fn key(&self, identity: &IdentityDescriptor) -> Self::Key {
		identity.clone()
	}

	fn fingerprint(&self, key: &Self::Key) -> String {
		key.fingerprint()
	}

	fn admit(
		&self,
		identity: &IdentityDescriptor,
		pair: TokenPair,
		now: OffsetDateTime,
	) -> (TokenSecret, Self::Record) {
		let record = AccessTokenRecord {
			identity: identity.clone(),
			access_token: pair.access_token.clone(),
			cached_at: now,
		};

		(pair.access_token, record)
	}

	fn is_fresh(
		&self,
		record: &Self::Record,
		settings: &CacheSettings,
		now: OffsetDateTime,
	) -> bool {
		settings.max_age.is_none_or(|max_age| !record.is_older_than(max_age, now))
	}

	fn on_hit<'a>(
		&'a self,
		_runner: &'a ExchangeRunner<'a>,
		_identity: &'a IdentityDescriptor,
		record: Self::Record,
		_now: OffsetDateTime,
	) -> PolicyFuture<'a, HitOutcome<Self::Record>> {
		Box::pin(async move { Ok(HitOutcome::Reuse(record.access_token)) })
	}
}

/// Access token cached for one identity; never mutated once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
	/// Identity the token was issued for.
	pub identity: IdentityDescriptor,
	/// Cached access token.
	pub access_token: TokenSecret,
	/// Instant the record was stored.
	pub cached_at: OffsetDateTime,
}
impl AccessTokenRecord {
	/// Returns true once `max_age` has elapsed since the record was stored.
	pub fn is_older_than(&self, max_age: Duration, now: OffsetDateTime) -> bool {
		now - self.cached_at >= max_age
	}
}
