//! Credential cache core with per-key singleflight and hit/miss accounting.
//!
//! [`CredentialCache::resolve`] joins the in-flight resolution for the policy's store key
//! before looking at the store. The first caller runs the lookup (and any exchange); callers
//! that joined while it ran receive the same outcome, success or failure, without starting
//! an exchange of their own. The flight closes once settled, so the next caller starts fresh.
//! Flights are per key; an in-flight exchange for one identity never delays another. The
//! store lock is only held for single map operations and never across an exchange.

mod flight;
mod metrics;
mod runner;

pub use self::{
	metrics::{CacheMetrics, CacheStats},
	runner::ExchangeRunner,
};

// self
use crate::{
	_prelude::*,
	auth::{
		AliasDirectory, AliasResolution, IdentityDescriptor, StaticAliasDirectory, TokenAlias,
		TokenSecret,
	},
	exchange::TokenExchange,
	obs::{self, LookupOutcome},
	policy::{AccessTokenSource, CachePolicy, HitOutcome, PolicyKind, SourceFuture},
	settings::CacheSettings,
	store::MemoryStore,
};
use self::flight::FlightRegistry;

/// Keyed credential cache driven by a [`CachePolicy`].
pub struct CredentialCache<P>
where
	P: CachePolicy,
{
	policy: P,
	exchange: Arc<dyn TokenExchange>,
	aliases: Arc<dyn AliasDirectory>,
	settings: CacheSettings,
	store: MemoryStore<P::Key, P::Record>,
	metrics: Arc<CacheMetrics>,
	flights: FlightRegistry<P::Key>,
}
impl<P> CredentialCache<P>
where
	P: CachePolicy,
{
	/// Creates an empty cache with default settings and no persona mappings.
	pub fn new(policy: P, exchange: Arc<dyn TokenExchange>) -> Self {
		Self {
			policy,
			exchange,
			aliases: Arc::new(StaticAliasDirectory::default()),
			settings: CacheSettings::default(),
			store: MemoryStore::default(),
			metrics: Default::default(),
			flights: FlightRegistry::default(),
		}
	}

	/// Sets the directory used to resolve persona aliases.
	pub fn with_aliases(mut self, aliases: Arc<dyn AliasDirectory>) -> Self {
		self.aliases = aliases;

		self
	}

	/// Replaces the settings after validating them.
	///
	/// `settings.policy` is informational here; the policy is fixed by the type parameter.
	pub fn with_settings(mut self, settings: CacheSettings) -> Result<Self> {
		settings.validate()?;

		self.settings = settings;

		Ok(self)
	}

	/// Active settings.
	pub fn settings(&self) -> &CacheSettings {
		&self.settings
	}

	/// Policy driving this cache.
	pub fn policy(&self) -> &P {
		&self.policy
	}

	/// Shared hit/miss counters.
	pub fn metrics(&self) -> Arc<CacheMetrics> {
		self.metrics.clone()
	}

	/// Snapshot of the hit/miss counters.
	pub fn stats(&self) -> CacheStats {
		self.metrics.snapshot()
	}

	/// Returns the record stored for `identity` without counting a lookup.
	pub fn record(&self, identity: &IdentityDescriptor) -> Option<P::Record> {
		self.store.fetch(&self.policy.key(identity))
	}

	/// Number of cached records.
	pub fn len(&self) -> usize {
		self.store.len()
	}

	/// Returns true when nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Number of keys with a resolution currently running.
	pub fn in_flight(&self) -> usize {
		self.flights.len()
	}

	/// Returns an access token for `identity`.
	///
	/// A miss runs the authorization flow and stores the result; a hit is served by the
	/// policy. Failed exchanges leave the store exactly as it was.
	pub async fn resolve(&self, identity: &IdentityDescriptor) -> Result<TokenSecret> {
		self.resolve_at(identity, OffsetDateTime::now_utc()).await
	}

	/// Same as [`resolve`](Self::resolve), judging record age and stamping records at `now`.
	pub async fn resolve_at(
		&self,
		identity: &IdentityDescriptor,
		now: OffsetDateTime,
	) -> Result<TokenSecret> {
		let key = self.policy.key(identity);
		let flight = self.flights.join(&key);
		let _turn = flight.turn().await;

		if let Some(outcome) = flight.settled() {
			let lookup = if outcome.is_ok() { LookupOutcome::Hit } else { LookupOutcome::Miss };

			self.count(lookup, &key);

			return outcome;
		}

		let outcome = self.lookup(identity, &key, now).await;

		self.flights.land(&key, &flight, &outcome);

		outcome
	}

	/// Resolves a symbolic alias for `scope`.
	///
	/// Sentinel aliases return their literal value and leave the counters untouched. Unmapped
	/// personas fail with [`Error::UnknownIdentityAlias`] before the store is consulted.
	pub async fn resolve_alias(
		&self,
		alias: &TokenAlias,
		scope: &str,
	) -> Result<Option<TokenSecret>> {
		match alias.resolve(scope, self.aliases.as_ref())? {
			AliasResolution::Sentinel(sentinel) => Ok(sentinel.token()),
			AliasResolution::Identity(identity) => self.resolve(&identity).await.map(Some),
		}
	}

	async fn lookup(
		&self,
		identity: &IdentityDescriptor,
		key: &P::Key,
		now: OffsetDateTime,
	) -> Result<TokenSecret> {
		let runner = ExchangeRunner::new(self.exchange.as_ref(), &self.settings);
		let cached = self
			.store
			.fetch(key)
			.filter(|record| self.policy.is_fresh(record, &self.settings, now));

		match cached {
			Some(record) => {
				self.count(LookupOutcome::Hit, key);

				match self.policy.on_hit(&runner, identity, record, now).await? {
					HitOutcome::Reuse(access_token) => Ok(access_token),
					HitOutcome::Rotate { access_token, record } => {
						self.store.save(key.clone(), record);

						Ok(access_token)
					},
				}
			},
			None => {
				self.count(LookupOutcome::Miss, key);

				let pair = runner.authorize(identity).await?;
				let (access_token, record) = self.policy.admit(identity, pair, now);

				self.store.save(key.clone(), record);

				Ok(access_token)
			},
		}
	}

	fn count(&self, outcome: LookupOutcome, key: &P::Key) {
		let kind = self.policy.kind();

		match outcome {
			LookupOutcome::Hit => self.metrics.record_hit(),
			LookupOutcome::Miss => self.metrics.record_miss(),
		}

		obs::record_lookup(kind, outcome);
		obs::trace_lookup(kind, outcome, &self.policy.fingerprint(key));
	}
}
impl<P> AccessTokenSource for CredentialCache<P>
where
	P: CachePolicy,
{
	fn policy_kind(&self) -> PolicyKind {
		self.policy.kind()
	}

	fn access_token<'a>(
		&'a self,
		identity: &'a IdentityDescriptor,
	) -> SourceFuture<'a, TokenSecret> {
		Box::pin(self.resolve(identity))
	}

	fn access_token_for_alias<'a>(
		&'a self,
		alias: &'a TokenAlias,
		scope: &'a str,
	) -> SourceFuture<'a, Option<TokenSecret>> {
		Box::pin(self.resolve_alias(alias, scope))
	}

	fn stats(&self) -> CacheStats {
		self.metrics.snapshot()
	}
}
impl<P> Debug for CredentialCache<P>
where
	P: CachePolicy,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialCache")
			.field("policy", &self.policy.kind())
			.field("settings", &self.settings)
			.field("records", &self.store.len())
			.field("stats", &self.metrics.snapshot())
			.finish()
	}
}
