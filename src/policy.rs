//! Caching policies and the variant selector.
//!
//! A [`CachePolicy`] decides what a cache entry holds and what a hit costs:
//!
//! - [`AccessTokenPolicy`] (the default) keeps the access token itself. Hits are free, but a
//!   record is never checked against the issuer, so revocation goes unnoticed and only the
//!   optional `max_age` setting bounds staleness.
//! - [`RefreshTokenPolicy`] keeps only the refresh token and mints a fresh access token on
//!   every hit, trading one refresh exchange per hit for freshness. The stored refresh token is
//!   replaced after each successful rotation.
//!
//! Both run through the same [`CredentialCache`] core, and [`build_source`] hides the choice
//! behind [`AccessTokenSource`] so call sites never branch on the active policy.

mod access_token;
mod refresh_token;

pub use access_token::*;
pub use refresh_token::*;

// self
use crate::{
	_prelude::*,
	auth::{AliasDirectory, IdentityDescriptor, TokenAlias, TokenSecret},
	cache::{CacheStats, CredentialCache, ExchangeRunner},
	exchange::{TokenExchange, TokenPair},
	settings::CacheSettings,
};

/// Boxed future returned by [`CachePolicy::on_hit`].
pub type PolicyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;
/// Boxed future returned by [`AccessTokenSource`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Available caching policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
	/// Cache access tokens directly.
	#[default]
	AccessToken,
	/// Cache refresh tokens and mint access tokens on demand.
	RefreshToken,
}
impl PolicyKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PolicyKind::AccessToken => "access_token",
			PolicyKind::RefreshToken => "refresh_token",
		}
	}
}
impl Display for PolicyKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What a policy decided to do with a cache hit.
#[derive(Clone, Debug)]
pub enum HitOutcome<R> {
	/// Hand out the stored token; the record stays as it is.
	Reuse(TokenSecret),
	/// Hand out a newly minted token and overwrite the stored record.
	Rotate {
		/// Access token returned to the caller.
		access_token: TokenSecret,
		/// Record replacing the stored one.
		record: R,
	},
}

/// Strategy plugged into [`CredentialCache`].
pub trait CachePolicy
where
	Self: 'static + Send + Sync,
{
	/// Store key derived from an identity.
	type Key: 'static + Clone + Debug + Eq + Hash + Send + Sync;
	/// Record kept under each key.
	type Record: 'static + Clone + Debug + Send + Sync;

	/// Policy label used for selection and observability.
	fn kind(&self) -> PolicyKind;

	/// Projects `identity` onto the store key.
	fn key(&self, identity: &IdentityDescriptor) -> Self::Key;

	/// Log-safe digest of a key.
	fn fingerprint(&self, key: &Self::Key) -> String;

	/// Builds the record stored after a successful authorization flow.
	fn admit(
		&self,
		identity: &IdentityDescriptor,
		pair: TokenPair,
		now: OffsetDateTime,
	) -> (TokenSecret, Self::Record);

	/// Returns false when a stored record must be treated as a miss.
	fn is_fresh(
		&self,
		_record: &Self::Record,
		_settings: &CacheSettings,
		_now: OffsetDateTime,
	) -> bool {
		true
	}

	/// Serves a cache hit at `now`, optionally calling the token exchange through `runner`.
	fn on_hit<'a>(
		&'a self,
		runner: &'a ExchangeRunner<'a>,
		identity: &'a IdentityDescriptor,
		record: Self::Record,
		now: OffsetDateTime,
	) -> PolicyFuture<'a, HitOutcome<Self::Record>>;
}

/// Policy-agnostic view of a credential cache.
pub trait AccessTokenSource
where
	Self: Send + Sync,
{
	/// Policy backing this source.
	fn policy_kind(&self) -> PolicyKind;

	/// Returns an access token for `identity`, running an exchange when needed.
	fn access_token<'a>(
		&'a self,
		identity: &'a IdentityDescriptor,
	) -> SourceFuture<'a, TokenSecret>;

	/// Resolves `alias` for `scope`; sentinels yield their literal value without caching.
	fn access_token_for_alias<'a>(
		&'a self,
		alias: &'a TokenAlias,
		scope: &'a str,
	) -> SourceFuture<'a, Option<TokenSecret>>;

	/// Snapshot of the hit/miss counters.
	fn stats(&self) -> CacheStats;
}

/// Builds the cache variant selected by `settings.policy`.
pub fn build_source(
	settings: CacheSettings,
	exchange: Arc<dyn TokenExchange>,
	aliases: Arc<dyn AliasDirectory>,
) -> Result<Arc<dyn AccessTokenSource>> {
	let source: Arc<dyn AccessTokenSource> = match settings.policy {
		PolicyKind::AccessToken => Arc::new(
			CredentialCache::new(AccessTokenPolicy, exchange)
				.with_aliases(aliases)
				.with_settings(settings)?,
		),
		PolicyKind::RefreshToken => Arc::new(
			CredentialCache::new(RefreshTokenPolicy, exchange)
				.with_aliases(aliases)
				.with_settings(settings)?,
		),
	};

	Ok(source)
}
