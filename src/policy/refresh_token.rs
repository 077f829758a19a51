// self
use crate::{
	_prelude::*,
	auth::{IdentityDescriptor, RefreshKey, TokenSecret},
	cache::ExchangeRunner,
	exchange::TokenPair,
	policy::{CachePolicy, HitOutcome, PolicyFuture, PolicyKind},
};

/// Caches refresh tokens keyed by user and scope, minting access tokens on every hit.
///
/// The account selection is not part of the key: a second account selection for the same
/// user and scope reuses the first one's refresh token. Prefer [`AccessTokenPolicy`] unless
/// every hit must carry a freshly issued access token.
///
/// [`AccessTokenPolicy`]: crate::policy::AccessTokenPolicy
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshTokenPolicy;
impl CachePolicy for RefreshTokenPolicy {
	type Key = RefreshKey;
	type Record = RefreshTokenRecord;

	fn kind(&self) -> PolicyKind {
		PolicyKind::RefreshToken
	}

	fn key(&self, identity: &IdentityDescriptor) -> Self::Key {
		identity.refresh_key()
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
		let record = RefreshTokenRecord {
			key: identity.refresh_key(),
			refresh_token: pair.refresh_token,
			issued_at: now,
			rotated_at: None,
			rotations: 0,
		};

		(pair.access_token, record)
	}

	fn on_hit<'a>(
		&'a self,
		runner: &'a ExchangeRunner<'a>,
		identity: &'a IdentityDescriptor,
		record: Self::Record,
		now: OffsetDateTime,
	) -> PolicyFuture<'a, HitOutcome<Self::Record>> {
		Box::pin(async move {
			let pair = runner.refresh(&record.refresh_token, identity.scope()).await?;
			let record = record.rotate(pair.refresh_token, now);

			Ok(HitOutcome::Rotate { access_token: pair.access_token, record })
		})
	}
}

/// Refresh token cached for a user/scope pair; replaced after every rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
	/// User/scope pair the token was issued for.
	pub key: RefreshKey,
	/// Latest refresh token returned by the authorization server.
	pub refresh_token: TokenSecret,
	/// Instant the authorization flow stored the record.
	pub issued_at: OffsetDateTime,
	/// Instant of the latest rotation, if any.
	pub rotated_at: Option<OffsetDateTime>,
	/// Number of successful rotations.
	pub rotations: u64,
}
impl RefreshTokenRecord {
	/// Returns the record with `refresh_token` swapped in.
	pub fn rotate(mut self, refresh_token: TokenSecret, now: OffsetDateTime) -> Self {
		self.refresh_token = refresh_token;
		self.rotated_at = Some(now);
		self.rotations += 1;

		self
	}
}
