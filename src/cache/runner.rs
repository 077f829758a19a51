// self
use crate::{
	_prelude::*,
	auth::{IdentityDescriptor, TokenSecret},
	exchange::{ExchangeFuture, TokenExchange, TokenPair, TokenResponse},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	settings::CacheSettings,
};

/// Time-bounded, instrumented access to the token exchange for one resolution.
///
/// Policies receive a runner instead of the raw [`TokenExchange`] so every exchange is
/// bounded by the configured timeout and validated into a complete [`TokenPair`].
#[derive(Clone, Copy)]
pub struct ExchangeRunner<'a> {
	exchange: &'a dyn TokenExchange,
	settings: &'a CacheSettings,
}
impl<'a> ExchangeRunner<'a> {
	pub(crate) fn new(exchange: &'a dyn TokenExchange, settings: &'a CacheSettings) -> Self {
		Self { exchange, settings }
	}

	/// Runs the full authorization flow for `identity`.
	pub async fn authorize(&self, identity: &IdentityDescriptor) -> Result<TokenPair> {
		self.run(
			FlowKind::Authorization,
			"run_authorization_flow",
			self.settings.authorization_timeout,
			self.exchange.run_authorization_flow(identity),
		)
		.await
	}

	/// Exchanges `refresh_token` for a new pair limited to `scope`.
	pub async fn refresh(&self, refresh_token: &TokenSecret, scope: &str) -> Result<TokenPair> {
		self.run(
			FlowKind::Refresh,
			"exchange_refresh_token",
			self.settings.refresh_timeout,
			self.exchange.exchange_refresh_token(refresh_token, scope),
		)
		.await
	}

	async fn run(
		&self,
		kind: FlowKind,
		stage: &'static str,
		limit: Duration,
		exchange: ExchangeFuture<'_, TokenResponse>,
	) -> Result<TokenPair> {
		let span = FlowSpan::new(kind, stage);

		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = tokio::time::timeout(limit.unsigned_abs(), exchange)
					.await
					.map_err(|_| Error::Timeout { flow: kind, after: limit })??;

				response.into_pair(kind)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
		}

		result
	}
}
impl Debug for ExchangeRunner<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExchangeRunner").field("settings", self.settings).finish()
	}
}
