//! Token exchange collaborator contract.
//!
//! The cache never speaks OAuth itself. Whoever owns the authorization server integration
//! implements [`TokenExchange`] with the two operations the cache needs: the full interactive
//! authorization flow (login, consent, authorization-code exchange) and the refresh-token
//! exchange. Responses are taken as-is; [`TokenResponse::into_pair`] is the single place that
//! decides whether a response is complete enough to cache.

// self
use crate::{
	_prelude::*,
	auth::{IdentityDescriptor, TokenSecret},
	error::{ExchangeError, TokenKind},
	obs::FlowKind,
};

/// Boxed future returned by [`TokenExchange`] operations.
pub type ExchangeFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, ExchangeError>> + 'a + Send>>;

/// Operations the cache delegates to the authorization server integration.
pub trait TokenExchange
where
	Self: Send + Sync,
{
	/// Runs login, consent, and the authorization-code exchange for `identity`.
	fn run_authorization_flow<'a>(
		&'a self,
		identity: &'a IdentityDescriptor,
	) -> ExchangeFuture<'a, TokenResponse>;

	/// Exchanges `refresh_token` for a new token pair limited to `scope`.
	fn exchange_refresh_token<'a>(
		&'a self,
		refresh_token: &'a TokenSecret,
		scope: &'a str,
	) -> ExchangeFuture<'a, TokenResponse>;
}

/// Raw token endpoint answer; either token may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: Option<TokenSecret>,
	/// Issued (or rotated) refresh token.
	pub refresh_token: Option<TokenSecret>,
	/// Authorization-code artifacts, present for authorization flows.
	pub artifacts: Option<AuthCodeArtifacts>,
}
impl TokenResponse {
	/// Creates a response carrying both tokens.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: Some(TokenSecret::new(access_token)),
			refresh_token: Some(TokenSecret::new(refresh_token)),
			artifacts: None,
		}
	}

	/// Attaches the authorization-code artifacts that produced this response.
	pub fn with_artifacts(mut self, artifacts: AuthCodeArtifacts) -> Self {
		self.artifacts = Some(artifacts);

		self
	}

	/// Drops the refresh token, producing an incomplete response.
	pub fn without_refresh_token(mut self) -> Self {
		self.refresh_token = None;

		self
	}

	/// Drops the access token, producing an incomplete response.
	pub fn without_access_token(mut self) -> Self {
		self.access_token = None;

		self
	}

	/// Requires both tokens, reporting which one is missing otherwise.
	pub fn into_pair(self, flow: FlowKind) -> Result<TokenPair> {
		let access_token = self
			.access_token
			.ok_or(Error::IncompleteTokenResponse { flow, missing: TokenKind::Access })?;
		let refresh_token = self
			.refresh_token
			.ok_or(Error::IncompleteTokenResponse { flow, missing: TokenKind::Refresh })?;

		Ok(TokenPair { access_token, refresh_token })
	}
}

/// Complete access/refresh token pair accepted by the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
	/// Access token handed to callers.
	pub access_token: TokenSecret,
	/// Refresh token retained by refresh-token caching.
	pub refresh_token: TokenSecret,
}

/// Intermediate values of an authorization-code flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeArtifacts {
	/// Authorization code returned by the consent redirect.
	pub code: TokenSecret,
	/// PKCE verifier sent with the code exchange.
	pub code_verifier: Option<TokenSecret>,
}
