//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// self
use oauth2_credential_cache::{
	auth::{IdentityDescriptor, PersonaId, StaticAliasDirectory, TokenSecret, UserId},
	error::ExchangeError,
	exchange::{ExchangeFuture, TokenExchange, TokenResponse},
};

pub const SCOPE: &str = "openid profile bank:accounts.basic:read";

/// Token exchange double that issues numbered tokens and records every call.
///
/// Authorization flows answer `access-<user>-<n>` / `refresh-<user>-<n>`; refresh exchanges
/// answer `access-r<n>` / `refresh-r<n>`, where `n` counts calls of that kind.
#[derive(Default)]
pub struct ScriptedExchange {
	authorizations: AtomicUsize,
	refreshes: AtomicUsize,
	delay: Option<StdDuration>,
	delays: HashMap<String, StdDuration>,
	refresh_delay: Mutex<Option<StdDuration>>,
	fail_authorization: AtomicBool,
	fail_refresh: AtomicBool,
	omit_access_token: AtomicBool,
	omit_refresh_token: AtomicBool,
	refresh_inputs: Mutex<Vec<(String, String)>>,
}
impl ScriptedExchange {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Delays every exchange by `delay`.
	pub fn with_delay(delay: StdDuration) -> Arc<Self> {
		Arc::new(Self { delay: Some(delay), ..Default::default() })
	}

	/// Delays only the authorization flows of `user`.
	pub fn with_user_delay(user: &str, delay: StdDuration) -> Arc<Self> {
		Arc::new(Self { delays: HashMap::from([(user.to_owned(), delay)]), ..Default::default() })
	}

	pub fn authorizations(&self) -> usize {
		self.authorizations.load(Ordering::SeqCst)
	}

	pub fn refreshes(&self) -> usize {
		self.refreshes.load(Ordering::SeqCst)
	}

	/// `(refresh_token, scope)` pairs received by the refresh exchange, in call order.
	pub fn refresh_inputs(&self) -> Vec<(String, String)> {
		self.refresh_inputs.lock().expect("Refresh input log should not be poisoned.").clone()
	}

	/// Delays subsequent refresh exchanges by `delay`.
	pub fn delay_refresh(&self, delay: StdDuration) {
		*self.refresh_delay.lock().expect("Refresh delay should not be poisoned.") = Some(delay);
	}

	pub fn fail_authorization(&self, fail: bool) {
		self.fail_authorization.store(fail, Ordering::SeqCst);
	}

	pub fn fail_refresh(&self, fail: bool) {
		self.fail_refresh.store(fail, Ordering::SeqCst);
	}

	pub fn omit_access_token(&self, omit: bool) {
		self.omit_access_token.store(omit, Ordering::SeqCst);
	}

	pub fn omit_refresh_token(&self, omit: bool) {
		self.omit_refresh_token.store(omit, Ordering::SeqCst);
	}

	fn finish(&self, mut response: TokenResponse) -> TokenResponse {
		if self.omit_access_token.load(Ordering::SeqCst) {
			response = response.without_access_token();
		}
		if self.omit_refresh_token.load(Ordering::SeqCst) {
			response = response.without_refresh_token();
		}

		response
	}
}
impl TokenExchange for ScriptedExchange {
	fn run_authorization_flow<'a>(
		&'a self,
		identity: &'a IdentityDescriptor,
	) -> ExchangeFuture<'a, TokenResponse> {
		Box::pin(async move {
			let n = self.authorizations.fetch_add(1, Ordering::SeqCst) + 1;
			let user = identity.user_id().to_string();

			if let Some(delay) = self.delays.get(&user).copied().or(self.delay) {
				tokio::time::sleep(delay).await;
			}
			if self.fail_authorization.load(Ordering::SeqCst) {
				return Err(ExchangeError::message("consent was rejected"));
			}

			let response =
				TokenResponse::new(format!("access-{user}-{n}"), format!("refresh-{user}-{n}"));

			Ok(self.finish(response))
		})
	}

	fn exchange_refresh_token<'a>(
		&'a self,
		refresh_token: &'a TokenSecret,
		scope: &'a str,
	) -> ExchangeFuture<'a, TokenResponse> {
		Box::pin(async move {
			let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;

			self.refresh_inputs
				.lock()
				.expect("Refresh input log should not be poisoned.")
				.push((refresh_token.expose().to_owned(), scope.to_owned()));

			let delay = *self.refresh_delay.lock().expect("Refresh delay should not be poisoned.");

			if let Some(delay) = delay.or(self.delay) {
				tokio::time::sleep(delay).await;
			}
			if self.fail_refresh.load(Ordering::SeqCst) {
				return Err(ExchangeError::message("refresh token was revoked"));
			}

			Ok(self.finish(TokenResponse::new(format!("access-r{n}"), format!("refresh-r{n}"))))
		})
	}
}

pub fn user(value: &str) -> UserId {
	UserId::new(value)
}

pub fn identity(user_id: &str, accounts: &str) -> IdentityDescriptor {
	IdentityDescriptor::new(user(user_id), accounts, SCOPE)
}

/// Persona table used across tests: `MARY_MOSS` maps to `mmoss` with two accounts.
pub fn personas() -> Arc<StaticAliasDirectory> {
	Arc::new(StaticAliasDirectory::default().with_persona(
		PersonaId::new("MARY_MOSS").expect("Persona fixture should be valid."),
		user("mmoss"),
		"acc-1,acc-2",
	))
}
