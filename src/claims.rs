//! Session claim preparation performed before the authorization server issues tokens.
//!
//! [`prepare_session_claims`] augments an already authenticated session with the sharing
//! expiry and the arrangement identifier that end up in the issued tokens. It never creates a
//! session. It also turns off the client's consent requirement so the consent screen is
//! skipped for the trusted, automated flows this cache drives; that override is applied on
//! every call, including calls that find no authenticated session.

// self
use crate::_prelude::*;

/// Name of the sharing expiry claim.
pub const EXPIRY_CLAIM: &str = "exp";
/// Name of the arrangement identifier claim.
pub const ARRANGEMENT_ID_CLAIM: &str = "cdr_arrangement_id";

/// Value type tag carried by a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimValueType {
	/// Free-form string.
	String,
	/// Integer encoded as a decimal string.
	Integer,
}

/// Single name/value claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
	/// Claim name.
	pub name: String,
	/// Claim value, always stored as a string.
	pub value: String,
	/// Type tag of [`Claim::value`].
	pub value_type: ClaimValueType,
}
impl Claim {
	/// Creates a string-valued claim.
	pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into(), value_type: ClaimValueType::String }
	}

	/// Creates an integer-valued claim.
	pub fn integer(name: impl Into<String>, value: i64) -> Self {
		Self { name: name.into(), value: value.to_string(), value_type: ClaimValueType::Integer }
	}

	/// Case-insensitive name comparison.
	pub fn is_named(&self, name: &str) -> bool {
		self.name.eq_ignore_ascii_case(name)
	}
}

/// Claim set of the signed-in subject.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
	authenticated: bool,
	claims: Vec<Claim>,
}
impl SessionIdentity {
	/// Creates an authenticated identity holding `claims`.
	pub fn authenticated(claims: impl IntoIterator<Item = Claim>) -> Self {
		Self { authenticated: true, claims: claims.into_iter().collect() }
	}

	/// Creates an anonymous identity holding `claims`.
	pub fn anonymous(claims: impl IntoIterator<Item = Claim>) -> Self {
		Self { authenticated: false, claims: claims.into_iter().collect() }
	}

	/// Returns true when the subject has signed in.
	pub fn is_authenticated(&self) -> bool {
		self.authenticated
	}

	/// All claims in insertion order.
	pub fn claims(&self) -> &[Claim] {
		&self.claims
	}

	/// First claim named `name` (case-insensitive).
	pub fn find(&self, name: &str) -> Option<&Claim> {
		self.claims.iter().find(|claim| claim.is_named(name))
	}

	/// Every claim named `name` (case-insensitive).
	pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Claim> {
		self.claims.iter().filter(move |claim| claim.is_named(name))
	}

	/// Appends a claim.
	pub fn add(&mut self, claim: Claim) {
		self.claims.push(claim);
	}

	/// Removes and returns the first claim named `name` (case-insensitive).
	pub fn remove_first(&mut self, name: &str) -> Option<Claim> {
		let idx = self.claims.iter().position(|claim| claim.is_named(name))?;

		Some(self.claims.remove(idx))
	}
}

/// Client registration settings consulted during authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPolicy {
	/// OAuth client identifier.
	pub client_id: String,
	/// Whether the consent screen must be shown.
	pub require_consent: bool,
}

/// Validated authorization request handed to token issuance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
	/// Requesting client.
	pub client: ClientPolicy,
	/// Signed-in subject, if any.
	pub subject: Option<SessionIdentity>,
}

/// Prepares session claims using the current UTC clock.
pub fn prepare_session_claims(
	request: &mut AuthorizeRequest,
	sharing_duration_secs: i64,
	arrangement_id: Option<&str>,
) {
	prepare_session_claims_at(
		request,
		sharing_duration_secs,
		arrangement_id,
		OffsetDateTime::now_utc(),
	);
}

/// Prepares session claims as of `now`.
///
/// Adds an integer `exp` claim (`0` for a zero duration, otherwise `now + duration` as Unix
/// seconds), drops the existing arrangement claim, and adds the new one when `arrangement_id`
/// is non-empty. Unauthenticated or absent subjects are left untouched.
pub fn prepare_session_claims_at(
	request: &mut AuthorizeRequest,
	sharing_duration_secs: i64,
	arrangement_id: Option<&str>,
	now: OffsetDateTime,
) {
	request.client.require_consent = false;

	let Some(identity) = request.subject.as_mut().filter(|identity| identity.is_authenticated())
	else {
		return;
	};
	let expiry = if sharing_duration_secs == 0 {
		0
	} else {
		now.unix_timestamp().saturating_add(sharing_duration_secs)
	};

	identity.add(Claim::integer(EXPIRY_CLAIM, expiry));
	identity.remove_first(ARRANGEMENT_ID_CLAIM);

	if let Some(arrangement_id) = arrangement_id.filter(|id| !id.is_empty()) {
		identity.add(Claim::string(ARRANGEMENT_ID_CLAIM, arrangement_id));
	}
}
