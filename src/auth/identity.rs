//! Identity descriptors used as cache keys.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::UserId};

const FIELD_SEPARATOR: u8 = 0x1f;

/// Logical identity a credential is issued for: user, account selection, and scope.
///
/// Two descriptors are equal only when every field matches byte for byte. Account
/// selections and scopes are opaque strings; `"a,b"` and `"b,a"` are different keys.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityDescriptor {
	user_id: UserId,
	selected_accounts: String,
	scope: String,
}
impl IdentityDescriptor {
	/// Creates a descriptor from its three key fields.
	pub fn new(
		user_id: impl Into<UserId>,
		selected_accounts: impl Into<String>,
		scope: impl Into<String>,
	) -> Self {
		Self {
			user_id: user_id.into(),
			selected_accounts: selected_accounts.into(),
			scope: scope.into(),
		}
	}

	/// User the credential belongs to.
	pub fn user_id(&self) -> &UserId {
		&self.user_id
	}

	/// Account selection consented to during the authorization flow.
	pub fn selected_accounts(&self) -> &str {
		&self.selected_accounts
	}

	/// Scope string requested from the authorization server.
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Projects the descriptor onto the user/scope pair used by refresh-token caching.
	pub fn refresh_key(&self) -> RefreshKey {
		RefreshKey { user_id: self.user_id.clone(), scope: self.scope.clone() }
	}

	/// Stable, log-safe digest of the descriptor.
	///
	/// Base64 (no padding) SHA-256 over the unit-separator-joined fields.
	pub fn fingerprint(&self) -> String {
		fingerprint([self.user_id.as_str(), self.selected_accounts.as_str(), self.scope.as_str()])
	}
}
impl Debug for IdentityDescriptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityDescriptor")
			.field("user_id", &self.user_id)
			.field("selected_accounts", &self.selected_accounts)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Key used by refresh-token caching; account selection is not part of it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RefreshKey {
	/// User the refresh token belongs to.
	pub user_id: UserId,
	/// Scope the refresh token was granted for.
	pub scope: String,
}
impl RefreshKey {
	/// Stable, log-safe digest of the key.
	pub fn fingerprint(&self) -> String {
		fingerprint([self.user_id.as_str(), self.scope.as_str()])
	}
}

fn fingerprint<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
	let mut hasher = Sha256::new();

	for (idx, field) in fields.into_iter().enumerate() {
		if idx > 0 {
			hasher.update([FIELD_SEPARATOR]);
		}

		hasher.update(field.as_bytes());
	}

	STANDARD_NO_PAD.encode(hasher.finalize())
}
