//! Symbolic token aliases: named personas plus reserved negative-path sentinels.
//!
//! Callers that exercise authentication failures need syntactically valid but useless
//! credentials. The three reserved aliases produce those values without touching the cache or
//! the token exchange; every other alias names a persona that an [`AliasDirectory`] maps to a
//! concrete user and account selection.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, IdentityDescriptor, PersonaId, TokenSecret, UserId},
};

/// Token alias requested by a caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenAlias {
	/// Named persona resolved through an [`AliasDirectory`].
	Persona(PersonaId),
	/// Yields the literal token `"foo"`.
	InvalidFoo,
	/// Yields an empty token.
	InvalidEmpty,
	/// Yields no token at all.
	InvalidOmit,
}
impl TokenAlias {
	/// Reserved name of [`TokenAlias::InvalidFoo`].
	pub const INVALID_FOO: &'static str = "INVALID_FOO";
	/// Reserved name of [`TokenAlias::InvalidEmpty`].
	pub const INVALID_EMPTY: &'static str = "INVALID_EMPTY";
	/// Reserved name of [`TokenAlias::InvalidOmit`].
	pub const INVALID_OMIT: &'static str = "INVALID_OMIT";

	/// Wraps a persona alias.
	pub fn persona(persona: PersonaId) -> Self {
		Self::Persona(persona)
	}

	/// Returns the sentinel credential for reserved aliases, `None` for personas.
	pub fn sentinel(&self) -> Option<SentinelCredential> {
		match self {
			TokenAlias::Persona(_) => None,
			TokenAlias::InvalidFoo => Some(SentinelCredential::Foo),
			TokenAlias::InvalidEmpty => Some(SentinelCredential::Empty),
			TokenAlias::InvalidOmit => Some(SentinelCredential::Omit),
		}
	}

	/// Resolves the alias for `scope` using `directory`.
	///
	/// Sentinels never consult the directory.
	pub fn resolve(&self, scope: &str, directory: &dyn AliasDirectory) -> Result<AliasResolution> {
		let persona = match self {
			TokenAlias::Persona(persona) => persona,
			TokenAlias::InvalidFoo => return Ok(AliasResolution::Sentinel(SentinelCredential::Foo)),
			TokenAlias::InvalidEmpty =>
				return Ok(AliasResolution::Sentinel(SentinelCredential::Empty)),
			TokenAlias::InvalidOmit =>
				return Ok(AliasResolution::Sentinel(SentinelCredential::Omit)),
		};
		let PersonaIdentity { user_id, selected_accounts } = directory
			.lookup(persona)
			.ok_or_else(|| Error::UnknownIdentityAlias { alias: persona.to_string() })?;

		Ok(AliasResolution::Identity(IdentityDescriptor::new(user_id, selected_accounts, scope)))
	}
}
impl Display for TokenAlias {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			TokenAlias::Persona(persona) => f.write_str(persona),
			TokenAlias::InvalidFoo => f.write_str(Self::INVALID_FOO),
			TokenAlias::InvalidEmpty => f.write_str(Self::INVALID_EMPTY),
			TokenAlias::InvalidOmit => f.write_str(Self::INVALID_OMIT),
		}
	}
}
impl FromStr for TokenAlias {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			Self::INVALID_FOO => Ok(Self::InvalidFoo),
			Self::INVALID_EMPTY => Ok(Self::InvalidEmpty),
			Self::INVALID_OMIT => Ok(Self::InvalidOmit),
			_ => PersonaId::new(s).map(Self::Persona),
		}
	}
}

/// Deliberately unusable credential produced by a reserved alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentinelCredential {
	/// The literal string `"foo"`.
	Foo,
	/// The empty string.
	Empty,
	/// No credential.
	Omit,
}
impl SentinelCredential {
	/// Materializes the sentinel as the token value a caller would send.
	pub fn token(self) -> Option<TokenSecret> {
		match self {
			SentinelCredential::Foo => Some(TokenSecret::new("foo")),
			SentinelCredential::Empty => Some(TokenSecret::new("")),
			SentinelCredential::Omit => None,
		}
	}
}

/// Outcome of resolving a [`TokenAlias`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasResolution {
	/// The alias maps to a real identity that must go through the cache.
	Identity(IdentityDescriptor),
	/// The alias is a sentinel; no cache interaction is needed.
	Sentinel(SentinelCredential),
}

/// Concrete identity fields a persona stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaIdentity {
	/// User the persona logs in as.
	pub user_id: UserId,
	/// Account selection the persona consents to.
	pub selected_accounts: String,
}

/// Lookup contract mapping persona names to identity fields.
pub trait AliasDirectory
where
	Self: Send + Sync,
{
	/// Returns the identity fields for `persona`, if mapped.
	fn lookup(&self, persona: &PersonaId) -> Option<PersonaIdentity>;
}

/// Fixed persona table populated up front.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticAliasDirectory(HashMap<PersonaId, PersonaIdentity>);
impl StaticAliasDirectory {
	/// Adds or replaces a persona mapping.
	pub fn with_persona(
		mut self,
		persona: PersonaId,
		user_id: UserId,
		selected_accounts: impl Into<String>,
	) -> Self {
		let identity = PersonaIdentity { user_id, selected_accounts: selected_accounts.into() };

		self.0.insert(persona, identity);

		self
	}

	/// Number of mapped personas.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no persona is mapped.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AliasDirectory for StaticAliasDirectory {
	fn lookup(&self, persona: &PersonaId) -> Option<PersonaIdentity> {
		self.0.get(persona).cloned()
	}
}
impl FromIterator<(PersonaId, PersonaIdentity)> for StaticAliasDirectory {
	fn from_iter<I: IntoIterator<Item = (PersonaId, PersonaIdentity)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
