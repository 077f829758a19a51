//! User identifiers and validated persona names.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Login identifier of the end user an authorization flow runs for.
///
/// Opaque: compared byte for byte, never trimmed or case-folded. Empty strings and embedded
/// whitespace are legitimate user ids.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);
impl UserId {
	/// Wraps a user id exactly as supplied.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Borrows the identifier exactly as supplied.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for UserId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for UserId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for UserId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<&str> for UserId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for UserId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<UserId> for String {
	fn from(value: UserId) -> Self {
		value.0
	}
}
impl Debug for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "User({:?})", self.0)
	}
}
impl Display for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Symbolic name of a fixture persona mapped to a concrete user.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonaId(String);
impl PersonaId {
	const KIND: &'static str = "Persona";

	/// Creates a new persona name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(Self::KIND, view)?;

		Ok(Self(view.to_owned()))
	}

	/// Borrows the name exactly as supplied.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for PersonaId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for PersonaId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for PersonaId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<PersonaId> for String {
	fn from(value: PersonaId) -> Self {
		value.0
	}
}
impl TryFrom<String> for PersonaId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(Self::KIND, &value)?;

		Ok(Self(value))
	}
}
impl Debug for PersonaId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Persona({})", self.0)
	}
}
impl Display for PersonaId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for PersonaId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
