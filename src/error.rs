//! Cache-level error types shared across policies, exchanges, and settings.

// self
use crate::{_prelude::*, auth::IdentifierError, obs::FlowKind};

/// Cache-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type SharedSource = Arc<dyn StdError + Send + Sync>;

/// Canonical cache error exposed by public APIs.
///
/// Cloneable so one failed flow can be reported to every caller that waited on it.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token exchange collaborator failed; the source is passed through untouched.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),

	/// An exchange answered without one of the tokens the cache requires.
	#[error("The {flow} response is missing the {missing} token.")]
	IncompleteTokenResponse {
		/// Exchange that produced the response.
		flow: FlowKind,
		/// Token that was absent.
		missing: TokenKind,
	},
	/// A persona alias has no mapping in the alias directory.
	#[error("Identity alias `{alias}` has no mapping.")]
	UnknownIdentityAlias {
		/// Alias exactly as requested.
		alias: String,
	},
	/// An exchange did not finish within its configured bound.
	#[error("The {flow} did not complete within {after}.")]
	Timeout {
		/// Exchange that timed out.
		flow: FlowKind,
		/// Configured bound that elapsed.
		after: Duration,
	},
}

/// Token slots inspected when validating exchange responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
	/// Access token.
	Access,
	/// Refresh token.
	Refresh,
}
impl TokenKind {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised by the cache.
#[derive(Clone, Debug, ThisError)]
pub enum ConfigError {
	/// Settings document could not be parsed.
	#[error("Cache settings are invalid.")]
	InvalidSettings {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: Arc<serde_path_to_error::Error<serde_json::Error>>,
	},
	/// A timeout was configured as zero or negative.
	#[error("The {field} must be positive.")]
	NonPositiveTimeout {
		/// Settings field name.
		field: &'static str,
	},
	/// The record max age was configured as zero or negative.
	#[error("The max_age value must be positive when set.")]
	NonPositiveMaxAge,
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
}

/// Failure reported by a [`TokenExchange`](crate::exchange::TokenExchange) collaborator.
#[derive(Clone, Debug, ThisError)]
#[error("Token exchange failed: {source}")]
pub struct ExchangeError {
	#[source]
	source: SharedSource,
}
impl ExchangeError {
	/// Wraps a collaborator-specific failure.
	pub fn new(src: impl 'static + Send + Sync + StdError) -> Self {
		Self { source: Arc::new(src) }
	}

	/// Wraps a plain message when the collaborator has no richer error type.
	pub fn message(message: impl Into<String>) -> Self {
		let source: Box<dyn StdError + Send + Sync> = message.into().into();

		Self { source: source.into() }
	}
}
