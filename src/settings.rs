//! Cache settings: policy selection, exchange timeouts, and optional record max age.

// self
use crate::{_prelude::*, error::ConfigError, policy::PolicyKind};

/// Tunables for a credential cache.
///
/// Durations are expressed in whole seconds when (de)serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
	/// Caching policy used by [`build_source`](crate::policy::build_source).
	pub policy: PolicyKind,
	/// Upper bound for one authorization flow.
	#[serde(with = "seconds", rename = "authorization_timeout_secs")]
	pub authorization_timeout: Duration,
	/// Upper bound for one refresh exchange.
	#[serde(with = "seconds", rename = "refresh_timeout_secs")]
	pub refresh_timeout: Duration,
	/// Age after which an access-token record is treated as a miss; `None` keeps records forever.
	#[serde(with = "optional_seconds", rename = "max_age_secs")]
	pub max_age: Option<Duration>,
}
impl CacheSettings {
	const DEFAULT_AUTHORIZATION_TIMEOUT: Duration = Duration::seconds(120);
	const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(30);

	/// Parses settings from JSON, reporting the path of the first invalid field.
	pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(payload);
		let settings: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::InvalidSettings { source: Arc::new(source) })?;

		settings.validate()?;

		Ok(settings)
	}

	/// Selects the caching policy.
	pub fn with_policy(mut self, policy: PolicyKind) -> Self {
		self.policy = policy;

		self
	}

	/// Overrides the authorization flow timeout (defaults to 120 seconds).
	pub fn with_authorization_timeout(mut self, timeout: Duration) -> Self {
		self.authorization_timeout = timeout;

		self
	}

	/// Overrides the refresh exchange timeout (defaults to 30 seconds).
	pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = timeout;

		self
	}

	/// Expires access-token records older than `max_age`.
	pub fn with_max_age(mut self, max_age: Duration) -> Self {
		self.max_age = Some(max_age);

		self
	}

	/// Rejects non-positive durations.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.authorization_timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout { field: "authorization_timeout" });
		}
		if !self.refresh_timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout { field: "refresh_timeout" });
		}
		if self.max_age.is_some_and(|age| !age.is_positive()) {
			return Err(ConfigError::NonPositiveMaxAge);
		}

		Ok(())
	}
}
impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			policy: PolicyKind::default(),
			authorization_timeout: Self::DEFAULT_AUTHORIZATION_TIMEOUT,
			refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT,
			max_age: None,
		}
	}
}

mod seconds {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}

mod optional_seconds {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(duration) => serializer.serialize_some(&duration.whole_seconds()),
			None => serializer.serialize_none(),
		}
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<i64>::deserialize(deserializer).map(|secs| secs.map(Duration::seconds))
	}
}
