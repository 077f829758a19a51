//! Optional observability helpers for cache lookups and token exchanges.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit spans named `oauth2_credential_cache.flow` with the
//!   `flow` and `stage` fields, plus `debug` events for every cache lookup.
//! - Enable `metrics` to increment `oauth2_credential_cache_flow_total` (labeled by `flow` +
//!   `outcome`) and `oauth2_credential_cache_lookup_total` (labeled by `policy` + `outcome`).

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Token exchanges the cache delegates to its collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
	/// Interactive login, consent, and authorization-code exchange.
	Authorization,
	/// Refresh-token exchange.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorization => "authorization_flow",
			FlowKind::Refresh => "refresh_exchange",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			FlowKind::Authorization => f.write_str("authorization flow"),
			FlowKind::Refresh => f.write_str("refresh exchange"),
		}
	}
}

/// Outcome labels recorded for each exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Exchange started.
	Attempt,
	/// Exchange produced a complete token pair.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of probing the store for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
	/// A usable record was found.
	Hit,
	/// No usable record was found; an authorization flow follows.
	Miss,
}
impl LookupOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LookupOutcome::Hit => "hit",
			LookupOutcome::Miss => "miss",
		}
	}
}
impl Display for LookupOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
