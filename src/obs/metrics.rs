// self
use crate::{
	obs::{FlowKind, FlowOutcome, LookupOutcome},
	policy::PolicyKind,
};

/// Records an exchange outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_credential_cache_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a cache lookup via the global metrics recorder (when enabled).
pub fn record_lookup(policy: PolicyKind, outcome: LookupOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_credential_cache_lookup_total",
			"policy" => policy.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (policy, outcome);
	}
}
