// self
use crate::{
	_prelude::*,
	obs::{FlowKind, LookupOutcome},
	policy::PolicyKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used around token exchanges.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_credential_cache.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event for a cache lookup; `fingerprint` must already be log-safe.
pub fn trace_lookup(policy: PolicyKind, outcome: LookupOutcome, fingerprint: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			policy = policy.as_str(),
			outcome = outcome.as_str(),
			identity = fingerprint,
			"credential cache lookup"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (policy, outcome, fingerprint);
	}
}
