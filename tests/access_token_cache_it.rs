mod common;

// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use time::{Duration, macros};
// self
use common::{SCOPE, ScriptedExchange};
use oauth2_credential_cache::{
	CacheSettings, CacheStats, CredentialCache,
	auth::TokenAlias,
	error::{Error, TokenKind},
	obs::FlowKind,
	policy::AccessTokenPolicy,
};

fn cache(exchange: &Arc<ScriptedExchange>) -> CredentialCache<AccessTokenPolicy> {
	CredentialCache::new(AccessTokenPolicy, exchange.clone()).with_aliases(common::personas())
}

#[tokio::test]
async fn second_lookup_is_served_from_the_store() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identity = common::identity("jwilson", "acc-1");
	let first = cache.resolve(&identity).await.expect("First lookup should authorize.");
	let second = cache.resolve(&identity).await.expect("Second lookup should hit.");

	assert_eq!(first.expose(), "access-jwilson-1");
	assert_eq!(second, first);
	assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
	assert_eq!(exchange.authorizations(), 1);
	assert_eq!(exchange.refreshes(), 0);
}

#[tokio::test]
async fn every_identity_field_is_part_of_the_key() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identities = [
		common::identity("jwilson", "acc-1,acc-2"),
		common::identity("jwilson", "acc-2,acc-1"),
		common::identity("ksmith", "acc-1,acc-2"),
		oauth2_credential_cache::auth::IdentityDescriptor::new(
			common::user("jwilson"),
			"acc-1,acc-2",
			"openid",
		),
	];

	for identity in &identities {
		cache.resolve(identity).await.expect("Distinct identities should each authorize.");
	}

	assert_eq!(cache.len(), identities.len());
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 4 });
	assert_eq!(exchange.authorizations(), 4);
}

#[tokio::test]
async fn stored_records_are_never_rewritten_by_hits() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identity = common::identity("jwilson", "acc-1");

	cache.resolve(&identity).await.expect("First lookup should authorize.");

	let stored = cache.record(&identity).expect("Record should be cached after a miss.");

	for _ in 0..3 {
		cache.resolve(&identity).await.expect("Hits should succeed.");
	}

	assert_eq!(cache.record(&identity), Some(stored));
	assert_eq!(cache.stats(), CacheStats { hits: 3, misses: 1 });
}

#[tokio::test]
async fn incomplete_authorization_response_is_not_cached() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identity = common::identity("jwilson", "acc-1");

	exchange.omit_refresh_token(true);

	let err = cache.resolve(&identity).await.expect_err("Missing refresh token must fail.");

	assert!(matches!(
		err,
		Error::IncompleteTokenResponse {
			flow: FlowKind::Authorization,
			missing: TokenKind::Refresh
		}
	));
	assert!(cache.is_empty());

	exchange.omit_refresh_token(false);

	let token = cache.resolve(&identity).await.expect("Retry should authorize again.");

	assert_eq!(token.expose(), "access-jwilson-2");
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
}

#[tokio::test]
async fn exchange_failures_propagate_unchanged() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);

	exchange.fail_authorization(true);

	let err = cache
		.resolve(&common::identity("jwilson", "acc-1"))
		.await
		.expect_err("Rejected consent must fail the lookup.");

	assert!(matches!(err, Error::Exchange(_)));
	assert!(err.to_string().contains("consent was rejected"));
	assert!(cache.is_empty());
}

#[tokio::test]
async fn sentinel_aliases_bypass_the_cache() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let foo = cache
		.resolve_alias(&TokenAlias::InvalidFoo, SCOPE)
		.await
		.expect("INVALID_FOO should resolve.");
	let empty = cache
		.resolve_alias(&TokenAlias::InvalidEmpty, SCOPE)
		.await
		.expect("INVALID_EMPTY should resolve.");
	let omit = cache
		.resolve_alias(&TokenAlias::InvalidOmit, SCOPE)
		.await
		.expect("INVALID_OMIT should resolve.");

	assert_eq!(foo.as_ref().map(|token| token.expose()), Some("foo"));
	assert_eq!(empty.as_ref().map(|token| token.expose()), Some(""));
	assert!(omit.is_none());
	assert_eq!(cache.stats(), CacheStats::default());
	assert_eq!(exchange.authorizations(), 0);
	assert!(cache.is_empty());
}

#[tokio::test]
async fn persona_aliases_resolve_through_the_directory() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let alias: TokenAlias = "MARY_MOSS".parse().expect("Persona alias should parse.");
	let token = cache
		.resolve_alias(&alias, SCOPE)
		.await
		.expect("Mapped persona should resolve.")
		.expect("Personas always yield a token.");

	assert_eq!(token.expose(), "access-mmoss-1");
	assert!(cache.record(&common::identity("mmoss", "acc-1,acc-2")).is_some());

	let unknown: TokenAlias = "STEVE_KENNEDY".parse().expect("Persona alias should parse.");
	let err = cache
		.resolve_alias(&unknown, SCOPE)
		.await
		.expect_err("Unmapped persona must fail.");

	assert!(matches!(err, Error::UnknownIdentityAlias { alias } if alias == "STEVE_KENNEDY"));
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
}

#[tokio::test]
async fn incomplete_authorization_without_access_token_is_not_cached() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identity = common::identity("jwilson", "acc-1");

	exchange.omit_access_token(true);

	let err = cache.resolve(&identity).await.expect_err("Missing access token must fail.");

	assert!(matches!(
		err,
		Error::IncompleteTokenResponse {
			flow: FlowKind::Authorization,
			missing: TokenKind::Access
		}
	));
	assert!(cache.is_empty());
	assert!(cache.record(&identity).is_none());
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
}

#[tokio::test]
async fn user_ids_are_keyed_verbatim() {
	let exchange = ScriptedExchange::new();
	let cache = cache(&exchange);
	let identities = [
		common::identity("J Wilson", "acc-1"),
		common::identity("J  Wilson", "acc-1"),
		common::identity(" J Wilson", "acc-1"),
		common::identity("", "acc-1"),
	];

	for identity in &identities {
		cache.resolve(identity).await.expect("Any user id should be cacheable.");
	}

	let token = cache
		.resolve(&common::identity("J Wilson", "acc-1"))
		.await
		.expect("Repeated lookup should hit.");

	assert_eq!(token.expose(), "access-J Wilson-1");
	assert_eq!(cache.len(), identities.len());
	assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 4 });
}

#[tokio::test(start_paused = true)]
async fn concurrent_lookups_share_one_authorization_flow() {
	let exchange = ScriptedExchange::with_delay(StdDuration::from_millis(50));
	let cache = Arc::new(cache(&exchange));
	let mut tasks = tokio::task::JoinSet::new();

	for _ in 0..8 {
		let cache = cache.clone();

		tasks.spawn(async move { cache.resolve(&common::identity("jwilson", "acc-1")).await });
	}

	for token in tasks.join_all().await {
		let token = token.expect("Every concurrent lookup should succeed.");

		assert_eq!(token.expose(), "access-jwilson-1");
	}

	assert_eq!(exchange.authorizations(), 1);
	assert_eq!(cache.stats(), CacheStats { hits: 7, misses: 1 });
	assert_eq!(cache.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_lookups_share_one_timed_out_flow() {
	let exchange = ScriptedExchange::with_delay(StdDuration::from_secs(600));
	let settings = CacheSettings::default().with_authorization_timeout(Duration::seconds(5));
	let cache =
		Arc::new(cache(&exchange).with_settings(settings).expect("Settings should be valid."));
	let started = tokio::time::Instant::now();
	let mut tasks = tokio::task::JoinSet::new();

	for _ in 0..3 {
		let cache = cache.clone();

		tasks.spawn(async move {
			let outcome = cache.resolve(&common::identity("jwilson", "acc-1")).await;

			(outcome, started.elapsed())
		});
	}

	for (outcome, elapsed) in tasks.join_all().await {
		let err = outcome.expect_err("Every waiter should see the shared timeout.");

		assert!(matches!(err, Error::Timeout { flow: FlowKind::Authorization, .. }));
		assert!(elapsed < StdDuration::from_secs(6), "Waiters must not queue their own flows.");
	}

	assert_eq!(exchange.authorizations(), 1);
	assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 3 });
	assert_eq!(cache.in_flight(), 0);
	assert!(cache.is_empty());

	cache
		.resolve(&common::identity("jwilson", "acc-1"))
		.await
		.expect_err("A later caller starts a new flow, which also stalls.");

	assert_eq!(exchange.authorizations(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_lookups_share_one_failed_flow() {
	let exchange = ScriptedExchange::with_delay(StdDuration::from_secs(1));
	let cache = Arc::new(cache(&exchange));
	let mut tasks = tokio::task::JoinSet::new();

	exchange.fail_authorization(true);

	for _ in 0..4 {
		let cache = cache.clone();

		tasks.spawn(async move { cache.resolve(&common::identity("jwilson", "acc-1")).await });
	}

	for outcome in tasks.join_all().await {
		let err = outcome.expect_err("Every waiter should see the shared failure.");

		assert!(matches!(err, Error::Exchange(_)));
		assert!(err.to_string().contains("consent was rejected"));
	}

	assert_eq!(exchange.authorizations(), 1);
	assert_eq!(cache.in_flight(), 0);

	exchange.fail_authorization(false);

	let token = cache
		.resolve(&common::identity("jwilson", "acc-1"))
		.await
		.expect("Callers after the failure should authorize again.");

	assert_eq!(token.expose(), "access-jwilson-2");
}

#[tokio::test(start_paused = true)]
async fn slow_identity_does_not_block_others() {
	let exchange = ScriptedExchange::with_user_delay("slowpoke", StdDuration::from_secs(60));
	let cache = Arc::new(cache(&exchange));
	let slow = {
		let cache = cache.clone();

		tokio::spawn(async move { cache.resolve(&common::identity("slowpoke", "acc-1")).await })
	};

	tokio::task::yield_now().await;

	let fast = cache
		.resolve(&common::identity("jwilson", "acc-1"))
		.await
		.expect("Unrelated identity should resolve immediately.");

	assert_eq!(fast.expose(), "access-jwilson-2");
	assert!(!slow.is_finished());
	assert_eq!(cache.in_flight(), 1);

	let slow = slow
		.await
		.expect("Slow lookup task should not panic.")
		.expect("Slow lookup should eventually succeed.");

	assert_eq!(slow.expose(), "access-slowpoke-1");
	assert_eq!(cache.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn authorization_flow_is_bounded_by_its_timeout() {
	let exchange = ScriptedExchange::with_delay(StdDuration::from_secs(600));
	let settings = CacheSettings::default().with_authorization_timeout(Duration::seconds(5));
	let cache = cache(&exchange).with_settings(settings).expect("Settings should be valid.");
	let err = cache
		.resolve(&common::identity("jwilson", "acc-1"))
		.await
		.expect_err("Stalled authorization flow must time out.");

	assert!(matches!(
		err,
		Error::Timeout { flow: FlowKind::Authorization, after } if after == Duration::seconds(5)
	));
	assert!(cache.is_empty());
	assert_eq!(exchange.authorizations(), 1);
}

#[tokio::test]
async fn expired_records_are_treated_as_misses() {
	let exchange = ScriptedExchange::new();
	let settings = CacheSettings::default().with_max_age(Duration::minutes(5));
	let cache = cache(&exchange).with_settings(settings).expect("Settings should be valid.");
	let identity = common::identity("jwilson", "acc-1");
	let cached_at = macros::datetime!(2025-06-01 12:00 UTC);

	cache.resolve_at(&identity, cached_at).await.expect("First lookup should authorize.");

	let fresh = cache
		.resolve_at(&identity, cached_at + Duration::minutes(4))
		.await
		.expect("Young record should hit.");

	assert_eq!(fresh.expose(), "access-jwilson-1");

	let renewed = cache
		.resolve_at(&identity, cached_at + Duration::minutes(5))
		.await
		.expect("Expired record should re-authorize.");

	assert_eq!(renewed.expose(), "access-jwilson-2");
	assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
	assert_eq!(cache.len(), 1);
	assert_eq!(
		cache.record(&identity).map(|record| record.cached_at),
		Some(cached_at + Duration::minutes(5))
	);
}
