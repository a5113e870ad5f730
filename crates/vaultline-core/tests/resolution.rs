//! End-to-end resolution behavior through the public API

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use vaultline_core::{
    BindingProvider, ConfigError, ProviderError, ProviderResult, RecordingMetrics,
    ResolutionEvent, ResolveError, ResolverConfig, SecretProvider, SecretResolver, SecretResult,
    VaultProvider,
};

/// Test provider: fixed values, optional failure, shared call journal
struct MockProvider {
    name: String,
    values: HashMap<String, String>,
    fail: bool,
    calls: AtomicUsize,
    journal: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    fn new(name: &str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            values: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
            journal: Arc::clone(journal),
        }
    }

    fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.lock().push(self.name.clone());
        // Suspend like real provider I/O would
        tokio::task::yield_now().await;
        if self.fail {
            return Err(ProviderError::Other(format!("{} is down", self.name)));
        }
        Ok(self
            .values
            .get(key)
            .map(|value| SecretResult::new(key, value.clone(), self.source())))
    }
}

/// Provider that takes a fixed amount of (tokio) time to answer
struct SlowProvider {
    delay: Duration,
}

#[async_trait]
impl SecretProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(SecretResult::new(key, "slow-value", self.source())))
    }
}

fn journal() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn resolver_with(
    providers: Vec<Arc<dyn SecretProvider>>,
    metrics: &Arc<RecordingMetrics>,
) -> SecretResolver {
    SecretResolver::builder()
        .encryption_key("integration-key")
        .providers(providers)
        .metrics(metrics.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn cache_hit_never_calls_providers() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log).with("k", "v"));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a.clone()], &metrics);

    resolver.resolve("k").await.unwrap();
    assert_eq!(a.calls(), 1);

    for _ in 0..5 {
        let hit = resolver.resolve("k").await.unwrap();
        assert_eq!(hit.value, "v");
        assert_eq!(hit.source, "cache");
    }
    assert_eq!(a.calls(), 1);

    let cache_events = metrics
        .events()
        .into_iter()
        .filter(|e| matches!(e, ResolutionEvent::Resolve { depth: 0, source, .. } if source == "cache"))
        .count();
    assert_eq!(cache_events, 5);
}

#[tokio::test]
async fn chain_order_reports_depth_and_source() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log));
    let b = Arc::new(MockProvider::new("B", &log).with("k", "from-b"));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a.clone(), b.clone()], &metrics);

    let result = resolver.resolve("k").await.unwrap();
    assert_eq!(result.source, "B");
    assert_eq!(result.value, "from-b");
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
    assert_eq!(*log.lock(), vec!["A", "B"]);

    match &metrics.events()[..] {
        [ResolutionEvent::Resolve { key, source, depth, .. }] => {
            assert_eq!(key, "k");
            assert_eq!(source, "B");
            assert_eq!(*depth, 2);
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[tokio::test]
async fn first_provider_with_value_wins() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log).with("k", "from-a"));
    let b = Arc::new(MockProvider::new("B", &log).with("k", "from-b"));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a, b.clone()], &metrics);

    assert_eq!(resolver.resolve("k").await.unwrap().value, "from-a");
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn failing_provider_falls_through() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log).failing());
    let b = Arc::new(MockProvider::new("B", &log).with("k", "from-b"));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a.clone(), b], &metrics);

    let result = resolver.resolve("k").await.unwrap();
    assert_eq!(result.source, "B");
    assert_eq!(a.calls(), 1);
    assert_eq!(metrics.misses(), 0);
}

#[tokio::test]
async fn exhausted_chain_fails_with_key() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log));
    let b = Arc::new(MockProvider::new("B", &log));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a, b], &metrics);

    let err = resolver.resolve("missing").await.unwrap_err();
    assert!(matches!(&err, ResolveError::NotFound { key } if key == "missing"));
    assert_eq!(err.to_string(), "Secret not found: missing");
    assert_eq!(metrics.events(), vec![ResolutionEvent::miss("missing")]);
}

#[tokio::test]
async fn not_found_message_hides_topology() {
    let log = journal();
    let a = Arc::new(MockProvider::new("internal-vault-7", &log).failing());
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![a, Arc::new(VaultProvider::new())], &metrics);

    let err = resolver.resolve("k").await.unwrap_err();
    let message = format!("{} {:?}", err, err);
    assert!(!message.contains("internal-vault-7"));
    assert!(!message.contains("vault"));
    assert!(!message.contains("is down"));
}

#[tokio::test(start_paused = true)]
async fn ttl_expiry_triggers_fresh_resolution() {
    let bindings = Arc::new(BindingProvider::new());
    bindings.bind("k", "old");
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![bindings.clone()], &metrics);

    let first = resolver
        .resolve_with_ttl("k", Duration::from_millis(100))
        .await
        .unwrap();
    assert_eq!(first.ttl, Some(Duration::from_millis(100)));
    bindings.bind("k", "new");

    tokio::time::advance(Duration::from_millis(50)).await;
    let hit = resolver.resolve("k").await.unwrap();
    assert_eq!(hit.value, "old");
    assert_eq!(hit.source, "cache");

    tokio::time::advance(Duration::from_millis(100)).await;
    let fresh = resolver.resolve("k").await.unwrap();
    assert_eq!(fresh.value, "new");
    assert_eq!(fresh.source, "binding");
}

#[tokio::test(start_paused = true)]
async fn resolution_reports_latency() {
    let log = journal();
    let empty = Arc::new(MockProvider::new("A", &log));
    let slow = Arc::new(SlowProvider {
        delay: Duration::from_millis(10),
    });
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![empty, slow], &metrics);

    assert_eq!(resolver.resolve("k").await.unwrap().source, "slow");
    assert_eq!(resolver.resolve("k").await.unwrap().source, "cache");

    match &metrics.events()[..] {
        [ResolutionEvent::Resolve {
            source: first_source,
            depth: 2,
            latency_ms: first_latency,
            ..
        }, ResolutionEvent::Resolve {
            source: second_source,
            depth: 0,
            latency_ms: second_latency,
            ..
        }] => {
            assert_eq!(first_source, "slow");
            assert_eq!(*first_latency, 10.0);
            assert_eq!(second_source, "cache");
            assert_eq!(*second_latency, 0.0);
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn construction_without_key_fails() {
    assert!(matches!(
        SecretResolver::new(ResolverConfig::default()),
        Err(ConfigError::MissingEncryptionKey)
    ));
    assert!(matches!(
        SecretResolver::builder().build(),
        Err(ConfigError::MissingEncryptionKey)
    ));
}

#[tokio::test]
async fn telemetry_never_contains_secret_values() {
    const SECRET: &str = "s3cr3t-value-that-must-not-leak";

    let log = journal();
    let failing = Arc::new(MockProvider::new("A", &log).failing());
    let empty = Arc::new(MockProvider::new("B", &log));
    let holder = Arc::new(MockProvider::new("C", &log).with("k", SECRET));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = resolver_with(vec![failing, empty, holder], &metrics);

    resolver.resolve("k").await.unwrap();
    resolver.resolve("k").await.unwrap();
    resolver.resolve_with_ttl("k", Duration::from_secs(1)).await.unwrap();
    let _ = resolver.resolve("absent").await;

    assert_eq!(metrics.resolves(), 3);
    assert_eq!(metrics.misses(), 1);

    let json = metrics.to_json().unwrap();
    assert!(json.contains("\"k\""));
    assert!(!json.contains(SECRET));
}

#[tokio::test]
async fn concurrent_cold_lookups_both_traverse_chain() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log).with("k", "v"));
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = Arc::new(resolver_with(vec![a.clone()], &metrics));

    let (left, right) = tokio::join!(resolver.resolve("k"), resolver.resolve("k"));
    assert_eq!(left.unwrap().value, "v");
    assert_eq!(right.unwrap().value, "v");

    // No in-flight deduplication: both calls reached the provider
    assert_eq!(a.calls(), 2);
    assert_eq!(resolver.cached_len(), 1);
    assert_eq!(resolver.resolve("k").await.unwrap().source, "cache");
}

#[tokio::test]
async fn resolver_is_shareable_across_tasks() {
    let bindings = Arc::new(BindingProvider::new());
    for i in 0..8 {
        bindings.bind(format!("key_{}", i), format!("value_{}", i));
    }
    let metrics = Arc::new(RecordingMetrics::new());
    let resolver = Arc::new(resolver_with(vec![bindings], &metrics));

    let mut handles = Vec::new();
    for i in 0..8 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&format!("key_{}", i)).await.unwrap().value
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), format!("value_{}", i));
    }
    assert_eq!(resolver.cached_len(), 8);
}

#[tokio::test]
async fn separate_resolvers_do_not_share_cache() {
    let log = journal();
    let a = Arc::new(MockProvider::new("A", &log).with("k", "v"));
    let metrics = Arc::new(RecordingMetrics::new());

    let first = resolver_with(vec![a.clone()], &metrics);
    let second = resolver_with(vec![a.clone()], &metrics);

    first.resolve("k").await.unwrap();
    assert_eq!(second.resolve("k").await.unwrap().source, "A");
    assert_eq!(a.calls(), 2);
}
