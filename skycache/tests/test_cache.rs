use async_trait::async_trait;
use skycache::{FetchError, FetchOnceCache, Fetched, Fetcher, Texture};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

/// Fetcher de test : répond au tick suivant, échoue pour les clés marquées
#[derive(Default)]
struct MockFetcher {
    calls: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl MockFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    fn heal(&self, key: &str) {
        self.failing.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    type Resource = Texture;

    async fn fetch(&self, key: &str) -> Result<Texture, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing.lock().unwrap().contains(key) {
            Err(FetchError::Transport("unreachable".into()))
        } else {
            Ok(Texture::placeholder(2, 2))
        }
    }
}

/// Fetcher de test dont chaque appel attend d'être explicitement libéré
#[derive(Default)]
struct GatedFetcher {
    gates: Mutex<Vec<(String, Arc<Notify>)>>,
    finished: AtomicUsize,
}

impl GatedFetcher {
    fn calls(&self) -> usize {
        self.gates.lock().unwrap().len()
    }

    fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Libère le `nth` appel (0-based) pour `key`
    fn release(&self, key: &str, nth: usize) {
        let gates = self.gates.lock().unwrap();
        let (_, gate) = gates
            .iter()
            .filter(|(k, _)| k == key)
            .nth(nth)
            .expect("no such call");
        gate.notify_one();
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_for_finished(&self, n: usize) {
        while self.finished() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Fetcher for GatedFetcher {
    type Resource = Texture;

    async fn fetch(&self, key: &str) -> Result<Texture, FetchError> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .push((key.to_string(), gate.clone()));
        gate.notified().await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(Texture::placeholder(1, 1))
    }
}

/// Fetcher de test qui panique au premier appel, puis réussit
#[derive(Default)]
struct PanicOnceFetcher {
    calls: AtomicUsize,
}

impl PanicOnceFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for PanicOnceFetcher {
    type Resource = Texture;

    async fn fetch(&self, _key: &str) -> Result<Texture, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("decoder crashed");
        }
        Ok(Texture::placeholder(1, 1))
    }
}

type Outcomes = mpsc::UnboundedReceiver<(&'static str, Fetched<Texture>)>;

fn collector() -> (
    mpsc::UnboundedSender<(&'static str, Fetched<Texture>)>,
    Outcomes,
) {
    mpsc::unbounded_channel()
}

fn waiter(
    tx: &mpsc::UnboundedSender<(&'static str, Fetched<Texture>)>,
    label: &'static str,
) -> impl FnOnce(Fetched<Texture>) + Send + 'static {
    let tx = tx.clone();
    move |fetched| {
        let _ = tx.send((label, fetched));
    }
}

#[tokio::test]
async fn test_cache_hit_short_circuits_fetch() {
    let fetcher = Arc::new(MockFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());

    let first = cache.get("img://A").await.into_resource().unwrap();
    assert_eq!(fetcher.calls(), 1);
    assert!(cache.contains("img://A"));

    // Un hit est livré immédiatement, sans nouveau chargement
    let delivered = Arc::new(Mutex::new(None));
    let slot = delivered.clone();
    cache.request("img://A", move |fetched| {
        *slot.lock().unwrap() = fetched.into_resource();
    });

    let second = delivered.lock().unwrap().take().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_coalesce() {
    let fetcher = Arc::new(MockFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx, mut rx) = collector();

    cache.request("img://A", waiter(&tx, "cb1"));
    cache.request("img://A", waiter(&tx, "cb2"));
    cache.request("img://A", waiter(&tx, "cb3"));
    assert!(cache.is_pending("img://A"));
    assert_eq!(cache.pending_len(), 1);

    let mut order = Vec::new();
    let mut resources = Vec::new();
    for _ in 0..3 {
        let (label, fetched) = rx.recv().await.unwrap();
        order.push(label);
        resources.push(fetched.into_resource().unwrap());
    }

    assert_eq!(order, vec!["cb1", "cb2", "cb3"]);
    assert!(Arc::ptr_eq(&resources[0], &resources[1]));
    assert!(Arc::ptr_eq(&resources[1], &resources[2]));
    assert_eq!(fetcher.calls(), 1);
    assert!(!cache.is_pending("img://A"));
}

#[tokio::test]
async fn test_failure_notifies_all_waiters_and_allows_retry() {
    let fetcher = Arc::new(MockFetcher::default());
    fetcher.fail("img://broken");
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx, mut rx) = collector();

    cache.request("img://broken", waiter(&tx, "cb1"));
    cache.request("img://broken", waiter(&tx, "cb2"));

    for expected in ["cb1", "cb2"] {
        let (label, fetched) = rx.recv().await.unwrap();
        assert_eq!(label, expected);
        assert!(!fetched.is_ready());
    }
    assert_eq!(fetcher.calls(), 1);
    assert!(!cache.contains("img://broken"));
    assert!(!cache.is_pending("img://broken"));

    // L'échec n'empoisonne pas le cache : la demande suivante relance un chargement
    fetcher.heal("img://broken");
    assert!(cache.get("img://broken").await.is_ready());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_keys_resolve_independently() {
    let fetcher = Arc::new(GatedFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx1, mut rx1) = collector();
    let (tx2, mut rx2) = collector();

    cache.request("img://K1", waiter(&tx1, "k1"));
    cache.request("img://K2", waiter(&tx2, "k2"));
    fetcher.wait_for_calls(2).await;

    fetcher.release("img://K1", 0);
    let (label, fetched) = rx1.recv().await.unwrap();
    assert_eq!(label, "k1");
    assert!(fetched.is_ready());

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(rx2.try_recv().is_err());
    assert!(cache.is_pending("img://K2"));

    fetcher.release("img://K2", 0);
    let (label, fetched) = rx2.recv().await.unwrap();
    assert_eq!(label, "k2");
    assert!(fetched.is_ready());
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let fetcher = Arc::new(MockFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());

    assert!(cache.get("img://A").await.is_ready());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.peek("img://A").is_none());

    assert!(cache.get("img://A").await.is_ready());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_clear_during_fetch_discards_result() {
    let fetcher = Arc::new(GatedFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx, mut rx) = collector();

    cache.request("img://A", waiter(&tx, "dropped"));
    drop(tx);
    fetcher.wait_for_calls(1).await;

    cache.clear();
    assert!(!cache.is_pending("img://A"));

    fetcher.release("img://A", 0);
    fetcher.wait_for_finished(1).await;

    // Le demandeur abandonné n'est jamais notifié et le cache reste vide
    assert!(rx.recv().await.is_none());
    assert!(!cache.contains("img://A"));
}

#[tokio::test]
async fn test_stale_fetch_does_not_resolve_newer_request() {
    let fetcher = Arc::new(GatedFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx, mut rx) = collector();

    cache.request("img://A", |_| {});
    fetcher.wait_for_calls(1).await;
    cache.clear();

    cache.request("img://A", waiter(&tx, "fresh"));
    fetcher.wait_for_calls(2).await;

    // L'ancien chargement se termine : il ne touche pas la nouvelle attente
    fetcher.release("img://A", 0);
    fetcher.wait_for_finished(1).await;
    assert!(rx.try_recv().is_err());
    assert!(cache.is_pending("img://A"));
    assert!(!cache.contains("img://A"));

    fetcher.release("img://A", 1);
    let (label, fetched) = rx.recv().await.unwrap();
    assert_eq!(label, "fresh");
    assert!(fetched.is_ready());
    assert!(cache.contains("img://A"));
}

#[tokio::test]
async fn test_get_resolves_unavailable_when_cleared() {
    let fetcher = Arc::new(GatedFetcher::default());
    let cache = Arc::new(FetchOnceCache::with_fetcher(fetcher.clone()));

    let getter = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get("img://A").await })
    };
    fetcher.wait_for_calls(1).await;

    cache.clear();
    let fetched = getter.await.unwrap();
    assert!(!fetched.is_ready());
}

#[tokio::test]
async fn test_end_to_end_three_consumers_same_tick() {
    let fetcher = Arc::new(MockFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());
    let (tx, mut rx) = collector();

    for label in ["billboard-1", "billboard-2", "billboard-3"] {
        cache.request("img://A", waiter(&tx, label));
    }

    for _ in 0..3 {
        let (_, fetched) = rx.recv().await.unwrap();
        let texture = fetched.into_resource().unwrap();
        assert_eq!((texture.width(), texture.height()), (2, 2));
    }
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn test_request_outside_runtime_is_unavailable() {
    let fetcher = Arc::new(MockFetcher::default());
    let cache = FetchOnceCache::with_fetcher(fetcher.clone());

    let delivered = Arc::new(Mutex::new(None));
    let slot = delivered.clone();
    cache.request("img://A", move |fetched| {
        *slot.lock().unwrap() = Some(fetched.is_ready());
    });

    assert_eq!(*delivered.lock().unwrap(), Some(false));
    assert!(!cache.is_pending("img://A"));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_panicking_fetch_is_a_failure() {
    let cache = FetchOnceCache::new(PanicOnceFetcher::default());

    let first = tokio::time::timeout(Duration::from_secs(5), cache.get("img://A"))
        .await
        .unwrap();
    assert!(!first.is_ready());
    assert!(!cache.is_pending("img://A"));
    assert!(!cache.contains("img://A"));

    // La clé n'est pas bloquée : une nouvelle demande relance un chargement
    let second = tokio::time::timeout(Duration::from_secs(5), cache.get("img://A"))
        .await
        .unwrap();
    assert!(second.is_ready());
    assert_eq!(cache.fetcher().calls(), 2);
}
