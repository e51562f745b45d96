//! Cache mémoire à chargement unique par clé
//!
//! [`FetchOnceCache`] mémorise les ressources obtenues par un [`Fetcher`] et
//! fusionne les demandes concurrentes : pour une clé donnée, au plus un
//! appel au fetcher est en cours à tout instant, quel que soit le nombre de
//! demandeurs.
//!
//! # Cycle de vie d'une clé
//!
//! ```text
//! inconnue --request--> en attente --succès--> en cache --clear--> inconnue
//!                            |
//!                            +------échec-----> inconnue (nouvel essai possible)
//! ```
//!
//! Les deux tables (ressources et attentes) sont protégées par un même
//! verrou : le test « déjà en cache ? » et l'inscription dans les attentes
//! sont atomiques vis-à-vis des autres demandes.

use crate::fetcher::Fetcher;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

/// Résultat livré à chaque demandeur
#[derive(Debug)]
pub enum Fetched<R> {
    /// La ressource, partagée avec le cache
    Ready(Arc<R>),
    /// Le chargement a échoué ; aucune ressource n'est disponible
    Unavailable,
}

impl<R> Clone for Fetched<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(resource) => Self::Ready(resource.clone()),
            Self::Unavailable => Self::Unavailable,
        }
    }
}

impl<R> Fetched<R> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn resource(&self) -> Option<&Arc<R>> {
        match self {
            Self::Ready(resource) => Some(resource),
            Self::Unavailable => None,
        }
    }

    pub fn into_resource(self) -> Option<Arc<R>> {
        match self {
            Self::Ready(resource) => Some(resource),
            Self::Unavailable => None,
        }
    }
}

type Waiter<R> = Box<dyn FnOnce(Fetched<R>) + Send + 'static>;

/// État partagé entre le cache et les tâches de chargement
struct CacheState<R> {
    /// Ressources chargées avec succès (clé -> ressource)
    entries: HashMap<String, Arc<R>>,
    /// Demandeurs en attente d'un chargement en cours (clé -> file FIFO)
    pending: HashMap<String, Vec<Waiter<R>>>,
    /// Incrémenté par `clear()` ; un chargement lancé avant est ignoré
    generation: u64,
}

impl<R> Default for CacheState<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            generation: 0,
        }
    }
}

fn lock<R>(state: &Mutex<CacheState<R>>) -> MutexGuard<'_, CacheState<R>> {
    // Les callbacks ne sont jamais appelés sous le verrou, l'état reste cohérent
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cache asynchrone, dédupliquant et mémorisant, indexé par clé (URL)
///
/// Note : les chargements sont lancés avec `tokio::spawn`, `request` doit
/// donc être appelé depuis un runtime Tokio. Hors runtime, les demandeurs
/// reçoivent immédiatement [`Fetched::Unavailable`].
pub struct FetchOnceCache<F: Fetcher> {
    fetcher: Arc<F>,
    state: Arc<Mutex<CacheState<F::Resource>>>,
}

impl<F: Fetcher> fmt::Debug for FetchOnceCache<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("FetchOnceCache")
            .field("entries", &state.entries.len())
            .field("pending", &state.pending.len())
            .field("generation", &state.generation)
            .finish()
    }
}

impl<F: Fetcher> FetchOnceCache<F> {
    /// Crée un cache vide autour de `fetcher`
    pub fn new(fetcher: F) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    /// Crée un cache vide autour d'un fetcher partagé
    pub fn with_fetcher(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    /// Demande la ressource associée à `key`
    ///
    /// - déjà en cache : `on_complete` est appelé immédiatement avec la ressource ;
    /// - chargement en cours : `on_complete` rejoint la file d'attente de la clé ;
    /// - sinon : la file est créée et un unique chargement est lancé.
    ///
    /// À la fin du chargement, tous les demandeurs de la clé sont notifiés
    /// avec le même résultat, dans l'ordre de leurs demandes.
    pub fn request<C>(&self, key: &str, on_complete: C)
    where
        C: FnOnce(Fetched<F::Resource>) + Send + 'static,
    {
        let mut state = lock(&self.state);

        if let Some(resource) = state.entries.get(key).cloned() {
            drop(state);
            tracing::debug!(key, "Cache hit");
            on_complete(Fetched::Ready(resource));
            return;
        }

        if let Some(waiters) = state.pending.get_mut(key) {
            waiters.push(Box::new(on_complete));
            tracing::debug!(key, waiters = waiters.len(), "Fetch already in progress");
            return;
        }

        state
            .pending
            .insert(key.to_string(), vec![Box::new(on_complete)]);
        let generation = state.generation;
        drop(state);

        self.spawn_fetch(key.to_string(), generation);
    }

    /// Variante `async` de [`request`](Self::request)
    ///
    /// Un demandeur abandonné par [`clear`](Self::clear) reçoit
    /// [`Fetched::Unavailable`].
    pub async fn get(&self, key: &str) -> Fetched<F::Resource> {
        let (tx, rx) = oneshot::channel();
        self.request(key, move |fetched| {
            let _ = tx.send(fetched);
        });
        rx.await.unwrap_or(Fetched::Unavailable)
    }

    fn spawn_fetch(&self, key: String, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(key = %key, "No async runtime available, cannot fetch");
            self.resolve(&key, generation, None);
            return;
        };

        tracing::debug!(key = %key, "Starting fetch");
        let fetcher = self.fetcher.clone();
        let state = self.state.clone();
        let fetch_key = key.clone();
        let fetch = handle.spawn(async move { fetcher.fetch(&fetch_key).await });

        // Le chargement tourne dans sa propre tâche : une panique du fetcher
        // devient un échec et la clé quitte toujours les attentes
        handle.spawn(async move {
            let resource = match fetch.await {
                Ok(Ok(resource)) => Some(Arc::new(resource)),
                Ok(Err(e)) => {
                    tracing::warn!(key = %key, "Fetch failed: {}", e);
                    None
                }
                Err(e) => {
                    tracing::error!(key = %key, "Fetch task aborted: {}", e);
                    None
                }
            };
            resolve(&state, &key, generation, resource);
        });
    }

    fn resolve(&self, key: &str, generation: u64, resource: Option<Arc<F::Resource>>) {
        resolve(&self.state, key, generation, resource);
    }

    /// Vide le cache et abandonne les demandeurs en attente
    ///
    /// Les chargements en cours ne sont pas annulés, mais leur résultat sera
    /// ignoré : il ne peuplera pas le cache et ne notifiera personne.
    pub fn clear(&self) {
        let (entries, pending) = {
            let mut state = lock(&self.state);
            state.generation += 1;
            (
                std::mem::take(&mut state.entries),
                std::mem::take(&mut state.pending),
            )
        };

        tracing::info!(
            entries = entries.len(),
            pending = pending.len(),
            "Clearing cache"
        );
        // Libération des ressources hors du verrou
        drop(entries);
        drop(pending);
    }

    /// Indique si `key` est en cache
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.state).entries.contains_key(key)
    }

    /// Indique si un chargement est en cours pour `key`
    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.state).pending.contains_key(key)
    }

    /// Ressource en cache pour `key`, sans déclencher de chargement
    pub fn peek(&self, key: &str) -> Option<Arc<F::Resource>> {
        lock(&self.state).entries.get(key).cloned()
    }

    /// Nombre de ressources en cache
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).entries.is_empty()
    }

    /// Nombre de clés en cours de chargement
    pub fn pending_len(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

/// Termine le chargement de `key` et notifie les demandeurs
fn resolve<R>(
    state: &Mutex<CacheState<R>>,
    key: &str,
    generation: u64,
    resource: Option<Arc<R>>,
) {
    let waiters = {
        let mut state = lock(state);
        if state.generation != generation {
            tracing::debug!(key, "Cache cleared during fetch, discarding result");
            return;
        }

        if let Some(resource) = &resource {
            state.entries.insert(key.to_string(), resource.clone());
            tracing::debug!(key, "Fetched and cached");
        }
        state.pending.remove(key).unwrap_or_default()
    };

    let fetched = match resource {
        Some(resource) => Fetched::Ready(resource),
        None => Fetched::Unavailable,
    };
    for waiter in waiters {
        waiter(fetched.clone());
    }
}
