//! Client-side cache of the remote `todos` collection.
//!
//! Mutations edit the cached [`Collection`] before their request goes out and
//! keep a [`PendingPatch`] that either stands (success) or is inverted
//! (failure). Every mutation also invalidates the cache on completion so the
//! next [`OptimisticCollectionCache::read`] re-synchronizes with the server.
//!
//! All edits happen inside short critical sections that never span an
//! `.await`, so concurrently running mutations interleave only at their
//! network round trip.

pub mod collection;
pub mod mutation;
pub mod patch;
pub mod placeholder;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{Instrument, Span, debug, info_span, warn};

pub use collection::Collection;
pub use mutation::Mutation;
pub use patch::{Inverse, PatchStatus, PendingPatch};
pub use placeholder::PlaceholderIds;

use crate::core::{CacheError, NewTodo, Result, Todo, TodoId, TodoPatch};
use crate::transport::{ClientConfig, HttpTransport, TodoTransport};

#[derive(Debug, Default)]
struct CacheState {
    collection: Option<Collection>,
    invalidated: bool,
    /// Bumped by every invalidation; a fetch only clears the flag if no
    /// invalidation happened while it was in flight.
    generation: u64,
}

struct Shared {
    transport: Arc<dyn TodoTransport>,
    placeholders: PlaceholderIds,
    state: RwLock<CacheState>,
    in_flight: AtomicUsize,
}

/// Optimistic cache over a [`TodoTransport`].
///
/// Cloning is cheap and every clone shares the same cached collection.
/// Mutations spawn their round trip on the current tokio runtime.
#[derive(Clone)]
pub struct OptimisticCollectionCache {
    shared: Arc<Shared>,
}

impl OptimisticCollectionCache {
    pub fn new(transport: Arc<dyn TodoTransport>) -> Self {
        Self::with_placeholders(transport, PlaceholderIds::clock())
    }

    pub fn with_placeholders(transport: Arc<dyn TodoTransport>, placeholders: PlaceholderIds) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                placeholders,
                state: RwLock::new(CacheState::default()),
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Cache backed by [`HttpTransport`].
    pub fn http(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Current cached collection, `None` until the first successful fetch.
    pub fn snapshot(&self) -> Option<Collection> {
        self.state().collection.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state().collection.is_some()
    }

    pub fn is_invalidated(&self) -> bool {
        self.state().invalidated
    }

    /// Marks the `todos` tag stale; the next [`read`](Self::read) re-fetches.
    pub fn invalidate(&self) {
        let mut state = self.state_mut();
        state.invalidated = true;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Mutations whose round trip has not resolved yet.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Replaces the cached collection with the server's list.
    ///
    /// On failure the previous collection is kept unchanged.
    pub async fn fetch_all(&self) -> Result<Collection> {
        let generation = self.state().generation;

        let outcome = self
            .shared
            .transport
            .list()
            .instrument(info_span!("todos.fetch_all"))
            .await;

        match outcome {
            Ok(items) => {
                let collection = Collection::from_authoritative(items);
                let mut state = self.state_mut();
                state.collection = Some(collection.clone());
                if state.generation == generation {
                    state.invalidated = false;
                }
                debug!(len = collection.len(), "collection replaced by server list");
                Ok(collection)
            }
            Err(err) => {
                warn!(error = %err, "fetching todos failed; keeping cached collection");
                Err(err)
            }
        }
    }

    /// Cached collection, re-fetched first when missing or invalidated.
    ///
    /// A failed re-fetch falls back to the stale collection if there is one.
    pub async fn read(&self) -> Result<Collection> {
        {
            let state = self.state();
            if let (false, Some(collection)) = (state.invalidated, state.collection.as_ref()) {
                return Ok(collection.clone());
            }
        }

        match self.fetch_all().await {
            Ok(collection) => Ok(collection),
            Err(err) => match self.snapshot() {
                Some(stale) => {
                    warn!(error = %err, "serving stale todos");
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    /// Inserts `draft` under a placeholder id at the front of the cached
    /// collection, then creates it on the server.
    ///
    /// On success the placeholder is swapped for the server's item and the
    /// collection re-sorted; on failure the insert is undone.
    pub fn add(&self, draft: NewTodo) -> Mutation<Todo> {
        let placeholder = self.shared.placeholders.next();
        let span = info_span!("todos.add", placeholder = %placeholder);

        let patch = {
            let mut state = self.state_mut();
            PendingPatch::insert(
                state.collection.as_mut(),
                Todo::speculative(&draft, placeholder),
            )
        };
        span.in_scope(|| debug!(applied = patch.inverse() != &Inverse::Noop, "speculative insert"));

        let cache = self.clone();
        self.spawn(span, async move {
            let outcome = cache.shared.transport.create(&draft).await;

            let mut state = cache.state_mut();
            match outcome {
                Ok(mut confirmed) => {
                    confirmed.optimistic = false;
                    if let Some(collection) = state.collection.as_mut() {
                        collection.confirm(placeholder, confirmed.clone());
                    }
                    let status = patch.commit();
                    debug!(id = %confirmed.id, ?status, "speculative insert confirmed");
                    Ok(confirmed)
                }
                Err(err) => {
                    let status = patch.rollback(state.collection.as_mut());
                    warn!(error = %err, ?status, "create failed; speculative insert undone");
                    Err(err)
                }
            }
        })
    }

    /// Sends `item`'s fields as a partial update. The cached collection is
    /// not touched; it is invalidated once the request resolves.
    pub fn update(&self, item: Todo) -> Mutation<()> {
        if item.id.is_placeholder() {
            return self.reject(item.id);
        }

        let id = item.id;
        let patch = TodoPatch::from(&item);
        let cache = self.clone();
        self.spawn(info_span!("todos.update", id = %id), async move {
            let outcome = cache.shared.transport.update(id, &patch).await;
            if let Err(err) = &outcome {
                warn!(error = %err, "update failed");
            }
            outcome
        })
    }

    /// Drops `id` from the cached collection, then deletes it on the server.
    /// On failure the item is put back in its descending-id slot.
    pub fn remove(&self, id: TodoId) -> Mutation<()> {
        if id.is_placeholder() {
            return self.reject(id);
        }

        let span = info_span!("todos.remove", id = %id);
        let patch = PendingPatch::remove(self.state_mut().collection.as_mut(), id);
        span.in_scope(|| debug!(applied = patch.inverse() != &Inverse::Noop, "speculative removal"));

        let cache = self.clone();
        self.spawn(span, async move {
            let outcome = cache.shared.transport.delete(id).await;

            let mut state = cache.state_mut();
            match outcome {
                Ok(()) => {
                    let status = patch.commit();
                    debug!(?status, "speculative removal confirmed");
                    Ok(())
                }
                Err(err) => {
                    let status = patch.rollback(state.collection.as_mut());
                    warn!(error = %err, ?status, "delete failed; speculative removal undone");
                    Err(err)
                }
            }
        })
    }

    fn spawn<T, F>(&self, span: Span, round_trip: F) -> Mutation<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let guard = InFlight::enter(self.clone());
        let handle = tokio::spawn(
            async move {
                let outcome = round_trip.await;
                drop(guard);
                outcome
            }
            .instrument(span),
        );
        Mutation::new(handle)
    }

    fn reject<T: Send + 'static>(&self, id: TodoId) -> Mutation<T> {
        debug!(id = %id, "refusing to send a placeholder id to the server");
        Mutation::new(tokio::spawn(std::future::ready(Err(
            CacheError::Unconfirmed(id),
        ))))
    }

    fn state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.shared
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.shared
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts a mutation as in flight until dropped; dropping also invalidates
/// the cache, whether the round trip finished or the task panicked.
struct InFlight {
    cache: OptimisticCollectionCache,
}

impl InFlight {
    fn enter(cache: OptimisticCollectionCache) -> Self {
        cache.shared.in_flight.fetch_add(1, Ordering::AcqRel);
        Self { cache }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.cache.invalidate();
        self.cache.shared.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
