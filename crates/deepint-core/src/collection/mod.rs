//! Lazy cached collection
//!
//! One [`LazyCollection`] per container and entity type. It holds two sources
//! of entities:
//!
//! - `cache`: entities already materialized locally, or absent before the
//!   first load;
//! - `pending`: a single-pass [`Paginator`] over the list endpoint, started by
//!   [`LazyCollection::load`].
//!
//! Lookups consult the cache first and then pull from `pending`. What happens
//! to the records pulled along the way depends on the [`ScanMode`].


use crate::entity::{Entity, EntityFactory, record_id};
use crate::error::{DeepintResult, ResultExt};
use crate::http::{ApiContext, ApiRequest, Paginator};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// What a scan of the pending sequence does with the records it passes over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Every pulled entity is appended to the cache. Once the pending
    /// sequence runs dry the cache holds the whole collection, and repeated
    /// lookups never lose elements.
    #[default]
    Memoize,
    /// Pulled entities are not kept. A lookup drops everything before its
    /// match, and a drained sequence stays drained until the next `load()`.
    /// Uses constant memory for very large collections.
    Streaming,
}

struct State<E> {
    cache: Option<Vec<E>>,
    pending: Option<Paginator>,
    loaded: bool,
    evicted: HashSet<String>,
}

impl<E: Entity> State<E> {
    fn cache_position(&self, id: &str) -> Option<usize> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.iter().position(|e| e.id() == id))
    }

    /// Cache `entity` unless its id is already cached. Returns the cached
    /// handle; an unloaded one takes over the snapshot of `entity`.
    fn append(&mut self, entity: E) -> E {
        let cache = self.cache.get_or_insert_with(Vec::new);
        match cache.iter().find(|e| e.id() == entity.id()) {
            Some(cached) => {
                if !cached.snapshot().is_loaded() && entity.snapshot().is_loaded() {
                    cached.snapshot().replace(entity.info());
                }
                cached.clone()
            }
            None => {
                cache.push(entity.clone());
                entity
            }
        }
    }
}

/// Cache plus lazily paginated listing for one entity type
pub struct LazyCollection<E> {
    context: ApiContext,
    list_request: ApiRequest,
    factory: Arc<dyn EntityFactory<E>>,
    mode: ScanMode,
    state: Mutex<State<E>>,
}

impl<E: Entity> LazyCollection<E> {
    /// New, never-loaded collection
    pub fn new(
        context: ApiContext,
        list_request: ApiRequest,
        factory: Arc<dyn EntityFactory<E>>,
    ) -> Self {
        Self::from_state(context, list_request, factory, None)
    }

    /// Collection seeded with already fetched entities; counts as loaded
    pub fn with_cache(
        context: ApiContext,
        list_request: ApiRequest,
        factory: Arc<dyn EntityFactory<E>>,
        cache: Vec<E>,
    ) -> Self {
        Self::from_state(context, list_request, factory, Some(cache))
    }

    fn from_state(
        context: ApiContext,
        list_request: ApiRequest,
        factory: Arc<dyn EntityFactory<E>>,
        cache: Option<Vec<E>>,
    ) -> Self {
        Self {
            context,
            list_request,
            factory,
            mode: ScanMode::default(),
            state: Mutex::new(State {
                loaded: cache.is_some(),
                cache,
                pending: None,
                evicted: HashSet::new(),
            }),
        }
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn factory(&self) -> &Arc<dyn EntityFactory<E>> {
        &self.factory
    }

    /// Discard the cache and start a fresh listing.
    ///
    /// No request is issued until the listing is first pulled from.
    pub async fn load(&self) {
        let mut state = self.state.lock().await;
        self.reset(&mut state);
    }

    fn reset(&self, state: &mut State<E>) {
        debug!(path = %self.list_request.path, "collection reset");
        state.cache = None;
        state.pending = Some(Paginator::new(
            self.context.clone(),
            self.list_request.clone(),
        ));
        state.loaded = true;
        state.evicted.clear();
    }

    /// Look an entity up by identifier or name; first match wins.
    ///
    /// With neither `id` nor `name` this returns `None` (after reloading, if a
    /// reload was due).
    pub async fn fetch(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        force_reload: bool,
    ) -> DeepintResult<Option<E>> {
        let mut state = self.state.lock().await;
        if force_reload || !state.loaded {
            self.reset(&mut state);
        }

        if id.is_none() && name.is_none() {
            return Ok(None);
        }

        if !force_reload {
            if let Some(found) = state
                .cache
                .as_ref()
                .and_then(|cache| cache.iter().find(|e| e.matches(id, name)))
            {
                return Ok(Some(found.clone()));
            }
        }

        self.scan_pending(&mut state, |entity| entity.matches(id, name))
            .await
    }

    pub async fn fetch_by_id(&self, id: &str, force_reload: bool) -> DeepintResult<Option<E>> {
        self.fetch(Some(id), None, force_reload).await
    }

    pub async fn fetch_by_name(&self, name: &str, force_reload: bool) -> DeepintResult<Option<E>> {
        self.fetch(None, Some(name), force_reload).await
    }

    /// Every entity in the collection.
    ///
    /// In [`ScanMode::Streaming`] a populated cache is returned as is, and a
    /// drained listing yields nothing until the next reload.
    pub async fn fetch_all(&self, force_reload: bool) -> DeepintResult<Vec<E>> {
        let mut state = self.state.lock().await;
        if force_reload || !state.loaded {
            self.reset(&mut state);
        }

        match self.mode {
            ScanMode::Memoize => {
                self.scan_pending(&mut state, |_| false).await?;
                Ok(state.cache.clone().unwrap_or_default())
            }
            ScanMode::Streaming => {
                if !force_reload {
                    if let Some(cache) = &state.cache {
                        return Ok(cache.clone());
                    }
                }

                let mut entities = Vec::new();
                while let Some(entity) = self.pull(&mut state).await? {
                    entities.push(entity);
                }
                Ok(entities)
            }
        }
    }

    /// Issue a create request, then load the new entity and append it to the
    /// cache. The listing in progress, if any, is left alone.
    pub async fn create(&self, request: ApiRequest, id_field: &str) -> DeepintResult<E> {
        let path = request.path.clone();
        let body = self
            .context
            .send(request)
            .await
            .with_context(|| format!("Creating under '{}'", path))?;
        let id = record_id(&body, id_field)?;

        let entity = self.factory.build(&id);
        entity.load().await?;
        debug!(path = %path, id = %id, "created entity");

        self.adopt(entity.clone()).await;
        Ok(entity)
    }

    /// Append an entity obtained elsewhere to the cache
    pub async fn adopt(&self, entity: E) {
        let mut state = self.state.lock().await;
        state.evicted.remove(entity.id());
        state.append(entity);
    }

    /// Drop an entity from the cache and from the rest of the current
    /// listing. Returns whether the cache held it.
    pub async fn evict(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        state.evicted.insert(id.to_string());
        match state.cache_position(id) {
            Some(position) => {
                if let Some(cache) = state.cache.as_mut() {
                    cache.remove(position);
                }
                true
            }
            None => false,
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.lock().await.loaded
    }

    /// Number of cached entities; `None` while the cache is absent
    pub async fn cached_len(&self) -> Option<usize> {
        self.state.lock().await.cache.as_ref().map(Vec::len)
    }

    /// Pull the next entity from the listing, skipping evicted ones
    async fn pull(&self, state: &mut State<E>) -> DeepintResult<Option<E>> {
        loop {
            let Some(pending) = state.pending.as_mut() else {
                return Ok(None);
            };
            let Some(record) = pending.next_record().await? else {
                return Ok(None);
            };

            let entity = self.factory.from_record(&record)?;
            if !state.evicted.contains(entity.id()) {
                return Ok(Some(entity));
            }
        }
    }

    async fn scan_pending(
        &self,
        state: &mut State<E>,
        is_match: impl Fn(&E) -> bool,
    ) -> DeepintResult<Option<E>> {
        while let Some(mut entity) = self.pull(state).await? {
            if self.mode == ScanMode::Memoize {
                entity = state.append(entity);
            }
            if is_match(&entity) {
                return Ok(Some(entity));
            }
        }

        if self.mode == ScanMode::Memoize && state.pending.take().is_some() {
            state.cache.get_or_insert_with(Vec::new);
        }
        Ok(None)
    }
}

impl<E> fmt::Debug for LazyCollection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("path", &self.list_request.path)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
