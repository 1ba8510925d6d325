//! Ordered, keyed list of tracked entities of one kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::loader::Loader;
use crate::fetch::{FetchError, StatsService};
use crate::models::{EntityKind, EntityRef, LoadState, Range, Tracked};

struct Slots<T> {
    order: Vec<u32>,
    entries: HashMap<u32, Tracked<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

/// Tracked entities with one in-flight fetch per issued generation.
///
/// Fetches run as independent tasks. A result is written back only when the
/// entity is still tracked and its generation equals the one the fetch was
/// issued with.
pub struct TrackedList<L: Loader> {
    loader: Arc<L>,
    service: Arc<dyn StatsService>,
    slots: Arc<RwLock<Slots<L::Data>>>,
    generations: Arc<AtomicU64>,
    tasks: Mutex<JoinSet<()>>,
}

impl<L: Loader> TrackedList<L> {
    pub fn new(loader: L, service: Arc<dyn StatsService>, generations: Arc<AtomicU64>) -> Self {
        Self {
            loader: Arc::new(loader),
            service,
            slots: Arc::new(RwLock::new(Slots::default())),
            generations,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track `entity` and fetch it at `range`. Returns false if already tracked.
    pub async fn add(&self, entity: EntityRef, range: Range) -> bool {
        let id = entity.id;
        let generation = {
            let mut slots = self.slots.write().await;
            if slots.entries.contains_key(&id) {
                debug!("{} {} already tracked", self.loader.kind(), id);
                return false;
            }
            let generation = self.next_generation();
            slots.order.push(id);
            slots.entries.insert(id, Tracked::pending(entity, generation));
            generation
        };

        self.spawn_fetch(id, range, generation);
        true
    }

    /// Stop tracking `id`. Returns false if it was not tracked.
    pub async fn remove(&self, id: u32) -> bool {
        let mut slots = self.slots.write().await;
        if slots.entries.remove(&id).is_none() {
            return false;
        }
        slots.order.retain(|tracked| *tracked != id);
        debug!("Stopped tracking {} {}", self.loader.kind(), id);
        true
    }

    /// Reset every tracked entity to pending and refetch it at `range`.
    pub async fn refetch_all(&self, range: Range) {
        let issued: Vec<(u32, u64)> = {
            let mut guard = self.slots.write().await;
            let Slots { order, entries } = &mut *guard;
            order
                .iter()
                .filter_map(|id| {
                    let entry = entries.get_mut(id)?;
                    entry.generation = self.next_generation();
                    entry.state = LoadState::Pending;
                    Some((*id, entry.generation))
                })
                .collect()
        };

        for (id, generation) in issued {
            self.spawn_fetch(id, range, generation);
        }
    }

    /// Replace the tracked set with `entities`, all pending at `range`.
    ///
    /// Repeated ids keep their first position.
    pub async fn replace_all(&self, entities: Vec<EntityRef>, range: Range) {
        let issued: Vec<(u32, u64)> = {
            let mut slots = self.slots.write().await;
            *slots = Slots::default();
            for entity in entities {
                let id = entity.id;
                if slots.entries.contains_key(&id) {
                    continue;
                }
                let generation = self.next_generation();
                slots.order.push(id);
                slots.entries.insert(id, Tracked::pending(entity, generation));
            }
            slots
                .order
                .iter()
                .filter_map(|id| slots.entries.get(id).map(|e| (*id, e.generation)))
                .collect()
        };

        for (id, generation) in issued {
            self.spawn_fetch(id, range, generation);
        }
    }

    /// Tracked entities in insertion order.
    pub async fn snapshot(&self) -> Vec<Tracked<L::Data>> {
        let slots = self.slots.read().await;
        slots
            .order
            .iter()
            .filter_map(|id| slots.entries.get(id).cloned())
            .collect()
    }

    pub async fn contains(&self, id: u32) -> bool {
        self.slots.read().await.entries.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Wait until every issued fetch has been applied or discarded.
    pub async fn settle(&self) {
        loop {
            let mut pending = std::mem::take(&mut *self.lock_tasks());
            if pending.is_empty() {
                return;
            }
            while let Some(joined) = pending.join_next().await {
                if let Err(e) = joined {
                    warn!("{} fetch task failed: {}", self.loader.kind(), e);
                }
            }
        }
    }

    fn spawn_fetch(&self, id: u32, range: Range, generation: u64) {
        let loader = Arc::clone(&self.loader);
        let service = Arc::clone(&self.service);
        let slots = Arc::clone(&self.slots);

        let mut tasks = self.lock_tasks();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            debug!(
                "Fetching {} {} at {} (generation {})",
                loader.kind(),
                id,
                range,
                generation
            );
            let result = loader.load(service.as_ref(), id, range).await;
            apply(&slots, loader.kind(), id, generation, result).await;
        });
    }
}

async fn apply<T>(
    slots: &RwLock<Slots<T>>,
    kind: EntityKind,
    id: u32,
    generation: u64,
    result: Result<T, FetchError>,
) {
    let mut slots = slots.write().await;
    let Some(entry) = slots.entries.get_mut(&id) else {
        debug!("Discarding result for removed {} {}", kind, id);
        return;
    };
    if entry.generation != generation {
        debug!(
            "Discarding stale result for {} {} (generation {}, current {})",
            kind, id, generation, entry.generation
        );
        return;
    }

    entry.state = match result {
        Ok(data) => LoadState::Ready(data),
        Err(e) => {
            warn!("Failed to load {} {}: {}", kind, id, e);
            LoadState::Failed
        }
    };
}
