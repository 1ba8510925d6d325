//! Persisted favorites.
//!
//! A single process-wide `FavoritesStore` owns the favorites set. It is
//! loaded once, mutated only through `toggle`, and the full record is
//! written back to storage after every toggle before the call returns.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{EntityKind, EntityRef};
use crate::storage::KeyValueStore;

/// Storage key of the favorites record.
pub const FAVORITES_KEY: &str = "sports_analytics_favorites";

/// Favorited players and teams, in the order they were starred.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Favorites {
    pub players: Vec<EntityRef>,
    pub teams: Vec<EntityRef>,
}

impl Favorites {
    pub fn list(&self, kind: EntityKind) -> &[EntityRef] {
        match kind {
            EntityKind::Player => &self.players,
            EntityKind::Team => &self.teams,
        }
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<EntityRef> {
        match kind {
            EntityKind::Player => &mut self.players,
            EntityKind::Team => &mut self.teams,
        }
    }

    pub fn contains(&self, kind: EntityKind, id: u32) -> bool {
        self.list(kind).iter().any(|e| e.id == id)
    }

    /// XOR `entity` into the set of its kind.
    pub fn toggled(mut self, kind: EntityKind, entity: EntityRef) -> Self {
        let list = self.list_mut(kind);
        if let Some(pos) = list.iter().position(|e| e.id == entity.id) {
            list.remove(pos);
        } else {
            list.push(entity);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.players.len() + self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop repeated ids, keeping the first occurrence.
    fn deduplicated(mut self) -> Self {
        for kind in [EntityKind::Player, EntityKind::Team] {
            let mut seen = HashSet::new();
            self.list_mut(kind).retain(|e| seen.insert(e.id));
        }
        self
    }
}

/// Read the persisted favorites. Absent, unreadable or corrupt records all
/// yield the empty value.
pub fn load_favorites(storage: &dyn KeyValueStore, key: &str) -> Favorites {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Favorites::default(),
        Err(e) => {
            warn!("Failed to read favorites, starting empty: {}", e);
            return Favorites::default();
        }
    };

    match serde_json::from_str::<Favorites>(&raw) {
        Ok(favorites) => favorites.deduplicated(),
        Err(e) => {
            warn!("Ignoring corrupt favorites record: {}", e);
            Favorites::default()
        }
    }
}

#[derive(Debug, Default)]
struct Indexed {
    favorites: Favorites,
    player_ids: HashSet<u32>,
    team_ids: HashSet<u32>,
}

impl Indexed {
    fn new(favorites: Favorites) -> Self {
        let player_ids = favorites.players.iter().map(|e| e.id).collect();
        let team_ids = favorites.teams.iter().map(|e| e.id).collect();
        Self {
            favorites,
            player_ids,
            team_ids,
        }
    }

    fn ids(&self, kind: EntityKind) -> &HashSet<u32> {
        match kind {
            EntityKind::Player => &self.player_ids,
            EntityKind::Team => &self.team_ids,
        }
    }
}

/// Process-wide favorites cell over a key-value store.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    state: RwLock<Indexed>,
}

impl FavoritesStore {
    /// Load favorites from `storage` under the default key.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load_with_key(storage, FAVORITES_KEY)
    }

    pub fn load_with_key(storage: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let favorites = load_favorites(storage.as_ref(), key);
        info!(
            "Loaded {} favorite players and {} favorite teams",
            favorites.players.len(),
            favorites.teams.len()
        );
        Self {
            storage,
            key: key.to_string(),
            state: RwLock::new(Indexed::new(favorites)),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Indexed> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Indexed> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Toggle membership of `id` and persist the full record.
    ///
    /// The write lock is held across the persist, so toggles are applied
    /// and written in order. A failed write is logged; the in-memory state
    /// keeps the toggle.
    pub fn toggle(&self, kind: EntityKind, id: u32, name: &str) -> Favorites {
        let mut state = self.write_state();
        let next = std::mem::take(&mut state.favorites).toggled(kind, EntityRef::new(id, name));
        *state = Indexed::new(next);

        let added = state.ids(kind).contains(&id);
        debug!(
            "{} favorite {} {} ({})",
            if added { "Added" } else { "Removed" },
            kind,
            name,
            id
        );

        match serde_json::to_string(&state.favorites) {
            Ok(json) => {
                if let Err(e) = self.storage.write(&self.key, &json) {
                    warn!("Failed to persist favorites: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize favorites: {}", e),
        }

        state.favorites.clone()
    }

    pub fn toggle_player(&self, id: u32, name: &str) -> Favorites {
        self.toggle(EntityKind::Player, id, name)
    }

    pub fn toggle_team(&self, id: u32, name: &str) -> Favorites {
        self.toggle(EntityKind::Team, id, name)
    }

    pub fn is_favorite(&self, kind: EntityKind, id: u32) -> bool {
        self.read_state().ids(kind).contains(&id)
    }

    pub fn is_player_favorite(&self, id: u32) -> bool {
        self.is_favorite(EntityKind::Player, id)
    }

    pub fn is_team_favorite(&self, id: u32) -> bool {
        self.is_favorite(EntityKind::Team, id)
    }

    pub fn snapshot(&self) -> Favorites {
        self.read_state().favorites.clone()
    }

    /// Total favorites across both kinds.
    pub fn count(&self) -> usize {
        self.read_state().favorites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn memory_store() -> (Arc<MemoryStore>, FavoritesStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = FavoritesStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_load_absent_is_empty() {
        let (_, store) = memory_store();
        assert_eq!(store.snapshot(), Favorites::default());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let storage = MemoryStore::with_record(FAVORITES_KEY, "{\"players\": [oops");
        let favorites = load_favorites(&storage, FAVORITES_KEY);

        assert_eq!(
            favorites,
            Favorites {
                players: vec![],
                teams: vec![]
            }
        );
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let storage = MemoryStore::with_record(FAVORITES_KEY, r#"{"players": 5, "teams": []}"#);
        assert!(load_favorites(&storage, FAVORITES_KEY).is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let storage = MemoryStore::with_record(
            FAVORITES_KEY,
            r#"{"players": [{"id": 1, "name": "A"}, {"id": 1, "name": "A again"}], "teams": []}"#,
        );
        let favorites = load_favorites(&storage, FAVORITES_KEY);

        assert_eq!(favorites.players, vec![EntityRef::new(1, "A")]);
    }

    #[test]
    fn test_toggle_inserts_then_removes() {
        let (_, store) = memory_store();

        let after_add = store.toggle_player(2544, "LeBron James");
        assert_eq!(after_add.players, vec![EntityRef::new(2544, "LeBron James")]);
        assert!(store.is_player_favorite(2544));

        let after_remove = store.toggle_player(2544, "LeBron James");
        assert!(after_remove.players.is_empty());
        assert!(!store.is_player_favorite(2544));
    }

    #[test]
    fn test_toggle_twice_is_involution() {
        let (_, store) = memory_store();
        store.toggle_player(1, "A");
        store.toggle_team(10, "Team X");
        let before = store.snapshot();

        store.toggle_player(2, "B");
        store.toggle_player(2, "B");
        assert_eq!(store.snapshot(), before);

        store.toggle_team(10, "Team X");
        store.toggle_team(10, "Team X");
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_kinds_are_independent() {
        let (_, store) = memory_store();
        store.toggle_player(7, "Player Seven");

        assert!(store.is_favorite(EntityKind::Player, 7));
        assert!(!store.is_favorite(EntityKind::Team, 7));

        store.toggle_team(7, "Team Seven");
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_every_toggle_is_persisted() {
        let (storage, store) = memory_store();

        store.toggle_player(1, "A");
        let persisted = load_favorites(storage.as_ref(), FAVORITES_KEY);
        assert_eq!(persisted, store.snapshot());

        store.toggle_team(5, "Team");
        let persisted = load_favorites(storage.as_ref(), FAVORITES_KEY);
        assert_eq!(persisted.teams, vec![EntityRef::new(5, "Team")]);
    }

    #[test]
    fn test_persisted_shape() {
        let (storage, store) = memory_store();
        store.toggle_player(1, "A");

        let raw = storage.read(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"players":[{"id":1,"name":"A"}],"teams":[]}"#);
    }

    #[test]
    fn test_survives_reload_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));

        let store = FavoritesStore::load(storage.clone());
        store.toggle_player(201939, "Stephen Curry");
        store.toggle_team(1610612744, "Golden State Warriors");
        drop(store);

        let reloaded = FavoritesStore::load(storage);
        assert!(reloaded.is_player_favorite(201939));
        assert!(reloaded.is_team_favorite(1610612744));
    }

    #[test]
    fn test_favorites_toggled_is_pure() {
        let start = Favorites::default();
        let once = start.clone().toggled(EntityKind::Player, EntityRef::new(3, "C"));
        let twice = once.clone().toggled(EntityKind::Player, EntityRef::new(3, "C"));

        assert!(once.contains(EntityKind::Player, 3));
        assert_eq!(twice, start);
    }
}
