//! Client-side state of a tracked player or team.

use serde::{Deserialize, Serialize};

use super::{EntityRef, RosterPlayer, TrendData};

/// Fetch lifecycle of one tracked entity.
///
/// Every entity starts `Pending`. `Ready` and `Failed` are terminal for a
/// single fetch but re-enterable: a range change pushes the entity back to
/// `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed,
}

impl<T> LoadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// A tracked entity with its latest applied fetch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<T> {
    pub entity: EntityRef,
    pub state: LoadState<T>,
    /// Generation of the most recently issued fetch for this entity.
    pub generation: u64,
}

impl<T> Tracked<T> {
    pub fn pending(entity: EntityRef, generation: u64) -> Self {
        Self {
            entity,
            state: LoadState::Pending,
            generation,
        }
    }

    pub fn id(&self) -> u32 {
        self.entity.id
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn loading(&self) -> bool {
        self.state.is_pending()
    }

    pub fn error(&self) -> bool {
        self.state.is_failed()
    }
}

/// A tracked player: trends are present once ready.
pub type TrackedPlayer = Tracked<TrendData>;

/// A tracked team: the roster is replaced wholesale on each fetch.
pub type TrackedTeam = Tracked<Vec<RosterPlayer>>;

impl TrackedPlayer {
    pub fn trends(&self) -> Option<&TrendData> {
        self.state.data()
    }
}

impl TrackedTeam {
    /// Roster rows, empty while pending or after a failure.
    pub fn roster(&self) -> &[RosterPlayer] {
        self.state.data().map(Vec::as_slice).unwrap_or(&[])
    }
}
