//! Canonical interaction storage.
//!
//! [`InteractionStore`] owns every [`Interaction`] and the [`ProximityIndex`]
//! built over them. Both live behind one `RwLock`, so a mutation and its index
//! update are a single critical section and a query sees each entity either
//! fully before or fully after a change.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::{error, trace};

use crate::error::{InteractionError, Result};
use crate::index::{LinearIndex, ProximityIndex};
use crate::interaction::{Interaction, InteractionSnapshot};
use crate::types::{Dimension, InteractionKey, Position};

struct StoreState {
    entries: BTreeMap<InteractionKey, Interaction>,
    index: Box<dyn ProximityIndex>,
}

impl StoreState {
    /// Applies `mutate` to an existing entry and re-indexes it.
    ///
    /// Returns `false` without touching anything if the key is absent.
    fn update(&mut self, key: InteractionKey, mutate: impl FnOnce(&mut Interaction)) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };

        self.index.remove(entry);
        mutate(entry);
        self.index.insert(entry);
        true
    }
}

/// Thread-safe owner of all interactions.
///
/// Reads degrade to "absent" if the lock is poisoned; mutations report
/// [`InteractionError::LockPoisoned`].
pub struct InteractionStore {
    state: RwLock<StoreState>,
}

impl InteractionStore {
    /// Creates an empty store backed by the given index.
    pub fn new(index: Box<dyn ProximityIndex>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: BTreeMap::new(),
                index,
            }),
        }
    }

    /// Inserts a new interaction.
    ///
    /// The interaction is indexed before this returns. An existing entry with
    /// the same key is left untouched and [`InteractionError::DuplicateKey`]
    /// is returned.
    pub fn create(
        &self,
        key: InteractionKey,
        position: Position,
        dimension: Dimension,
        range: u32,
    ) -> Result<Interaction> {
        let mut state = self
            .state
            .write()
            .map_err(|_| InteractionError::LockPoisoned)?;

        if state.entries.contains_key(&key) {
            return Err(InteractionError::DuplicateKey { key });
        }

        let interaction = Interaction::new(key, position, dimension, range);
        state.index.insert(&interaction);
        state.entries.insert(key, interaction.clone());

        trace!(target: "interaction::store", %key, %dimension, range, "interaction created");
        Ok(interaction)
    }

    /// Returns a copy of the interaction, if present.
    pub fn get(&self, key: InteractionKey) -> Option<Interaction> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.entries.get(&key).cloned())
    }

    pub fn exists(&self, key: InteractionKey) -> bool {
        self.state
            .read()
            .map(|state| state.entries.contains_key(&key))
            .unwrap_or(false)
    }

    /// Moves an interaction. Returns `Ok(false)` if the key is absent.
    pub fn set_position(&self, key: InteractionKey, position: Position) -> Result<bool> {
        self.write_update(key, |entry| entry.set_position(position))
    }

    /// Changes the matching radius. `range_squared` is recomputed in the same
    /// critical section. Returns `Ok(false)` if the key is absent.
    pub fn set_range(&self, key: InteractionKey, range: u32) -> Result<bool> {
        self.write_update(key, |entry| entry.set_range(range))
    }

    /// Moves an interaction to another dimension. Returns `Ok(false)` if the
    /// key is absent.
    pub fn set_dimension(&self, key: InteractionKey, dimension: Dimension) -> Result<bool> {
        self.write_update(key, |entry| entry.set_dimension(dimension))
    }

    /// Evicts an interaction from the index, then from the store.
    ///
    /// Returns the removed entity, or `None` if the key was absent.
    pub fn remove(&self, key: InteractionKey) -> Result<Option<Interaction>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| InteractionError::LockPoisoned)?;

        let Some(entry) = state.entries.get(&key) else {
            return Ok(None);
        };
        let entry = entry.clone();
        state.index.remove(&entry);
        state.entries.remove(&key);

        trace!(target: "interaction::store", %key, "interaction removed");
        Ok(Some(entry))
    }

    /// Returns snapshots of every interaction in `dimension` whose radius
    /// contains `point`, in ascending key order.
    pub fn query(&self, point: Position, dimension: Dimension) -> Vec<InteractionSnapshot> {
        let Ok(state) = self.state.read() else {
            error!(target: "interaction::store", "store lock poisoned, query returns no matches");
            return Vec::new();
        };

        let mut candidates = Vec::new();
        state.index.candidates(point, dimension, &mut candidates);
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter_map(|key| state.entries.get(&key))
            .filter(|entry| entry.contains(point, dimension))
            .map(Interaction::snapshot)
            .collect()
    }

    /// Number of stored interactions.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|state| state.entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in ascending order.
    pub fn keys(&self) -> Vec<InteractionKey> {
        self.state
            .read()
            .map(|state| state.entries.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Name of the index backend in use.
    pub fn index_name(&self) -> &'static str {
        self.state
            .read()
            .map(|state| state.index.name())
            .unwrap_or("unavailable")
    }

    fn write_update(
        &self,
        key: InteractionKey,
        mutate: impl FnOnce(&mut Interaction),
    ) -> Result<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|_| InteractionError::LockPoisoned)?;
        Ok(state.update(key, mutate))
    }
}

impl Default for InteractionStore {
    fn default() -> Self {
        Self::new(Box::new(LinearIndex::new()))
    }
}
