//! Proximity index backends.
//!
//! An index answers the broad-phase question "which interactions could
//! contain this point?". It stores keys only; the owning
//! [`InteractionStore`](crate::InteractionStore) performs the exact distance
//! check against its canonical entities. A backend may return false positives
//! but never a false negative, and never a key from another dimension.
//!
//! # Backends
//!
//! - [`LinearIndex`]: every key in the dimension is a candidate. Reference
//!   implementation, fine for small worlds.
//! - [`GridIndex`]: uniform grid over the horizontal plane. Each interaction is
//!   registered in every cell its radius overlaps, so a query touches a single
//!   cell.

mod grid;
mod linear;

pub use grid::GridIndex;
pub use linear::LinearIndex;

use crate::interaction::Interaction;
use crate::types::{Dimension, InteractionKey, Position};

/// Contract shared by all index backends.
///
/// The store calls these methods while holding its write lock, so
/// implementations need no interior synchronization. Updates are expressed as
/// `remove(old)` followed by `insert(new)`; `remove` always receives the exact
/// value previously passed to `insert`.
pub trait ProximityIndex: Send + Sync {
    /// Returns a short name for this backend (used in logging).
    fn name(&self) -> &'static str;

    fn insert(&mut self, interaction: &Interaction);

    fn remove(&mut self, interaction: &Interaction);

    /// Appends candidate keys for `point` in `dimension` to `out`.
    ///
    /// A key appears at most once per call.
    fn candidates(&self, point: Position, dimension: Dimension, out: &mut Vec<InteractionKey>);

    /// Number of indexed interactions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
