//! The interaction entity and its detached snapshot form.

use crate::types::{Dimension, InteractionKey, Position};

/// A spatially anchored, ranged entity.
///
/// Identity is fixed at construction. Fields are private so `range_squared`
/// can never drift from `range`; mutation goes through
/// [`InteractionStore`](crate::InteractionStore), which keeps the proximity
/// index in step.
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    key: InteractionKey,
    position: Position,
    dimension: Dimension,
    range: u32,
    range_squared: u64,
}

impl Interaction {
    pub fn new(key: InteractionKey, position: Position, dimension: Dimension, range: u32) -> Self {
        Self {
            key,
            position,
            dimension,
            range,
            range_squared: square(range),
        }
    }

    pub fn key(&self) -> InteractionKey {
        self.key
    }

    pub fn kind(&self) -> u64 {
        self.key.kind
    }

    pub fn id(&self) -> u64 {
        self.key.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn range_squared(&self) -> u64 {
        self.range_squared
    }

    /// Returns true if `point` in `dimension` lies inside this interaction's
    /// radius. The boundary is inclusive.
    pub fn contains(&self, point: Position, dimension: Dimension) -> bool {
        self.dimension == dimension
            && self.position.distance_squared(point) <= self.range_squared as f64
    }

    /// Detached value copy handed to listeners.
    pub fn snapshot(&self) -> InteractionSnapshot {
        InteractionSnapshot {
            id: self.key.id,
            kind: self.key.kind,
            position: self.position,
            dimension: self.dimension,
            range: self.range,
            range_squared: self.range_squared,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_dimension(&mut self, dimension: Dimension) {
        self.dimension = dimension;
    }

    pub(crate) fn set_range(&mut self, range: u32) {
        self.range = range;
        self.range_squared = square(range);
    }
}

fn square(range: u32) -> u64 {
    u64::from(range) * u64::from(range)
}

/// Public fields of a matched interaction at the moment it was matched.
///
/// Serialized as `{ id, type, position: {x, y, z}, dimension, range,
/// rangeSquared }`, the shape remote listeners already consume.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InteractionSnapshot {
    pub id: u64,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: u64,
    pub position: Position,
    pub dimension: Dimension,
    pub range: u32,
    pub range_squared: u64,
}

impl InteractionSnapshot {
    pub fn key(&self) -> InteractionKey {
        InteractionKey::new(self.kind, self.id)
    }
}
