use std::fmt;

/// Composite identity of an interaction: `(type, id)`.
///
/// Ordering is lexicographic on `(kind, id)`, which is the order query
/// results are reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractionKey {
    pub kind: u64,
    pub id: u64,
}

impl InteractionKey {
    pub const fn new(kind: u64, id: u64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for InteractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

/// Partition label. Interactions and actors only meet inside the same dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Dimension(pub i32);

impl Dimension {
    pub const DEFAULT: Self = Self(0);
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a connected actor, owned by the host runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// World-space point.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance, accumulated in `f64`.
    ///
    /// Widening before subtracting keeps integer-valued coordinates exact, so
    /// boundary comparisons against `range²` do not drift.
    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        let dz = f64::from(self.z) - f64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }
}

/// Current location of an actor as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ActorLocation {
    pub position: Position,
    pub dimension: Dimension,
}

impl ActorLocation {
    pub const fn new(position: Position, dimension: Dimension) -> Self {
        Self {
            position,
            dimension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_kind_then_id() {
        let mut keys = vec![
            InteractionKey::new(2, 0),
            InteractionKey::new(1, 5),
            InteractionKey::new(1, 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                InteractionKey::new(1, 2),
                InteractionKey::new(1, 5),
                InteractionKey::new(2, 0),
            ]
        );
    }

    #[test]
    fn distance_squared_is_exact_for_integer_coordinates() {
        let a = Position::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance_squared(Position::ORIGIN), 25.0);
        assert_eq!(Position::ORIGIN.distance_squared(a), 25.0);
    }

    #[test]
    fn key_display_matches_legacy_format() {
        assert_eq!(InteractionKey::new(7, 42).to_string(), "7_42");
    }
}
