use std::collections::{BTreeSet, HashMap};

use super::ProximityIndex;
use crate::interaction::Interaction;
use crate::types::{Dimension, InteractionKey, Position};

/// Dimension-partitioned scan.
#[derive(Debug, Default)]
pub struct LinearIndex {
    partitions: HashMap<Dimension, BTreeSet<InteractionKey>>,
    len: usize,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProximityIndex for LinearIndex {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn insert(&mut self, interaction: &Interaction) {
        if self
            .partitions
            .entry(interaction.dimension())
            .or_default()
            .insert(interaction.key())
        {
            self.len += 1;
        }
    }

    fn remove(&mut self, interaction: &Interaction) {
        let dimension = interaction.dimension();
        let Some(keys) = self.partitions.get_mut(&dimension) else {
            return;
        };

        if keys.remove(&interaction.key()) {
            self.len -= 1;
        }
        if keys.is_empty() {
            self.partitions.remove(&dimension);
        }
    }

    fn candidates(&self, _point: Position, dimension: Dimension, out: &mut Vec<InteractionKey>) {
        if let Some(keys) = self.partitions.get(&dimension) {
            out.extend(keys.iter().copied());
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(id: u64, dimension: i32) -> Interaction {
        Interaction::new(
            InteractionKey::new(1, id),
            Position::ORIGIN,
            Dimension(dimension),
            5,
        )
    }

    #[test]
    fn candidates_are_limited_to_dimension() {
        let mut index = LinearIndex::new();
        index.insert(&interaction(1, 0));
        index.insert(&interaction(2, 1));

        let mut out = Vec::new();
        index.candidates(Position::ORIGIN, Dimension(1), &mut out);
        assert_eq!(out, vec![InteractionKey::new(1, 2)]);
    }

    #[test]
    fn remove_drops_empty_partitions() {
        let mut index = LinearIndex::new();
        let entry = interaction(1, 3);
        index.insert(&entry);
        index.remove(&entry);

        assert!(index.is_empty());
        assert!(index.partitions.is_empty());

        // Removing again is harmless.
        index.remove(&entry);
        assert_eq!(index.len(), 0);
    }
}
