use std::collections::{BTreeSet, HashMap};

use super::ProximityIndex;
use crate::interaction::Interaction;
use crate::types::{Dimension, InteractionKey, Position};

/// Column coordinate on the horizontal plane. Height is not bucketed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Cell {
    dimension: Dimension,
    x: i64,
    y: i64,
}

/// Inclusive span of cells covered by one interaction's bounding square.
#[derive(Clone, Copy, Debug)]
struct Footprint {
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
}

impl Footprint {
    fn cell_count(&self) -> u128 {
        let w = (i128::from(self.max_x) - i128::from(self.min_x)) as u128 + 1;
        let h = (i128::from(self.max_y) - i128::from(self.min_y)) as u128 + 1;
        w.saturating_mul(h)
    }
}

/// Uniform grid index.
///
/// Each interaction is registered in every cell its horizontal bounding square
/// overlaps. Interactions whose footprint exceeds `max_cells_per_entry` cells
/// are kept in a per-dimension overflow set that every query in that
/// dimension scans.
#[derive(Debug)]
pub struct GridIndex {
    cell_size: f64,
    max_cells_per_entry: u32,
    cells: HashMap<Cell, BTreeSet<InteractionKey>>,
    overflow: HashMap<Dimension, BTreeSet<InteractionKey>>,
    len: usize,
}

impl GridIndex {
    pub const DEFAULT_CELL_SIZE: f32 = 64.0;
    pub const DEFAULT_MAX_CELLS_PER_ENTRY: u32 = 256;

    /// Creates a grid with the given cell edge length.
    ///
    /// Non-positive or non-finite sizes fall back to [`Self::DEFAULT_CELL_SIZE`].
    pub fn new(cell_size: f32, max_cells_per_entry: u32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            Self::DEFAULT_CELL_SIZE
        };

        Self {
            cell_size: f64::from(cell_size),
            max_cells_per_entry: max_cells_per_entry.max(1),
            cells: HashMap::new(),
            overflow: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size as f32
    }

    fn coord(&self, value: f64) -> i64 {
        (value / self.cell_size).floor() as i64
    }

    fn footprint(&self, interaction: &Interaction) -> Footprint {
        let position = interaction.position();
        let range = f64::from(interaction.range());
        let (x, y) = (f64::from(position.x), f64::from(position.y));

        Footprint {
            min_x: self.coord(x - range),
            max_x: self.coord(x + range),
            min_y: self.coord(y - range),
            max_y: self.coord(y + range),
        }
    }

    fn is_oversized(&self, footprint: &Footprint) -> bool {
        footprint.cell_count() > u128::from(self.max_cells_per_entry)
    }

    fn covered_cells(dimension: Dimension, footprint: Footprint) -> impl Iterator<Item = Cell> {
        (footprint.min_x..=footprint.max_x).flat_map(move |x| {
            (footprint.min_y..=footprint.max_y).map(move |y| Cell { dimension, x, y })
        })
    }
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_SIZE, Self::DEFAULT_MAX_CELLS_PER_ENTRY)
    }
}

impl ProximityIndex for GridIndex {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn insert(&mut self, interaction: &Interaction) {
        let key = interaction.key();
        let dimension = interaction.dimension();
        let footprint = self.footprint(interaction);

        if self.is_oversized(&footprint) {
            self.overflow.entry(dimension).or_default().insert(key);
        } else {
            for cell in Self::covered_cells(dimension, footprint) {
                self.cells.entry(cell).or_default().insert(key);
            }
        }
        self.len += 1;
    }

    fn remove(&mut self, interaction: &Interaction) {
        let key = interaction.key();
        let dimension = interaction.dimension();
        let footprint = self.footprint(interaction);

        let removed = if self.is_oversized(&footprint) {
            let Some(keys) = self.overflow.get_mut(&dimension) else {
                return;
            };
            let removed = keys.remove(&key);
            if keys.is_empty() {
                self.overflow.remove(&dimension);
            }
            removed
        } else {
            let mut removed = false;
            for cell in Self::covered_cells(dimension, footprint) {
                if let Some(keys) = self.cells.get_mut(&cell) {
                    removed |= keys.remove(&key);
                    if keys.is_empty() {
                        self.cells.remove(&cell);
                    }
                }
            }
            removed
        };

        if removed {
            self.len -= 1;
        }
    }

    fn candidates(&self, point: Position, dimension: Dimension, out: &mut Vec<InteractionKey>) {
        let cell = Cell {
            dimension,
            x: self.coord(f64::from(point.x)),
            y: self.coord(f64::from(point.y)),
        };

        if let Some(keys) = self.cells.get(&cell) {
            out.extend(keys.iter().copied());
        }
        if let Some(keys) = self.overflow.get(&dimension) {
            out.extend(keys.iter().copied());
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}
