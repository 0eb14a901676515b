//! Runtime configuration structures and loaders.
use std::env;

use interaction_core::{GridIndex, LinearIndex, ProximityIndex};

/// Runtime configuration shared across the service and dispatch workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Per-channel buffer of the in-process event bus.
    pub event_buffer_size: usize,
    pub index: IndexConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            index: IndexConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `INTERACTION_EVENT_BUFFER` - Per-channel event buffer (default: 100)
    /// - `INTERACTION_INDEX` - `linear` or `grid` (default: grid)
    /// - `INTERACTION_GRID_CELL_SIZE` - Grid cell edge length (default: 64)
    /// - `INTERACTION_GRID_MAX_CELLS` - Cells one entry may occupy before it
    ///   moves to the overflow set (default: 256)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(capacity) = parse::<usize>(&lookup, "INTERACTION_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        let kind = lookup("INTERACTION_INDEX").map(|v| v.trim().to_ascii_lowercase());
        config.index = match kind.as_deref() {
            Some("linear") => IndexConfig::Linear,
            Some("grid") | None => IndexConfig::Grid {
                cell_size: parse(&lookup, "INTERACTION_GRID_CELL_SIZE")
                    .unwrap_or(GridIndex::DEFAULT_CELL_SIZE),
                max_cells_per_entry: parse(&lookup, "INTERACTION_GRID_MAX_CELLS")
                    .unwrap_or(GridIndex::DEFAULT_MAX_CELLS_PER_ENTRY),
            },
            Some(other) => {
                tracing::warn!(
                    target: "runtime::config",
                    value = other,
                    "unknown INTERACTION_INDEX, using grid"
                );
                IndexConfig::default()
            }
        };

        config
    }
}

/// Proximity index backend selection.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexConfig {
    /// Scan every interaction in the queried dimension.
    Linear,
    /// Uniform horizontal grid.
    Grid {
        cell_size: f32,
        max_cells_per_entry: u32,
    },
}

impl IndexConfig {
    pub fn build(&self) -> Box<dyn ProximityIndex> {
        match *self {
            IndexConfig::Linear => Box::new(LinearIndex::new()),
            IndexConfig::Grid {
                cell_size,
                max_cells_per_entry,
            } => Box::new(GridIndex::new(cell_size, max_cells_per_entry)),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig::Grid {
            cell_size: GridIndex::DEFAULT_CELL_SIZE,
            max_cells_per_entry: GridIndex::DEFAULT_MAX_CELLS_PER_ENTRY,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
