//! Interaction registry primitives.
//!
//! This crate holds the synchronous half of the proximity system:
//! - [`types`] defines identities, positions and dimensions
//! - [`interaction`] defines the entity and the snapshot handed to listeners
//! - [`index`] provides pluggable [`ProximityIndex`] backends
//! - [`store`] owns entities and keeps the index consistent under mutation
//!
//! The async trigger/broadcast pipeline lives in `interaction-runtime`.
pub mod error;
pub mod index;
pub mod interaction;
pub mod store;
pub mod types;

pub use error::{InteractionError, Result};
pub use index::{GridIndex, LinearIndex, ProximityIndex};
pub use interaction::{Interaction, InteractionSnapshot};
pub use store::InteractionStore;
pub use types::{ActorId, ActorLocation, Dimension, InteractionKey, Position};
