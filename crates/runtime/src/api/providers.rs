//! Asynchronous seams to the host runtime.
//!
//! The host owns actor lifecycle and network transport. The dispatch pipeline
//! consumes it only through [`ActorHost`] (where is this actor now?) and
//! [`Broadcaster`] (deliver this event to remote listeners).
use async_trait::async_trait;
use interaction_core::{ActorId, ActorLocation, Dimension, Position};

use super::errors::{BroadcastError, HostError};
use crate::events::InteractionEvent;

/// Read access to live actor state.
///
/// Implementations return a snapshot; nothing is locked against concurrent
/// actor movement.
#[async_trait]
pub trait ActorHost: Send + Sync {
    async fn current_position(&self, actor: ActorId) -> Result<Position, HostError>;

    async fn current_dimension(&self, actor: ActorId) -> Result<Dimension, HostError>;

    /// Resolves position and dimension together.
    ///
    /// The default issues the two lookups in sequence. Hosts that can read
    /// both atomically should override it.
    async fn locate(&self, actor: ActorId) -> Result<ActorLocation, HostError> {
        let position = self.current_position(actor).await?;
        let dimension = self.current_dimension(actor).await?;
        Ok(ActorLocation::new(position, dimension))
    }
}

/// Outbound delivery of dispatch results.
///
/// Sinks are fire-and-forget from the pipeline's point of view: an error is
/// logged and the remaining sinks still receive the event.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Returns a short name for this sink (used in logging).
    fn name(&self) -> &'static str;

    async fn broadcast(&self, event: &InteractionEvent) -> Result<(), BroadcastError>;
}
