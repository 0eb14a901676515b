//! In-memory ActorHost implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use interaction_core::{ActorId, ActorLocation, Dimension, Position};

use crate::api::{ActorHost, HostError};

/// In-memory implementation of ActorHost.
///
/// Tracks connected actors and their locations. Cheap to share behind an
/// `Arc` so a test can move actors while dispatches are running.
pub struct InMemoryActorHost {
    actors: RwLock<HashMap<ActorId, ActorLocation>>,
}

impl InMemoryActorHost {
    /// Create a host with no connected actors.
    pub fn new() -> Self {
        Self {
            actors: RwLock::new(HashMap::new()),
        }
    }

    /// Connect an actor, or move it if already connected.
    pub fn place(&self, actor: ActorId, position: Position, dimension: Dimension) {
        let mut actors = self
            .actors
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        actors.insert(actor, ActorLocation::new(position, dimension));
    }

    /// Move a connected actor. Unknown actors are ignored.
    pub fn move_to(&self, actor: ActorId, position: Position) {
        let mut actors = self
            .actors
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(location) = actors.get_mut(&actor) {
            location.position = position;
        }
    }

    /// Disconnect an actor.
    pub fn disconnect(&self, actor: ActorId) {
        let mut actors = self
            .actors
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        actors.remove(&actor);
    }

    pub fn is_connected(&self, actor: ActorId) -> bool {
        self.actors
            .read()
            .map(|actors| actors.contains_key(&actor))
            .unwrap_or(false)
    }

    fn lookup(&self, actor: ActorId) -> Result<ActorLocation, HostError> {
        let actors = self
            .actors
            .read()
            .map_err(|_| HostError::Unavailable("actor table lock poisoned".into()))?;
        actors
            .get(&actor)
            .copied()
            .ok_or(HostError::ActorNotFound(actor))
    }
}

impl Default for InMemoryActorHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorHost for InMemoryActorHost {
    async fn current_position(&self, actor: ActorId) -> Result<Position, HostError> {
        self.lookup(actor).map(|location| location.position)
    }

    async fn current_dimension(&self, actor: ActorId) -> Result<Dimension, HostError> {
        self.lookup(actor).map(|location| location.dimension)
    }

    async fn locate(&self, actor: ActorId) -> Result<ActorLocation, HostError> {
        self.lookup(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locate_reflects_latest_move() {
        let host = InMemoryActorHost::new();
        let actor = ActorId(1);
        host.place(actor, Position::ORIGIN, Dimension(2));
        host.move_to(actor, Position::new(5.0, 0.0, 0.0));

        let location = host.locate(actor).await.unwrap();
        assert_eq!(location.position, Position::new(5.0, 0.0, 0.0));
        assert_eq!(location.dimension, Dimension(2));
        assert_eq!(host.current_dimension(actor).await.unwrap(), Dimension(2));
    }

    #[tokio::test]
    async fn disconnected_actor_is_not_found() {
        let host = InMemoryActorHost::new();
        let actor = ActorId(9);
        host.place(actor, Position::ORIGIN, Dimension(0));
        host.disconnect(actor);

        assert!(!host.is_connected(actor));
        assert!(matches!(
            host.current_position(actor).await,
            Err(HostError::ActorNotFound(ActorId(9)))
        ));
    }
}
