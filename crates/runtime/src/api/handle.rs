//! Cloneable façade over the interaction runtime.
//!
//! [`InteractionService`] is the operation set exposed to binding layers:
//! interaction CRUD, event registration, and the trigger entry point for
//! actor-originated requests. Missing keys are silent no-ops throughout.
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use interaction_core::{
    ActorId, Dimension, Interaction, InteractionError, InteractionKey, InteractionSnapshot,
    InteractionStore, Position,
};

use super::errors::Result;
use super::registry::ChannelRegistry;
use crate::events::{EventBus, InteractionEvent};
use crate::workers::{DispatchOutcome, Dispatcher};

/// Client-facing handle to the interaction registry and dispatch pipeline
#[derive(Clone)]
pub struct InteractionService {
    store: Arc<InteractionStore>,
    channels: Arc<ChannelRegistry>,
    dispatcher: Arc<Dispatcher>,
    event_bus: EventBus,
}

impl InteractionService {
    pub(crate) fn new(
        store: Arc<InteractionStore>,
        channels: Arc<ChannelRegistry>,
        dispatcher: Arc<Dispatcher>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            channels,
            dispatcher,
            event_bus,
        }
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    /// Create an interaction and return its `id`.
    ///
    /// Fails with [`InteractionError::DuplicateKey`] if `(kind, id)` exists;
    /// the existing interaction is left as it was.
    pub fn create_interaction(
        &self,
        kind: u64,
        id: u64,
        position: Position,
        dimension: Dimension,
        range: u32,
    ) -> Result<u64> {
        let key = InteractionKey::new(kind, id);
        match self.store.create(key, position, dimension, range) {
            Ok(interaction) => Ok(interaction.id()),
            Err(error @ InteractionError::DuplicateKey { .. }) => {
                warn!(target: "runtime::interactions", %key, "duplicate interaction rejected");
                Err(error.into())
            }
            Err(error) => Err(error.into()),
        }
    }

    pub fn set_interaction_position(&self, kind: u64, id: u64, position: Position) -> Result<()> {
        self.store
            .set_position(InteractionKey::new(kind, id), position)?;
        Ok(())
    }

    pub fn set_interaction_range(&self, kind: u64, id: u64, range: u32) -> Result<()> {
        self.store.set_range(InteractionKey::new(kind, id), range)?;
        Ok(())
    }

    pub fn set_interaction_dimension(
        &self,
        kind: u64,
        id: u64,
        dimension: Dimension,
    ) -> Result<()> {
        self.store
            .set_dimension(InteractionKey::new(kind, id), dimension)?;
        Ok(())
    }

    /// Position of the interaction, or the origin if it does not exist.
    pub fn get_interaction_position(&self, kind: u64, id: u64) -> Position {
        self.interaction(kind, id)
            .map(|i| i.position())
            .unwrap_or_default()
    }

    /// Range of the interaction, or `0` if it does not exist.
    pub fn get_interaction_range(&self, kind: u64, id: u64) -> u32 {
        self.interaction(kind, id).map(|i| i.range()).unwrap_or(0)
    }

    /// Dimension of the interaction, or the default dimension if it does not
    /// exist.
    pub fn get_interaction_dimension(&self, kind: u64, id: u64) -> Dimension {
        self.interaction(kind, id)
            .map(|i| i.dimension())
            .unwrap_or_default()
    }

    pub fn does_interaction_exist(&self, kind: u64, id: u64) -> bool {
        self.store.exists(InteractionKey::new(kind, id))
    }

    pub fn remove_interaction(&self, kind: u64, id: u64) -> Result<()> {
        self.store.remove(InteractionKey::new(kind, id))?;
        Ok(())
    }

    /// Full copy of an interaction, if present.
    pub fn interaction(&self, kind: u64, id: u64) -> Option<Interaction> {
        self.store.get(InteractionKey::new(kind, id))
    }

    /// Interactions whose radius contains `position` in `dimension`, in
    /// ascending key order. This is the same query a dispatch runs.
    pub fn find_interactions(
        &self,
        position: Position,
        dimension: Dimension,
    ) -> Vec<InteractionSnapshot> {
        self.store.query(position, dimension)
    }

    pub fn store(&self) -> &InteractionStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register an event name for dispatch. Registering twice is a no-op.
    pub fn register_interaction_event(&self, name: &str) -> Result<()> {
        self.channels.register(name)?;
        Ok(())
    }

    /// Unregister an event name. Unregistering an unknown name is a no-op.
    ///
    /// Triggers arriving after this returns are dropped. Dispatches that
    /// resolved the channel earlier still complete.
    pub fn unregister_interaction_event(&self, name: &str) -> Result<()> {
        self.channels.unregister(name)?;
        self.event_bus.remove_if_idle(name);
        Ok(())
    }

    pub fn is_interaction_event_registered(&self, name: &str) -> bool {
        self.channels.is_registered(name)
    }

    /// Registered event names, sorted.
    pub fn registered_channels(&self) -> Vec<String> {
        self.channels.names()
    }

    /// Inbound actor request bound to `name`.
    ///
    /// Resolves the channel now and spawns the dispatch as an independent
    /// task. Returns `false` if the name is not registered or the runtime has
    /// shut down, in which case the trigger is dropped. Safe to call from any
    /// thread, inside a Tokio runtime or not.
    pub fn trigger(&self, name: &str, actor: ActorId, payload: serde_json::Value) -> bool {
        let Some(channel) = self.channels.resolve(name) else {
            debug!(target: "runtime::dispatch", channel = name, %actor, "trigger for unregistered channel dropped");
            return false;
        };

        self.dispatcher.spawn(channel, actor, payload)
    }

    /// Runs a dispatch inline and reports how it ended.
    ///
    /// Same semantics as [`trigger`](Self::trigger), but the caller awaits
    /// completion instead of spawning.
    pub async fn dispatch(
        &self,
        name: &str,
        actor: ActorId,
        payload: serde_json::Value,
    ) -> DispatchOutcome {
        let Some(channel) = self.channels.resolve(name) else {
            debug!(target: "runtime::dispatch", channel = name, %actor, "trigger for unregistered channel dropped");
            return DispatchOutcome::Dropped;
        };
        if self.dispatcher.is_closed() {
            return DispatchOutcome::Dropped;
        }

        self.dispatcher.dispatch(&channel, actor, payload).await
    }

    /// Number of spawned dispatches still running.
    pub fn in_flight_dispatches(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Subscribe to dispatch results for an event name.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut rx = service.subscribe("near");
    /// service.register_interaction_event("near")?;
    /// service.trigger("near", actor, serde_json::Value::Null);
    /// let event = rx.recv().await?;
    /// ```
    pub fn subscribe(&self, name: &str) -> broadcast::Receiver<InteractionEvent> {
        self.event_bus.subscribe(name)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
