//! High-level runtime orchestrator.
//!
//! The runtime owns the interaction store, channel registry and dispatcher,
//! wires them to the host, and exposes a builder-based API for start-up and
//! an explicit shutdown.

use std::sync::Arc;

use interaction_core::InteractionStore;
use tokio::runtime::Handle;
use tracing::info;

use crate::api::{ActorHost, Broadcaster, ChannelRegistry, InteractionService, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::workers::Dispatcher;

/// Main runtime that owns the interaction subsystem.
///
/// Design: Runtime owns the components and coordinates teardown.
/// [`InteractionService`] provides a cloneable façade for callers.
pub struct Runtime {
    service: InteractionService,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across binding layers and async tasks.
    pub fn service(&self) -> InteractionService {
        self.service.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Unregisters every channel and closes the dispatcher so no new dispatch
    /// can start, then waits for dispatches already in flight. Service clones
    /// drop every trigger afterwards.
    pub async fn shutdown(self) -> Result<()> {
        let channels = self.service.channels().clear()?;
        let in_flight = self.service.in_flight_dispatches();
        info!(target: "runtime", channels, in_flight, "shutting down interaction runtime");

        self.service.dispatcher().drain().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    host: Option<Arc<dyn ActorHost>>,
    broadcasters: Vec<Arc<dyn Broadcaster>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            host: None,
            broadcasters: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required actor host
    pub fn host(mut self, host: impl ActorHost + 'static) -> Self {
        self.host = Some(Arc::new(host));
        self
    }

    /// Set the required actor host from a shared handle
    ///
    /// Useful when the caller keeps driving the host (e.g. moving actors in
    /// tests).
    pub fn shared_host(mut self, host: Arc<dyn ActorHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Add an outbound sink, delivered after the in-process event bus
    ///
    /// Sinks run in registration order. A failing sink is logged and skipped.
    pub fn broadcaster(mut self, broadcaster: impl Broadcaster + 'static) -> Self {
        self.broadcasters.push(Arc::new(broadcaster));
        self
    }

    /// Build the runtime
    ///
    /// Dispatch tasks are spawned on the Tokio runtime this is awaited on,
    /// which lets non-runtime threads trigger events afterwards.
    pub async fn build(self) -> Result<Runtime> {
        let host = self.host.ok_or(RuntimeError::MissingHost)?;

        let store = Arc::new(InteractionStore::new(self.config.index.build()));
        let channels = Arc::new(ChannelRegistry::new());
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let mut sinks: Vec<Arc<dyn Broadcaster>> = vec![Arc::new(event_bus.clone())];
        sinks.extend(self.broadcasters);

        info!(
            target: "runtime",
            index = store.index_name(),
            sinks = sinks.len(),
            "interaction runtime started"
        );

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&store),
            host,
            sinks,
            Handle::current(),
        ));
        let service = InteractionService::new(store, channels, dispatcher, event_bus);

        Ok(Runtime { service })
    }
}
