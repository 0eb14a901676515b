//! Runtime orchestration for proximity-triggered interaction events.
//!
//! This crate wires the interaction store from `interaction-core` to a host
//! runtime: named event channels, per-trigger dispatch tasks, and broadcast
//! delivery. Consumers embed [`Runtime`] and talk to it through
//! [`InteractionService`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the service, the channel registry and the host seams
//! - [`events`] provides the channel-keyed event bus
//! - [`host`] ships an in-memory host for tests and local runs
//! - [`config`] loads runtime settings from the environment
//! - `workers` keeps dispatch tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod host;
pub mod runtime;

mod workers;

pub use api::{
    ActorHost, BroadcastError, Broadcaster, Channel, ChannelRegistry, HostError,
    InteractionService, Result, RuntimeError,
};
pub use config::{IndexConfig, RuntimeConfig};
pub use events::{EventBus, InteractionEvent};
pub use host::InMemoryActorHost;
pub use runtime::{Runtime, RuntimeBuilder};
pub use workers::DispatchOutcome;

pub use interaction_core::{
    ActorId, ActorLocation, Dimension, Interaction, InteractionError, InteractionKey,
    InteractionSnapshot, InteractionStore, Position,
};
