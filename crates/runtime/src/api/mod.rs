//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on dispatch workers or host adapters.

pub mod errors;
pub mod handle;
pub mod providers;
pub mod registry;

pub use errors::{BroadcastError, HostError, Result, RuntimeError};
pub use handle::InteractionService;
pub use providers::{ActorHost, Broadcaster};
pub use registry::{Channel, ChannelRegistry};
