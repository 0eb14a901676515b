//! Unified error types surfaced by the runtime API.
//!
//! Wraps store failures, host lookups, and worker coordination so callers can
//! bubble them up with consistent context. Missing interaction keys are not
//! errors anywhere in this crate.
use thiserror::Error;

use interaction_core::{ActorId, InteractionError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error("runtime requires an actor host to be configured before building")]
    MissingHost,

    #[error("channel registry lock was poisoned")]
    RegistryPoisoned,

    #[error("dispatch task join failed")]
    DispatchJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Returns true if this is a duplicate-key rejection from `create`.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            RuntimeError::Interaction(InteractionError::DuplicateKey { .. })
        )
    }
}

/// Failure reported by the host while resolving an actor.
///
/// Aborts the affected dispatch only; it is never returned to the trigger's
/// caller.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("{0} is not connected")]
    ActorNotFound(ActorId),

    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by one broadcast sink.
#[derive(Debug, Clone, Error)]
pub enum BroadcastError {
    #[error("sink {sink} rejected event for channel {channel}: {reason}")]
    Rejected {
        sink: &'static str,
        channel: String,
        reason: String,
    },

    #[error("event bus lock was poisoned")]
    BusPoisoned,
}
