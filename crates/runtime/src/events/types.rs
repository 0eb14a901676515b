//! Event payloads delivered to channel listeners.

use interaction_core::{ActorId, InteractionKey, InteractionSnapshot};
use serde::{Deserialize, Serialize};

/// Result of one dispatch: who triggered it, what was in range, and the
/// caller's opaque payload.
///
/// `interactions` holds value copies taken under the store's read lock, so
/// later mutations never show through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub channel: String,
    pub actor: ActorId,
    pub interactions: Vec<InteractionSnapshot>,
    pub payload: serde_json::Value,
}

impl InteractionEvent {
    /// Keys of the matched interactions, in delivery order.
    pub fn keys(&self) -> Vec<InteractionKey> {
        self.interactions
            .iter()
            .map(InteractionSnapshot::key)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }
}
