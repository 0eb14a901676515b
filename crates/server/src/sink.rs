//! Broadcast sink that stands in for the network transport.

use async_trait::async_trait;
use interaction_runtime::{BroadcastError, Broadcaster, InteractionEvent};
use tracing::info;

/// Serializes each event to the JSON shape remote clients receive and logs it.
pub struct JsonLogSink;

#[async_trait]
impl Broadcaster for JsonLogSink {
    fn name(&self) -> &'static str {
        "json_log"
    }

    async fn broadcast(&self, event: &InteractionEvent) -> Result<(), BroadcastError> {
        let interactions =
            serde_json::to_string(&event.interactions).map_err(|e| BroadcastError::Rejected {
                sink: self.name(),
                channel: event.channel.clone(),
                reason: e.to_string(),
            })?;

        info!(
            target: "server::emit",
            channel = %event.channel,
            actor = %event.actor,
            payload = %event.payload,
            %interactions,
            "emit"
        );
        Ok(())
    }
}
