//! Channel-keyed in-process event bus.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::types::InteractionEvent;
use crate::api::{BroadcastError, Broadcaster};

/// In-process listeners, one broadcast channel per event name.
///
/// Each subscriber owns its own receiver, so a slow or dropped listener never
/// blocks delivery to the others; a lagging receiver simply skips events.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Arc<str>, broadcast::Sender<InteractionEvent>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new event bus with default capacity per channel
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per channel
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Publish an event to the listeners of its channel.
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, event: InteractionEvent) -> Result<usize, BroadcastError> {
        let channels = self
            .channels
            .read()
            .map_err(|_| BroadcastError::BusPoisoned)?;

        let Some(tx) = channels.get(event.channel.as_str()) else {
            tracing::trace!(target: "runtime::events", channel = %event.channel, "no listeners");
            return Ok(0);
        };

        match tx.send(event) {
            Ok(count) => Ok(count),
            Err(broadcast::error::SendError(event)) => {
                // Every receiver was dropped - this is normal, not an error
                tracing::trace!(target: "runtime::events", channel = %event.channel, "no listeners");
                drop(channels);
                self.remove_if_idle(&event.channel);
                Ok(0)
            }
        }
    }

    /// Drops the sender for `channel` if nobody is listening on it.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_if_idle(&self, channel: &str) -> bool {
        let Ok(mut channels) = self.channels.write() else {
            return false;
        };
        let idle = channels
            .get(channel)
            .is_some_and(|tx| tx.receiver_count() == 0);
        if idle {
            channels.remove(channel);
        }
        idle
    }

    /// Number of channel names with a live sender.
    pub fn channel_count(&self) -> usize {
        self.channels.read().map(|channels| channels.len()).unwrap_or(0)
    }

    /// Subscribe to a channel by name.
    ///
    /// Subscribing does not register the channel for dispatch; it only
    /// listens. Events arrive once the name is registered and triggered.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<InteractionEvent> {
        if let Ok(channels) = self.channels.read()
            && let Some(tx) = channels.get(channel)
        {
            return tx.subscribe();
        }

        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        channels
            .entry(Arc::from(channel))
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live listeners on a channel.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .ok()
            .and_then(|channels| channels.get(channel).map(broadcast::Sender::receiver_count))
            .unwrap_or(0)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            capacity: self.capacity,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for EventBus {
    fn name(&self) -> &'static str {
        "event_bus"
    }

    async fn broadcast(&self, event: &InteractionEvent) -> Result<(), BroadcastError> {
        self.publish(event.clone()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interaction_core::ActorId;

    fn event(channel: &str) -> InteractionEvent {
        InteractionEvent {
            channel: channel.to_string(),
            actor: ActorId(7),
            interactions: Vec::new(),
            payload: serde_json::json!({ "key": "E" }),
        }
    }

    #[test]
    fn publish_without_listeners_is_not_an_error() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(event("near")).unwrap(), 0);
    }

    #[test]
    fn listeners_only_see_their_channel() {
        let bus = EventBus::new();
        let mut near = bus.subscribe("near");
        let mut far = bus.subscribe("far");

        assert_eq!(bus.publish(event("near")).unwrap(), 1);

        let received = near.try_recv().unwrap();
        assert_eq!(received.channel, "near");
        assert_eq!(received.payload["key"], "E");
        assert!(far.try_recv().is_err());
    }

    #[test]
    fn every_listener_receives_a_copy() {
        let bus = EventBus::new();
        let mut a = bus.subscribe("near");
        let mut b = bus.clone().subscribe("near");
        assert_eq!(bus.listener_count("near"), 2);

        assert_eq!(bus.publish(event("near")).unwrap(), 2);
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn dropped_listener_does_not_affect_others() {
        let bus = EventBus::new();
        let dropped = bus.subscribe("near");
        let mut kept = bus.subscribe("near");
        drop(dropped);

        assert_eq!(bus.publish(event("near")).unwrap(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn idle_channels_are_pruned() {
        let bus = EventBus::new();
        let listener = bus.subscribe("near");
        let _kept = bus.subscribe("far");
        assert_eq!(bus.channel_count(), 2);

        assert!(!bus.remove_if_idle("near"));
        drop(listener);
        assert_eq!(bus.publish(event("near")).unwrap(), 0);

        assert_eq!(bus.channel_count(), 1);
        assert_eq!(bus.listener_count("far"), 1);
        assert!(!bus.remove_if_idle("far"));
    }
}
