//! Channel registry for named interaction events.
//!
//! The [`ChannelRegistry`] maps event names to their dispatch subscription.
//! Each name is either unregistered or bound to exactly one [`Channel`].
//!
//! # Design
//!
//! - **Idempotent lifecycle**: registering a bound name or unregistering an
//!   unbound one changes nothing
//! - **Capture on resolve**: [`ChannelRegistry::resolve`] hands out an
//!   `Arc<Channel>`; a dispatch keeps that handle for its whole lifetime, so
//!   unregistering only affects triggers resolved afterwards
//! - **Generations**: every registration gets a fresh generation, so a
//!   re-registered name is distinguishable from its predecessor in logs

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::info;

use super::{Result, RuntimeError};

/// A registered event subscription.
#[derive(Debug)]
pub struct Channel {
    name: Arc<str>,
    generation: u64,
}

impl Channel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Registry of named channels.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<Arc<str>, Arc<Channel>>>,
    next_generation: AtomicU64,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Binds `name` to a new channel.
    ///
    /// Returns `true` if the name was newly registered, `false` if it was
    /// already bound (the existing binding is kept).
    pub fn register(&self, name: &str) -> Result<bool> {
        let mut channels = self
            .channels
            .write()
            .map_err(|_| RuntimeError::RegistryPoisoned)?;

        if channels.contains_key(name) {
            return Ok(false);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let name: Arc<str> = Arc::from(name);
        channels.insert(
            Arc::clone(&name),
            Arc::new(Channel {
                name: Arc::clone(&name),
                generation,
            }),
        );

        info!(target: "runtime::channels", channel = %name, generation, "channel registered");
        Ok(true)
    }

    /// Detaches `name`.
    ///
    /// Returns `true` if a binding was removed. Once this returns, no new
    /// trigger can resolve the name.
    pub fn unregister(&self, name: &str) -> Result<bool> {
        let mut channels = self
            .channels
            .write()
            .map_err(|_| RuntimeError::RegistryPoisoned)?;

        match channels.remove(name) {
            Some(channel) => {
                info!(
                    target: "runtime::channels",
                    channel = %channel.name,
                    generation = channel.generation,
                    "channel unregistered"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Looks up the live binding for `name`.
    pub fn resolve(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels
            .read()
            .ok()
            .and_then(|channels| channels.get(name).cloned())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered channel names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .read()
            .map(|channels| channels.keys().map(|name| name.to_string()).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Unregisters every channel, returning how many were bound.
    pub fn clear(&self) -> Result<usize> {
        let mut channels = self
            .channels
            .write()
            .map_err(|_| RuntimeError::RegistryPoisoned)?;
        let count = channels.len();
        channels.clear();
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.channels.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let registry = ChannelRegistry::new();
        assert!(registry.register("near").unwrap());
        let first = registry.resolve("near").unwrap();

        assert!(!registry.register("near").unwrap());
        let second = registry.resolve("near").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = ChannelRegistry::new();
        assert!(!registry.unregister("near").unwrap());

        registry.register("near").unwrap();
        assert!(registry.unregister("near").unwrap());
        assert!(!registry.unregister("near").unwrap());
        assert!(registry.resolve("near").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn resolved_handle_survives_unregister() {
        let registry = ChannelRegistry::new();
        registry.register("near").unwrap();
        let captured = registry.resolve("near").unwrap();

        registry.unregister("near").unwrap();
        assert_eq!(captured.name(), "near");
        assert!(!registry.is_registered("near"));
    }

    #[test]
    fn reregistration_gets_new_generation() {
        let registry = ChannelRegistry::new();
        registry.register("near").unwrap();
        let old = registry.resolve("near").unwrap().generation();

        registry.unregister("near").unwrap();
        registry.register("near").unwrap();
        let new = registry.resolve("near").unwrap().generation();

        assert!(new > old);
    }

    #[test]
    fn names_are_sorted_and_clear_empties() {
        let registry = ChannelRegistry::new();
        registry.register("b").unwrap();
        registry.register("a").unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);

        assert_eq!(registry.clear().unwrap(), 2);
        assert!(registry.is_empty());
    }
}
