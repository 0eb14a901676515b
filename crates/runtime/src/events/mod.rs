//! Channel-keyed event delivery.
//!
//! Dispatch results are published per event name, and in-process consumers
//! subscribe only to the names they need.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::InteractionEvent;
