//! Host adapters for tests and local runs.

mod memory;

pub use memory::InMemoryActorHost;
