//! Worker tasks that back the runtime orchestration.
//!
//! The dispatcher spawns one task per trigger and tracks them until shutdown.

mod dispatch;

pub use dispatch::DispatchOutcome;
pub(crate) use dispatch::Dispatcher;
