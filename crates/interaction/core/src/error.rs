//! Errors raised by the interaction store.
//!
//! Missing keys are not errors: setters and removal are silent no-ops and
//! reads return `None`. Only conditions a caller can act on are surfaced.

use thiserror::Error;

use crate::types::InteractionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("interaction {key} already exists")]
    DuplicateKey { key: InteractionKey },

    #[error("interaction store lock was poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, InteractionError>;
