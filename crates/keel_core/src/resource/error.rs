use crate::containers::HashTableError;
use crate::memory::ArenaError;
use std::error::Error as StdError;
use thiserror::Error;

type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors surfaced by a [`ResourceCache`](super::ResourceCache).
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind} cache cannot hold any more resources (capacity {capacity}); adjust configuration to allow more")]
    CapacityExhausted { kind: &'static str, capacity: usize },

    #[error("failed to load {kind} '{name}'")]
    LoadFailed {
        kind: &'static str,
        name: String,
        #[source]
        source: BoxedError,
    },

    #[error("failed to create the default {kind}")]
    DefaultFailed {
        kind: &'static str,
        #[source]
        source: BoxedError,
    },

    #[error("{kind} '{name}' is not resident")]
    NotResident { kind: &'static str, name: String },

    #[error("{kind} cache requires max_count > 0")]
    ZeroCapacity { kind: &'static str },

    #[error(transparent)]
    Arena(#[from] ArenaError),

    #[error(transparent)]
    Table(#[from] HashTableError),
}

impl ResourceError {
    /// Whether the error reflects a static sizing or setup defect the
    /// application cannot continue past.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResourceError::CapacityExhausted { .. }
                | ResourceError::DefaultFailed { .. }
                | ResourceError::ZeroCapacity { .. }
                | ResourceError::Arena(_)
                | ResourceError::Table(_)
        )
    }
}
