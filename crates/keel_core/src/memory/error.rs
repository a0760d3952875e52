use thiserror::Error;

/// Failures of the tracked raw allocation path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("platform allocator could not provide {size} bytes")]
    OutOfMemory { size: usize },
}

/// Failures of the linear allocator and the regions carved from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("linear allocator requires a non-zero size")]
    ZeroSize,

    #[error("tried to allocate {requested}B, only {remaining}B remaining")]
    OutOfBudget { requested: usize, remaining: usize },

    #[error("backing memory for the linear allocator is unavailable")]
    Backing(#[from] MemoryError),
}
