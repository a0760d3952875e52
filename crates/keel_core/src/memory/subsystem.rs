use super::{ArenaError, ArenaRegion, MemoryRequirement};

/// A subsystem whose private state lives in a region of the systems arena.
///
/// The composition root asks for [`memory_requirement`](Self::memory_requirement),
/// carves exactly that much and passes it to [`initialize`](Self::initialize).
/// [`LinearAllocator::initialize_subsystem`](super::LinearAllocator::initialize_subsystem)
/// does both steps.
pub trait Subsystem<'a>: Sized {
    type Config;
    type Error: From<ArenaError>;

    /// Name used in logs.
    const NAME: &'static str;

    fn memory_requirement(config: &Self::Config) -> MemoryRequirement;

    fn initialize(config: Self::Config, region: ArenaRegion<'a>) -> Result<Self, Self::Error>;
}
