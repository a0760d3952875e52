//! Memory management
//!
//! Tagged allocation tracking, the systems arena, and the regions
//! subsystems carve out of it at startup.

mod error;
mod linear;
mod raw;
mod region;
mod report;
mod subsystem;
mod tag;
mod tracker;

pub use error::{ArenaError, MemoryError};
pub use linear::LinearAllocator;
pub use raw::{RawAllocator, SystemAllocator};
pub use region::{ArenaRegion, MemoryRequirement};
pub use report::{ByteSize, UsageReport};
pub use subsystem::Subsystem;
pub use tag::MemoryTag;
pub use tracker::{MemoryStats, MemoryTracker};
