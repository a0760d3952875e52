//! Keel Core
//!
//! The memory and resource layer every other system builds on:
//! - Tagged memory tracking
//! - The systems arena and subsystem composition
//! - Fixed-capacity hashtables
//! - Reference-counted resource caches

pub mod containers;
pub mod memory;
pub mod resource;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
