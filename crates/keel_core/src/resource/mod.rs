//! Named, reference-counted resources over arena-carved storage.

mod cache;
mod error;
mod factory;
mod handle;

pub use cache::{CacheStats, ResourceCache, ResourceCacheConfig};
pub use error::ResourceError;
pub use factory::ResourceFactory;
pub use handle::{ResourceHandle, ResourceRef, ResourceSlot, INVALID_ID};
