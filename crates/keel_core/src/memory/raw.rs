//! Platform-level memory primitives the tracker sits on top of.

/// Source of raw, zero-filled memory blocks.
///
/// Implementations report exhaustion by returning `None`; they never log or
/// keep statistics, that is the tracker's job.
pub trait RawAllocator {
    /// Allocate `size` bytes, all set to zero.
    fn allocate_zeroed(&mut self, size: usize) -> Option<Box<[u8]>>;

    /// Return a block previously produced by [`allocate_zeroed`](Self::allocate_zeroed).
    fn free(&mut self, block: Box<[u8]>) {
        drop(block);
    }
}

/// Raw allocator backed by the global Rust allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
    fn allocate_zeroed(&mut self, size: usize) -> Option<Box<[u8]>> {
        let mut bytes: Vec<u8> = Vec::new();
        bytes.try_reserve_exact(size).ok()?;
        bytes.resize(size, 0);
        Some(bytes.into_boxed_slice())
    }
}
