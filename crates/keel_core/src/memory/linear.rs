//! Linear (bump) allocator over a fixed buffer.
//!
//! Carve-outs are handed out front to back and never freed individually.
//! `free_all` takes `&mut self`, so the borrow checker guarantees no
//! carve-out outlives a reset.

use super::{
    ArenaError, ArenaRegion, MemoryRequirement, MemoryTag, MemoryTracker, RawAllocator, Subsystem,
};
use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use tracing::{debug, error, warn};

/// Bump allocator over `total_size` bytes, either owned or borrowed.
///
/// An owned buffer comes from the [`MemoryTracker`] under
/// [`MemoryTag::LinearAllocator`] and must be returned with
/// [`destroy`](Self::destroy). A borrowed buffer belongs to the caller.
///
/// Not thread-safe: the cursor is a plain `Cell`.
pub struct LinearAllocator<'buf> {
    memory: NonNull<u8>,
    total_size: usize,
    allocated: Cell<usize>,
    owns_memory: bool,
    _buffer: PhantomData<&'buf mut [u8]>,
}

impl LinearAllocator<'static> {
    /// Create an allocator that owns a fresh, tracked buffer of `total_size` bytes.
    pub fn create<A: RawAllocator>(
        tracker: &mut MemoryTracker<A>,
        total_size: usize,
    ) -> Result<Self, ArenaError> {
        if total_size == 0 {
            error!("linear allocator requires a non-zero size");
            return Err(ArenaError::ZeroSize);
        }
        let block = tracker.allocate(total_size, MemoryTag::LinearAllocator)?;
        let raw = Box::into_raw(block) as *mut u8;
        // SAFETY: `Box::into_raw` never returns null.
        let memory = unsafe { NonNull::new_unchecked(raw) };
        debug!(total_size, "linear allocator created (owned)");
        Ok(Self {
            memory,
            total_size,
            allocated: Cell::new(0),
            owns_memory: true,
            _buffer: PhantomData,
        })
    }
}

impl<'buf> LinearAllocator<'buf> {
    /// Create an allocator over caller-owned memory. Nothing is freed on destroy.
    pub fn with_buffer(buffer: &'buf mut [u8]) -> Result<Self, ArenaError> {
        if buffer.is_empty() {
            error!("linear allocator requires a non-zero size");
            return Err(ArenaError::ZeroSize);
        }
        let total_size = buffer.len();
        // SAFETY: slice pointers are never null.
        let memory = unsafe { NonNull::new_unchecked(buffer.as_mut_ptr()) };
        debug!(total_size, "linear allocator created (borrowed)");
        Ok(Self {
            memory,
            total_size,
            allocated: Cell::new(0),
            owns_memory: false,
            _buffer: PhantomData,
        })
    }

    #[inline]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    #[inline]
    pub fn allocated(&self) -> usize {
        self.allocated.get()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.total_size - self.allocated.get()
    }

    #[inline]
    pub fn owns_memory(&self) -> bool {
        self.owns_memory
    }

    /// Address of the first byte; the first carve-out after a reset starts here.
    #[inline]
    pub fn base_ptr(&self) -> *const u8 {
        self.memory.as_ptr()
    }

    /// Hand out the next `size` bytes. No alignment is applied.
    ///
    /// Fails without moving the cursor when fewer than `size` bytes remain.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, size: usize) -> Result<&mut [u8], ArenaError> {
        let allocated = self.allocated.get();
        let remaining = self.total_size - allocated;
        if size > remaining {
            error!(
                requested = size,
                remaining, "linear allocator out of budget"
            );
            return Err(ArenaError::OutOfBudget {
                requested: size,
                remaining,
            });
        }
        self.allocated.set(allocated + size);

        // SAFETY: `allocated + size <= total_size`, so the range is inside the
        // buffer. The cursor only moves forward between resets and `free_all`
        // needs `&mut self`, so no other live slice overlaps this one.
        Ok(unsafe { std::slice::from_raw_parts_mut(self.memory.as_ptr().add(allocated), size) })
    }

    /// Carve out a region sized for `requirement`, to be partitioned further.
    pub fn carve(&self, requirement: MemoryRequirement) -> Result<ArenaRegion<'_>, ArenaError> {
        self.allocate(requirement.size()).map(ArenaRegion::new)
    }

    /// Size, carve and initialize a subsystem in one step.
    pub fn initialize_subsystem<'a, S>(&'a self, config: S::Config) -> Result<S, S::Error>
    where
        S: Subsystem<'a>,
    {
        let requirement = S::memory_requirement(&config);
        debug!(
            subsystem = S::NAME,
            bytes = requirement.size(),
            "carving subsystem memory"
        );
        let region = self.carve(requirement)?;
        S::initialize(config, region)
    }

    /// Reset the cursor and zero the whole buffer.
    pub fn free_all(&mut self) {
        self.allocated.set(0);
        // SAFETY: `&mut self` proves every carve-out is dead; the buffer is
        // `total_size` bytes long.
        unsafe { ptr::write_bytes(self.memory.as_ptr(), 0, self.total_size) };
    }

    /// Release an owned buffer back to the tracker it came from.
    pub fn destroy<A: RawAllocator>(mut self, tracker: &mut MemoryTracker<A>) {
        if let Some(block) = self.take_owned() {
            tracker.free(block);
        }
        self.allocated.set(0);
        debug!("linear allocator destroyed");
    }

    fn take_owned(&mut self) -> Option<Box<[u8]>> {
        if !self.owns_memory {
            return None;
        }
        self.owns_memory = false;
        let raw = ptr::slice_from_raw_parts_mut(self.memory.as_ptr(), self.total_size);
        // SAFETY: `raw` is exactly the pointer produced by `Box::into_raw` in
        // `create`, and ownership is reclaimed only once.
        Some(unsafe { Box::from_raw(raw) })
    }
}

impl Drop for LinearAllocator<'_> {
    fn drop(&mut self) {
        if let Some(block) = self.take_owned() {
            warn!(
                total_size = self.total_size,
                "linear allocator dropped without destroy; tracker not updated"
            );
            drop(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_contiguous_and_increasing() {
        let mut tracker = MemoryTracker::new();
        let arena = LinearAllocator::create(&mut tracker, 256).unwrap();

        let a = arena.allocate(16).unwrap().as_ptr() as usize;
        let b = arena.allocate(32).unwrap().as_ptr() as usize;
        let c = arena.allocate(8).unwrap().as_ptr() as usize;

        assert_eq!(a, arena.base_ptr() as usize);
        assert_eq!(b, a + 16);
        assert_eq!(c, b + 32);
        assert_eq!(arena.allocated(), 56);
        arena.destroy(&mut tracker);
    }

    #[test]
    fn over_allocation_fails_without_moving_cursor() {
        let mut tracker = MemoryTracker::new();
        let arena = LinearAllocator::create(&mut tracker, 64).unwrap();
        arena.allocate(60).unwrap();

        let err = arena.allocate(5).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfBudget {
                requested: 5,
                remaining: 4
            }
        );
        assert_eq!(arena.allocated(), 60);
        assert!(arena.allocate(4).is_ok());
        arena.destroy(&mut tracker);
    }

    #[test]
    fn free_all_resets_and_zeroes() {
        let mut tracker = MemoryTracker::new();
        let mut arena = LinearAllocator::create(&mut tracker, 32).unwrap();
        arena.allocate(32).unwrap().fill(0xAB);

        arena.free_all();
        assert_eq!(arena.allocated(), 0);
        let again = arena.allocate(32).unwrap();
        assert_eq!(again.as_ptr(), arena.base_ptr());
        assert!(again.iter().all(|&b| b == 0));
        arena.destroy(&mut tracker);
    }

    #[test]
    fn owned_buffer_is_tracked_until_destroy() {
        let mut tracker = MemoryTracker::new();
        let arena = LinearAllocator::create(&mut tracker, 1024).unwrap();
        assert!(arena.owns_memory());
        assert_eq!(
            tracker.stats().unwrap().tagged(MemoryTag::LinearAllocator),
            1024
        );

        arena.destroy(&mut tracker);
        assert_eq!(
            tracker.stats().unwrap().tagged(MemoryTag::LinearAllocator),
            0
        );
    }

    #[test]
    fn borrowed_buffer_is_not_freed() {
        let mut tracker = MemoryTracker::new();
        let mut backing = vec![0u8; 128];
        let arena = LinearAllocator::with_buffer(&mut backing).unwrap();
        assert!(!arena.owns_memory());
        arena.allocate(8).unwrap().fill(7);
        arena.destroy(&mut tracker);

        assert_eq!(&backing[..8], &[7; 8]);
        assert_eq!(tracker.alloc_count(), 0);
    }

    #[test]
    fn zero_sized_arena_is_rejected() {
        let mut tracker = MemoryTracker::new();
        assert_eq!(
            LinearAllocator::create(&mut tracker, 0).err(),
            Some(ArenaError::ZeroSize)
        );
        let mut empty: [u8; 0] = [];
        assert_eq!(
            LinearAllocator::with_buffer(&mut empty).err(),
            Some(ArenaError::ZeroSize)
        );
    }

    #[test]
    fn zero_byte_allocation_succeeds_at_the_cursor() {
        let mut tracker = MemoryTracker::new();
        let arena = LinearAllocator::create(&mut tracker, 16).unwrap();
        arena.allocate(16).unwrap();
        assert!(arena.allocate(0).unwrap().is_empty());
        assert_eq!(arena.remaining(), 0);
        arena.destroy(&mut tracker);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cursor_only_moves_forward(
                sizes in proptest::collection::vec(0usize..96, 1..40),
            ) {
                let mut tracker = MemoryTracker::new();
                let arena = LinearAllocator::create(&mut tracker, 512).unwrap();
                let base = arena.base_ptr() as usize;

                for size in sizes {
                    let before = arena.allocated();
                    match arena.allocate(size) {
                        Ok(block) => {
                            prop_assert_eq!(block.as_ptr() as usize, base + before);
                            prop_assert_eq!(block.len(), size);
                            prop_assert_eq!(arena.allocated(), before + size);
                        }
                        Err(ArenaError::OutOfBudget { requested, remaining }) => {
                            prop_assert_eq!(requested, size);
                            prop_assert!(size > remaining);
                            prop_assert_eq!(arena.allocated(), before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                    prop_assert!(arena.allocated() <= arena.total_size());
                }
                arena.destroy(&mut tracker);
            }
        }
    }
}
