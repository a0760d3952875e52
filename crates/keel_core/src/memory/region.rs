//! Subsystem-private regions carved from a [`LinearAllocator`](super::LinearAllocator).

use super::ArenaError;
use bytemuck::Zeroable;
use std::mem;
use tracing::error;

/// Bytes a subsystem needs from the arena, padding for alignment included.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MemoryRequirement {
    size: usize,
}

impl MemoryRequirement {
    pub const fn new() -> Self {
        Self { size: 0 }
    }

    /// Add `bytes` of unaligned storage.
    pub const fn bytes(self, bytes: usize) -> Self {
        Self {
            size: self.size.saturating_add(bytes),
        }
    }

    /// Add room for `count` values of `T`, plus worst-case alignment padding.
    pub const fn array<T>(self, count: usize) -> Self {
        let payload = mem::size_of::<T>().saturating_mul(count);
        self.bytes(payload.saturating_add(mem::align_of::<T>() - 1))
    }

    pub const fn size(self) -> usize {
        self.size
    }
}

/// Exclusive view of a carved byte range that can be split into typed arrays.
///
/// Each `take_*` call moves the front of the region out, so the returned
/// slices live as long as the carve-out itself.
pub struct ArenaRegion<'a> {
    remaining: &'a mut [u8],
    size: usize,
}

impl<'a> ArenaRegion<'a> {
    pub fn new(memory: &'a mut [u8]) -> Self {
        let size = memory.len();
        Self {
            remaining: memory,
            size,
        }
    }

    /// Size of the region when it was carved.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Take `size` raw bytes off the front.
    pub fn take_bytes(&mut self, size: usize) -> Result<&'a mut [u8], ArenaError> {
        self.take_aligned(size, 1)
    }

    /// Take a zero-filled array of `count` values.
    pub fn take_zeroed<T: Zeroable>(&mut self, count: usize) -> Result<&'a mut [T], ArenaError> {
        let bytes = self.take_array_bytes::<T>(count)?;
        bytes.fill(0);
        // SAFETY: `bytes` is aligned for `T`, spans exactly `count` values and
        // is all zeroes, which `T: Zeroable` declares a valid value.
        Ok(unsafe { std::slice::from_raw_parts_mut(bytes.as_mut_ptr().cast::<T>(), count) })
    }

    /// Take an array of `count` values built by `init(index)`.
    ///
    /// Values are never dropped by the arena; owners that hold resources must
    /// drain them before the region is reset.
    pub fn take_with<T>(
        &mut self,
        count: usize,
        mut init: impl FnMut(usize) -> T,
    ) -> Result<&'a mut [T], ArenaError> {
        let bytes = self.take_array_bytes::<T>(count)?;
        let base = bytes.as_mut_ptr().cast::<T>();
        for index in 0..count {
            // SAFETY: `base` is aligned for `T` and `index < count` stays
            // inside the slice taken above.
            unsafe { base.add(index).write(init(index)) };
        }
        // SAFETY: all `count` values were initialized by the loop.
        Ok(unsafe { std::slice::from_raw_parts_mut(base, count) })
    }

    fn take_array_bytes<T>(&mut self, count: usize) -> Result<&'a mut [u8], ArenaError> {
        let size = match mem::size_of::<T>().checked_mul(count) {
            Some(size) => size,
            None => {
                return Err(ArenaError::OutOfBudget {
                    requested: usize::MAX,
                    remaining: self.remaining.len(),
                })
            }
        };
        self.take_aligned(size, mem::align_of::<T>())
    }

    fn take_aligned(&mut self, size: usize, align: usize) -> Result<&'a mut [u8], ArenaError> {
        debug_assert!(align.is_power_of_two());
        let address = self.remaining.as_ptr() as usize;
        let padding = address.wrapping_neg() & (align - 1);
        let available = self.remaining.len();

        let needed = match padding.checked_add(size) {
            Some(needed) if needed <= available => needed,
            _ => {
                error!(
                    requested = size,
                    padding,
                    remaining = available,
                    "arena region exhausted"
                );
                return Err(ArenaError::OutOfBudget {
                    requested: size.saturating_add(padding),
                    remaining: available,
                });
            }
        };

        let memory = mem::take(&mut self.remaining);
        let (head, tail) = memory.split_at_mut(needed);
        self.remaining = tail;
        Ok(&mut head[padding..])
    }
}
