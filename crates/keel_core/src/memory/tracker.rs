//! Tagged allocation tracking.
//!
//! The tracker wraps a [`RawAllocator`] and attributes every block to a
//! [`MemoryTag`]. Size and tag are remembered per live block, so `free` only
//! needs the block itself.
//!
//! A tracker that has not been initialized (or has been shut down) still
//! hands out and frees memory, it just keeps no statistics.

use super::{MemoryError, MemoryTag, RawAllocator, SystemAllocator, UsageReport};
use std::collections::HashMap;
use tracing::{error, info, trace, warn};

/// Cumulative byte counts, overall and per tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    total_allocated: u64,
    tagged_allocations: [u64; MemoryTag::COUNT],
}

impl MemoryStats {
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated
    }

    pub fn tagged(&self, tag: MemoryTag) -> u64 {
        self.tagged_allocations[tag.index()]
    }

    pub(crate) fn add(&mut self, size: u64, tag: MemoryTag) {
        self.total_allocated += size;
        self.tagged_allocations[tag.index()] += size;
    }

    pub(crate) fn sub(&mut self, size: u64, tag: MemoryTag) {
        let slot = &mut self.tagged_allocations[tag.index()];
        if *slot < size || self.total_allocated < size {
            warn!(size, %tag, "tagged free exceeds recorded usage; clamping at zero");
        }
        *slot = slot.saturating_sub(size);
        self.total_allocated = self.total_allocated.saturating_sub(size);
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveAllocation {
    size: usize,
    tag: MemoryTag,
}

#[derive(Debug, Default)]
struct TrackerState {
    stats: MemoryStats,
    alloc_count: u64,
    // keyed by block address
    live: HashMap<usize, LiveAllocation>,
}

/// Process-wide memory accounting, owned explicitly by the application.
pub struct MemoryTracker<A: RawAllocator = SystemAllocator> {
    raw: A,
    state: Option<TrackerState>,
}

impl MemoryTracker<SystemAllocator> {
    /// An initialized tracker over the system allocator.
    pub fn new() -> Self {
        Self::with_allocator(SystemAllocator)
    }

    /// A tracker that allocates but records nothing until [`initialize`](Self::initialize).
    pub fn untracked() -> Self {
        Self::untracked_with(SystemAllocator)
    }
}

impl Default for MemoryTracker<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RawAllocator> MemoryTracker<A> {
    pub fn with_allocator(raw: A) -> Self {
        let mut tracker = Self::untracked_with(raw);
        tracker.initialize();
        tracker
    }

    pub fn untracked_with(raw: A) -> Self {
        Self { raw, state: None }
    }

    /// Start recording statistics. Blocks allocated before this call are
    /// unknown to the tracker and are freed untracked.
    pub fn initialize(&mut self) {
        if self.state.is_some() {
            warn!("Memory system already initialized.");
            return;
        }
        self.state = Some(TrackerState::default());
        info!("Memory system initialized.");
    }

    /// Stop recording and hand back the final statistics.
    pub fn shutdown(&mut self) -> Option<MemoryStats> {
        let state = self.state.take()?;
        if !state.live.is_empty() {
            warn!(
                live = state.live.len(),
                bytes = state.stats.total_allocated(),
                "Memory system shut down with live allocations."
            );
        }
        info!("Memory system shut down.");
        Some(state.stats)
    }

    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }

    /// Allocate a zero-filled block attributed to `tag`.
    pub fn allocate(&mut self, size: usize, tag: MemoryTag) -> Result<Box<[u8]>, MemoryError> {
        if tag == MemoryTag::Unknown {
            warn!("allocate called using MemoryTag::Unknown. Re-class this allocation.");
        }

        let block = match self.raw.allocate_zeroed(size) {
            Some(block) => block,
            None => {
                error!(size, %tag, "platform allocation failed");
                return Err(MemoryError::OutOfMemory { size });
            }
        };

        if let Some(state) = self.state.as_mut() {
            state.stats.add(size as u64, tag);
            state.alloc_count += 1;
            if size > 0 {
                state
                    .live
                    .insert(block.as_ptr() as usize, LiveAllocation { size, tag });
            }
        }
        trace!(size, %tag, "allocated block");
        Ok(block)
    }

    /// Free a block obtained from [`allocate`](Self::allocate).
    ///
    /// The recorded size and tag are used for bookkeeping. Blocks the tracker
    /// does not know are still freed, with a warning.
    pub fn free(&mut self, block: Box<[u8]>) {
        if let Some(state) = self.state.as_mut() {
            if !block.is_empty() {
                match state.live.remove(&(block.as_ptr() as usize)) {
                    Some(live) => {
                        state.stats.sub(live.size as u64, live.tag);
                        trace!(size = live.size, tag = %live.tag, "freed block");
                    }
                    None => warn!(
                        size = block.len(),
                        "freeing a block the tracker never recorded; bookkeeping skipped"
                    ),
                }
            }
        }
        self.raw.free(block);
    }

    /// Account for memory obtained outside the tracker.
    pub fn record(&mut self, size: usize, tag: MemoryTag) {
        if let Some(state) = self.state.as_mut() {
            state.stats.add(size as u64, tag);
            state.alloc_count += 1;
        }
    }

    pub fn stats(&self) -> Option<&MemoryStats> {
        self.state.as_ref().map(|state| &state.stats)
    }

    /// Number of allocations made while tracking, 0 when untracked.
    pub fn alloc_count(&self) -> u64 {
        self.state.as_ref().map_or(0, |state| state.alloc_count)
    }

    pub fn live_allocations(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.live.len())
    }

    pub fn usage_report(&self) -> UsageReport {
        UsageReport::new(self.stats().cloned().unwrap_or_default())
    }
}
