//! Handles, slots and reference records for the resource cache.

use bytemuck::{Pod, Zeroable};

/// Sentinel for "no id / no handle / no generation".
pub const INVALID_ID: u32 = u32::MAX;

/// Handle to a resource slot.
///
/// The index doubles as the resident object's id. Handles stay meaningful
/// while the holder keeps a reference count on the resource; once the count
/// drops to zero an auto-release resource may be destroyed and its slot reused.
///
/// The reserved default resource has its own handle, [`ResourceHandle::DEFAULT`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    index: u32,
}

impl ResourceHandle {
    pub const DEFAULT: Self = Self { index: INVALID_ID };

    pub(crate) const fn new(index: u32) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_default(&self) -> bool {
        self.index == INVALID_ID
    }
}

/// Per-name bookkeeping stored in the cache's lookup table.
///
/// Plain-old-data so it can live in arena memory: `auto_release` is kept as
/// a `u32` flag to avoid padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ResourceRef {
    reference_count: u64,
    handle: u32,
    auto_release: u32,
}

impl ResourceRef {
    /// Entry for a name with no references and no resident object.
    pub const INVALID: Self = Self {
        reference_count: 0,
        handle: INVALID_ID,
        auto_release: 0,
    };

    pub fn reference_count(&self) -> u64 {
        self.reference_count
    }

    /// Slot index of the resident object, if any.
    pub fn handle(&self) -> Option<u32> {
        (self.handle != INVALID_ID).then_some(self.handle)
    }

    pub fn auto_release(&self) -> bool {
        self.auto_release != 0
    }

    pub(crate) fn set_auto_release(&mut self, auto_release: bool) {
        self.auto_release = u32::from(auto_release);
    }

    pub(crate) fn increment(&mut self) {
        self.reference_count += 1;
    }

    pub(crate) fn decrement(&mut self) {
        self.reference_count = self.reference_count.saturating_sub(1);
    }

    pub(crate) fn set_handle(&mut self, index: u32) {
        self.handle = index;
    }
}

/// One entry of the cache's object array.
///
/// A slot is free while its id is [`INVALID_ID`]. The generation starts at
/// 0 when an object is first loaded and increases on every in-place reload.
#[derive(Debug)]
pub struct ResourceSlot<R> {
    id: u32,
    generation: u32,
    resource: Option<R>,
}

impl<R> ResourceSlot<R> {
    pub(crate) fn vacant() -> Self {
        Self {
            id: INVALID_ID,
            generation: INVALID_ID,
            resource: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_free(&self) -> bool {
        self.id == INVALID_ID
    }

    pub fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    pub(crate) fn occupy(&mut self, id: u32, resource: R) {
        self.id = id;
        self.generation = 0;
        self.resource = Some(resource);
    }

    /// Swap in a freshly loaded object, returning the previous one.
    pub(crate) fn replace(&mut self, resource: R) -> Option<R> {
        self.generation = match self.generation {
            INVALID_ID => 0,
            generation => generation.wrapping_add(1) % INVALID_ID,
        };
        self.resource.replace(resource)
    }

    /// Empty the slot so free-slot scans find it again.
    pub(crate) fn vacate(&mut self) -> Option<R> {
        self.id = INVALID_ID;
        self.generation = INVALID_ID;
        self.resource.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ref_has_no_handle() {
        let reference = ResourceRef::INVALID;
        assert_eq!(reference.handle(), None);
        assert_eq!(reference.reference_count(), 0);
        assert!(!reference.auto_release());
    }

    #[test]
    fn resource_ref_is_padding_free() {
        assert_eq!(std::mem::size_of::<ResourceRef>(), 16);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let mut reference = ResourceRef::INVALID;
        reference.decrement();
        assert_eq!(reference.reference_count(), 0);
    }

    #[test]
    fn slot_lifecycle() {
        let mut slot = ResourceSlot::vacant();
        assert!(slot.is_free());

        slot.occupy(3, "v0");
        assert_eq!(slot.id(), 3);
        assert_eq!(slot.generation(), 0);

        assert_eq!(slot.replace("v1"), Some("v0"));
        assert_eq!(slot.generation(), 1);
        assert_eq!(slot.resource(), Some(&"v1"));

        assert_eq!(slot.vacate(), Some("v1"));
        assert!(slot.is_free());
        assert_eq!(slot.generation(), INVALID_ID);
    }

    #[test]
    fn default_handle_is_sentinel() {
        assert!(ResourceHandle::DEFAULT.is_default());
        assert!(!ResourceHandle::new(0).is_default());
    }
}
