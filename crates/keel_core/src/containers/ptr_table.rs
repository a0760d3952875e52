// ptr_table.rs - Direct-mapped table of optional references
//
// Same slot mapping and collision behaviour as `HashTable`, but each slot
// holds a borrowed pointer to data owned elsewhere. An empty slot is `None`,
// which separates "absent" from "present" on lookup.

use super::hashtable::{check_capacity, hash_name, HashTableError};
use crate::memory::MemoryRequirement;
use std::mem;

pub struct PtrHashTable<'a, 'v, T> {
    slots: &'a mut [Option<&'v T>],
}

impl<'a, 'v, T> PtrHashTable<'a, 'v, T> {
    pub const fn memory_requirement(element_count: usize) -> MemoryRequirement {
        MemoryRequirement::new().array::<Option<&'v T>>(element_count)
    }

    /// Build a table over the first `element_count` slots of `memory`, clearing them.
    pub fn create(
        element_count: usize,
        memory: &'a mut [Option<&'v T>],
    ) -> Result<Self, HashTableError> {
        check_capacity(
            element_count,
            mem::size_of::<Option<&'v T>>(),
            memory.len(),
        )?;
        let (slots, _) = memory.split_at_mut(element_count);
        slots.fill(None);
        Ok(Self { slots })
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.slots.len()
    }

    /// Store `value` (or clear the slot with `None`) under `name`.
    pub fn set_ptr(&mut self, name: &str, value: Option<&'v T>) {
        let index = hash_name(name, self.slots.len());
        self.slots[index] = value;
    }

    /// The reference stored under `name`, or `None` when the slot is empty.
    pub fn get_ptr(&self, name: &str) -> Option<&'v T> {
        self.slots[hash_name(name, self.slots.len())]
    }

    pub fn destroy(self) -> &'a mut [Option<&'v T>] {
        self.slots
    }
}
