// hashtable.rs - Fixed-capacity, direct-mapped string-keyed table
//
// Each key maps to exactly one slot via `hash_name(key) % element_count`.
// There is no probing or chaining: two keys landing on the same slot share
// it, and the later write wins. Callers must use a small, curated key set.

use crate::memory::MemoryRequirement;
use bytemuck::Zeroable;
use std::mem;
use thiserror::Error;
use tracing::error;

/// Polynomial multiplier for [`hash_name`].
const HASH_MULTIPLIER: u64 = 97;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashTableError {
    #[error("element_count must be a positive non-zero value")]
    ZeroCapacity,

    #[error("element_size must be a positive non-zero value")]
    ZeroSizedElement,

    #[error("backing memory holds {provided} slots, {required} required")]
    InsufficientMemory { required: usize, provided: usize },
}

/// Slot index of `name` in a table of `element_count` slots.
///
/// Pure function of the key bytes and the capacity, so the same key always
/// lands on the same slot without storing the index.
///
/// # Panics
/// If `element_count` is zero.
pub fn hash_name(name: &str, element_count: usize) -> usize {
    assert!(element_count > 0, "hash_name requires a non-zero element count");
    let hash = name.bytes().fold(0u64, |hash, byte| {
        hash.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(u64::from(byte))
    });
    (hash % element_count as u64) as usize
}

pub(crate) fn check_capacity(
    element_count: usize,
    element_size: usize,
    provided: usize,
) -> Result<(), HashTableError> {
    if element_count == 0 {
        error!("hashtable element_count must be a positive non-zero value");
        return Err(HashTableError::ZeroCapacity);
    }
    if element_size == 0 {
        error!("hashtable element_size must be a positive non-zero value");
        return Err(HashTableError::ZeroSizedElement);
    }
    if provided < element_count {
        error!(
            required = element_count,
            provided, "hashtable backing memory is too small"
        );
        return Err(HashTableError::InsufficientMemory {
            required: element_count,
            provided,
        });
    }
    Ok(())
}

/// Table storing `T` by value in caller-provided memory.
///
/// The table never owns its memory; [`destroy`](Self::destroy) hands it back.
pub struct HashTable<'a, T> {
    slots: &'a mut [T],
}

impl<'a, T: Zeroable + Copy> HashTable<'a, T> {
    /// Arena space needed for a table of `element_count` slots.
    pub const fn memory_requirement(element_count: usize) -> MemoryRequirement {
        MemoryRequirement::new().array::<T>(element_count)
    }

    /// Build a table over the first `element_count` slots of `memory`, zeroing them.
    pub fn create(element_count: usize, memory: &'a mut [T]) -> Result<Self, HashTableError> {
        check_capacity(element_count, mem::size_of::<T>(), memory.len())?;
        let (slots, _) = memory.split_at_mut(element_count);
        slots.fill(T::zeroed());
        Ok(Self { slots })
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> usize {
        hash_name(name, self.slots.len())
    }

    /// Copy `value` into the slot for `name`, replacing whatever was there.
    pub fn set(&mut self, name: &str, value: T) {
        let index = self.index_of(name);
        self.slots[index] = value;
    }

    /// Copy out the slot for `name`.
    ///
    /// Always yields a value: a key that was never set reads as the fill
    /// value (zero after creation), or as whatever a colliding key stored.
    pub fn get(&self, name: &str) -> T {
        self.slots[self.index_of(name)]
    }

    /// Broadcast `value` into every slot.
    pub fn fill(&mut self, value: T) {
        self.slots.fill(value);
    }

    /// Tear down the table, returning the memory it was built over.
    pub fn destroy(self) -> &'a mut [T] {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
    struct Entry {
        a: u64,
        b: u32,
        c: u32,
    }

    fn colliding_keys(element_count: usize) -> (String, String) {
        let base = "key0".to_string();
        let slot = hash_name(&base, element_count);
        let other = (1..)
            .map(|i| format!("key{i}"))
            .find(|k| hash_name(k, element_count) == slot)
            .unwrap();
        (base, other)
    }

    #[test]
    fn hash_is_deterministic() {
        let a = hash_name("textures/wall.png", 1024);
        let b = hash_name("textures/wall.png", 1024);
        assert_eq!(a, b);
        assert!(a < 1024);
    }

    #[test]
    fn hash_matches_polynomial_reference() {
        // ((97 * 'a') + 'b') % 1000
        let expected = ((97 * 97 + 98) % 1000) as usize;
        assert_eq!(hash_name("ab", 1000), expected);
        assert_eq!(hash_name("", 7), 0);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut memory = vec![Entry::zeroed(); 16];
        let mut table = HashTable::create(16, &mut memory).unwrap();
        let value = Entry { a: 1, b: 2, c: 3 };

        table.set("alpha", value);
        assert_eq!(table.get("alpha"), value);
        assert_eq!(table.element_count(), 16);
        assert_eq!(table.element_size(), 16);
    }

    #[test]
    fn create_zeroes_backing_memory() {
        let mut memory = vec![7u64; 4];
        let table = HashTable::create(4, &mut memory).unwrap();
        assert_eq!(table.get("anything"), 0);
        let memory = table.destroy();
        assert!(memory.iter().all(|&v| v == 0));
    }

    #[test]
    fn fill_sets_every_slot() {
        let mut memory = vec![0u32; 8];
        let mut table = HashTable::create(8, &mut memory).unwrap();
        table.fill(u32::MAX);
        for key in ["a", "b", "long/key/name", ""] {
            assert_eq!(table.get(key), u32::MAX);
        }
        table.set("a", 5);
        assert_eq!(table.get("a"), 5);
    }

    #[test]
    fn colliding_keys_clobber_each_other() {
        let mut memory = vec![0u32; 8];
        let mut table = HashTable::create(8, &mut memory).unwrap();
        let (first, second) = colliding_keys(8);

        table.set(&first, 1);
        table.set(&second, 2);
        assert_eq!(table.get(&first), 2);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let mut memory = vec![0u32; 4];
        assert_eq!(
            HashTable::create(0, &mut memory).err(),
            Some(HashTableError::ZeroCapacity)
        );
        assert_eq!(
            HashTable::create(8, &mut memory).err(),
            Some(HashTableError::InsufficientMemory {
                required: 8,
                provided: 4
            })
        );
        let mut units = vec![(); 4];
        assert_eq!(
            HashTable::create(4, &mut units).err(),
            Some(HashTableError::ZeroSizedElement)
        );
    }

    #[test]
    fn requirement_covers_alignment() {
        let req = HashTable::<Entry>::memory_requirement(10);
        assert_eq!(req.size(), 10 * 16 + 7);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_then_get_returns_value(
                key in any::<String>(),
                value in any::<u64>(),
                element_count in 1usize..256,
            ) {
                let mut memory = vec![0u64; element_count];
                let mut table = HashTable::create(element_count, &mut memory).unwrap();
                prop_assert!(table.index_of(&key) < element_count);
                table.set(&key, value);
                prop_assert_eq!(table.get(&key), value);
            }

            #[test]
            fn keys_on_distinct_slots_are_independent(
                first in "[a-z/._]{0,24}",
                second in "[a-z/._]{0,24}",
                element_count in 1usize..64,
            ) {
                let mut memory = vec![0u32; element_count];
                let mut table = HashTable::create(element_count, &mut memory).unwrap();
                table.set(&first, 1);
                table.set(&second, 2);
                let expected = if hash_name(&first, element_count) == hash_name(&second, element_count) {
                    2
                } else {
                    1
                };
                prop_assert_eq!(table.get(&first), expected);
                prop_assert_eq!(table.get(&second), 2);
            }
        }
    }
}
