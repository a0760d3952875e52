//! Fixed-capacity containers built over preallocated memory.

mod hashtable;
mod ptr_table;

pub use hashtable::{hash_name, HashTable, HashTableError};
pub use ptr_table::PtrHashTable;
