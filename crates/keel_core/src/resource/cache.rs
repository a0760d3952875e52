//! Reference-counted, fixed-capacity cache of named resources.
//!
//! Names map to a [`ResourceRef`] through a direct-mapped [`HashTable`];
//! the ref points into a preallocated slot array. Both live in arena memory
//! carved for the cache at initialization.

use super::factory::ResourceFactory;
use super::handle::{ResourceHandle, ResourceRef, ResourceSlot};
use super::ResourceError;
use crate::containers::HashTable;
use crate::memory::{ArenaRegion, MemoryRequirement, Subsystem};
use std::mem::ManuallyDrop;
use tracing::{debug, error, trace, warn};

/// Initialization parameters for a [`ResourceCache`].
#[derive(Debug, Clone)]
pub struct ResourceCacheConfig<F> {
    /// Number of object slots.
    pub max_count: u32,
    /// Number of name-table entries. More entries than slots means fewer
    /// colliding names.
    pub table_count: u32,
    pub factory: F,
}

impl<F> ResourceCacheConfig<F> {
    /// One table entry per slot.
    ///
    /// At equal sizes every occupied slot is owned by a distinct table entry,
    /// so a free slot always exists and capacity exhaustion cannot happen; a
    /// new name that collides with a resident one is served that object
    /// instead. Use [`with_table_count`](Self::with_table_count) to size the
    /// table larger.
    pub fn new(max_count: u32, factory: F) -> Self {
        Self {
            max_count,
            table_count: max_count,
            factory,
        }
    }

    pub fn with_table_count(mut self, table_count: u32) -> Self {
        self.table_count = table_count;
        self
    }
}

/// Diagnostic counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Acquires served by an already-resident object.
    pub hits: u64,
    pub loads: u64,
    pub unloads: u64,
}

pub struct ResourceCache<'a, F: ResourceFactory> {
    factory: F,
    default: ManuallyDrop<F::Resource>,
    slots: &'a mut [ResourceSlot<F::Resource>],
    table: HashTable<'a, ResourceRef>,
    stats: CacheStats,
}

impl<'a, F: ResourceFactory> ResourceCache<'a, F> {
    fn is_default_name(name: &str) -> bool {
        name.eq_ignore_ascii_case(F::DEFAULT_NAME)
    }

    /// Take a reference on `name`, loading it into a free slot on a miss.
    ///
    /// `auto_release` is fixed by the acquire that takes the count from zero;
    /// later acquires cannot change it. The default name is redirected to
    /// [`ResourceHandle::DEFAULT`] without touching any count.
    pub fn acquire(
        &mut self,
        name: &str,
        auto_release: bool,
    ) -> Result<ResourceHandle, ResourceError> {
        if Self::is_default_name(name) {
            warn!(
                kind = F::KIND,
                "acquire called for the default {}; use get_default instead",
                F::KIND
            );
            return Ok(ResourceHandle::DEFAULT);
        }

        let mut reference = self.table.get(name);
        if reference.reference_count() == 0 {
            reference.set_auto_release(auto_release);
        }

        let index = match reference.handle() {
            Some(index) => {
                self.stats.hits += 1;
                index
            }
            None => {
                let index = self.load_into_free_slot(name)?;
                reference.set_handle(index);
                index
            }
        };
        reference.increment();
        trace!(
            name,
            index,
            reference_count = reference.reference_count(),
            auto_release = reference.auto_release(),
            "acquired {}", F::KIND
        );

        self.table.set(name, reference);
        Ok(ResourceHandle::new(index))
    }

    fn load_into_free_slot(&mut self, name: &str) -> Result<u32, ResourceError> {
        let capacity = self.slots.len();
        let Some(index) = self.slots.iter().position(ResourceSlot::is_free) else {
            error!(
                kind = F::KIND,
                capacity,
                "{} cache cannot hold any more resources; adjust configuration to allow more",
                F::KIND
            );
            return Err(ResourceError::CapacityExhausted {
                kind: F::KIND,
                capacity,
            });
        };

        let resource = self.factory.load(name).map_err(|source| {
            error!(kind = F::KIND, name, error = %source, "failed to load");
            ResourceError::LoadFailed {
                kind: F::KIND,
                name: name.to_owned(),
                source: Box::new(source),
            }
        })?;

        // Slot indices fit in u32: capacity comes from a u32 `max_count`.
        let index = index as u32;
        self.slots[index as usize].occupy(index, resource);
        self.stats.loads += 1;
        Ok(index)
    }

    /// Drop a reference on `name`.
    ///
    /// At zero an auto-release object is destroyed and its slot freed; any
    /// other object stays resident for the next acquire. Releasing a name
    /// whose count is already zero only logs a warning.
    pub fn release(&mut self, name: &str) {
        if Self::is_default_name(name) {
            return;
        }

        let mut reference = self.table.get(name);
        if reference.reference_count() == 0 {
            warn!(kind = F::KIND, name, "tried to release a {} with no references", F::KIND);
            return;
        }

        reference.decrement();
        if reference.reference_count() == 0 && reference.auto_release() {
            if let Some(index) = reference.handle() {
                self.unload(index as usize);
            }
            reference = ResourceRef::INVALID;
            trace!(name, "released {}; auto_release destroyed it", F::KIND);
        } else {
            trace!(
                name,
                reference_count = reference.reference_count(),
                auto_release = reference.auto_release(),
                "released {}", F::KIND
            );
        }

        self.table.set(name, reference);
    }

    /// Load `name` again and swap it into its existing slot.
    ///
    /// The previous object is destroyed only once the new one loaded; on
    /// failure it stays in place. The slot generation increments.
    pub fn reload(&mut self, name: &str) -> Result<ResourceHandle, ResourceError> {
        if Self::is_default_name(name) {
            warn!(kind = F::KIND, "the default {} cannot be reloaded", F::KIND);
            return Ok(ResourceHandle::DEFAULT);
        }

        let Some(index) = self.table.get(name).handle() else {
            warn!(kind = F::KIND, name, "reload requested for a {} that is not resident", F::KIND);
            return Err(ResourceError::NotResident {
                kind: F::KIND,
                name: name.to_owned(),
            });
        };

        let resource = self.factory.load(name).map_err(|source| {
            error!(kind = F::KIND, name, error = %source, "failed to reload");
            ResourceError::LoadFailed {
                kind: F::KIND,
                name: name.to_owned(),
                source: Box::new(source),
            }
        })?;

        let slot = &mut self.slots[index as usize];
        let previous = slot.replace(resource);
        debug!(kind = F::KIND, name, generation = slot.generation(), "reloaded");
        if let Some(previous) = previous {
            self.factory.destroy(previous);
        }
        self.stats.loads += 1;
        Ok(ResourceHandle::new(index))
    }

    /// The object behind `handle`, or `None` if its slot is free.
    pub fn get(&self, handle: ResourceHandle) -> Option<&F::Resource> {
        if handle.is_default() {
            return Some(&*self.default);
        }
        self.slots.get(handle.index() as usize)?.resource()
    }

    /// The always-resident default object. Never counted.
    pub fn get_default(&self) -> &F::Resource {
        &self.default
    }

    /// Slot backing `handle`, for generation checks.
    pub fn slot(&self, handle: ResourceHandle) -> Option<&ResourceSlot<F::Resource>> {
        self.slots.get(handle.index() as usize)
    }

    /// Bookkeeping currently stored for `name`.
    ///
    /// Colliding names share one record.
    pub fn reference(&self, name: &str) -> ResourceRef {
        self.table.get(name)
    }

    pub fn is_resident(&self, name: &str) -> bool {
        !Self::is_default_name(name) && self.table.get(name).handle().is_some()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots (the default object excluded).
    pub fn resident_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_free()).count()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Destroy every resident object, then the default one.
    pub fn shutdown(mut self) -> CacheStats {
        self.unload_all();
        debug!(kind = F::KIND, stats = ?self.stats, "cache shut down");
        self.stats
    }

    fn unload(&mut self, index: usize) {
        if let Some(resource) = self.slots.get_mut(index).and_then(ResourceSlot::vacate) {
            self.factory.destroy(resource);
            self.stats.unloads += 1;
        }
    }

    fn unload_all(&mut self) {
        for index in 0..self.slots.len() {
            self.unload(index);
        }
        self.table.fill(ResourceRef::INVALID);
    }
}

impl<F: ResourceFactory> Drop for ResourceCache<'_, F> {
    fn drop(&mut self) {
        self.unload_all();
        // SAFETY: `default` is never touched again after this point.
        let default = unsafe { ManuallyDrop::take(&mut self.default) };
        self.factory.destroy(default);
    }
}

impl<'a, F: ResourceFactory> Subsystem<'a> for ResourceCache<'a, F> {
    type Config = ResourceCacheConfig<F>;
    type Error = ResourceError;
    const NAME: &'static str = F::KIND;

    fn memory_requirement(config: &Self::Config) -> MemoryRequirement {
        MemoryRequirement::new()
            .array::<ResourceSlot<F::Resource>>(config.max_count as usize)
            .array::<ResourceRef>(config.table_count as usize)
    }

    fn initialize(config: Self::Config, mut region: ArenaRegion<'a>) -> Result<Self, Self::Error> {
        if config.max_count == 0 || config.table_count == 0 {
            error!(
                kind = F::KIND,
                max_count = config.max_count,
                table_count = config.table_count,
                "cache sizes must be greater than zero"
            );
            return Err(ResourceError::ZeroCapacity { kind: F::KIND });
        }
        let count = config.max_count as usize;
        let table_count = config.table_count as usize;

        let slots = region.take_with(count, |_| ResourceSlot::vacant())?;
        let mut table = HashTable::create(
            table_count,
            region.take_zeroed::<ResourceRef>(table_count)?,
        )?;
        table.fill(ResourceRef::INVALID);

        let mut factory = config.factory;
        let default = factory.create_default().map_err(|source| {
            error!(kind = F::KIND, error = %source, "failed to create the default");
            ResourceError::DefaultFailed {
                kind: F::KIND,
                source: Box::new(source),
            }
        })?;

        debug!(kind = F::KIND, max_count = count, table_count, "cache initialized");
        Ok(Self {
            factory,
            default: ManuallyDrop::new(default),
            slots,
            table,
            stats: CacheStats::default(),
        })
    }
}
