//! Allocation categories used to attribute tracked memory.

use std::fmt;

/// Semantic category for a tracked allocation.
///
/// Every byte handed out by the [`MemoryTracker`](super::MemoryTracker) is
/// attributed to exactly one tag so the usage report can break memory down
/// per subsystem. `Unknown` is accepted but should be re-classed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MemoryTag {
    Unknown,
    Array,
    LinearAllocator,
    DynamicArray,
    Dictionary,
    RingQueue,
    Bst,
    String,
    Application,
    Job,
    Texture,
    MaterialInstance,
    Renderer,
    Game,
    Transform,
    Entity,
    EntityNode,
    Scene,
}

impl MemoryTag {
    /// Number of distinct tags.
    pub const COUNT: usize = 18;

    /// Every tag in report order.
    pub const ALL: [MemoryTag; Self::COUNT] = [
        MemoryTag::Unknown,
        MemoryTag::Array,
        MemoryTag::LinearAllocator,
        MemoryTag::DynamicArray,
        MemoryTag::Dictionary,
        MemoryTag::RingQueue,
        MemoryTag::Bst,
        MemoryTag::String,
        MemoryTag::Application,
        MemoryTag::Job,
        MemoryTag::Texture,
        MemoryTag::MaterialInstance,
        MemoryTag::Renderer,
        MemoryTag::Game,
        MemoryTag::Transform,
        MemoryTag::Entity,
        MemoryTag::EntityNode,
        MemoryTag::Scene,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fixed-width label used by the usage report.
    pub const fn label(self) -> &'static str {
        match self {
            MemoryTag::Unknown => "UNKNOWN    ",
            MemoryTag::Array => "ARRAY      ",
            MemoryTag::LinearAllocator => "LINEAR ALOC",
            MemoryTag::DynamicArray => "DARRAY     ",
            MemoryTag::Dictionary => "DICT       ",
            MemoryTag::RingQueue => "RING_QUEUE ",
            MemoryTag::Bst => "BST        ",
            MemoryTag::String => "STRING     ",
            MemoryTag::Application => "APPLICATION",
            MemoryTag::Job => "JOB        ",
            MemoryTag::Texture => "TEXTURE    ",
            MemoryTag::MaterialInstance => "MAT_INST   ",
            MemoryTag::Renderer => "RENDERER   ",
            MemoryTag::Game => "GAME       ",
            MemoryTag::Transform => "TRANSFORM  ",
            MemoryTag::Entity => "ENTITY     ",
            MemoryTag::EntityNode => "ENTITY_NODE",
            MemoryTag::Scene => "SCENE      ",
        }
    }
}

impl fmt::Display for MemoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}
