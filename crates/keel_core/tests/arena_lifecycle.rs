//! Systems arena scenarios driven through the public API only.

use keel_core::containers::HashTable;
use keel_core::memory::{
    ArenaError, ArenaRegion, LinearAllocator, MemoryRequirement, MemoryTag, MemoryTracker,
    Subsystem,
};

#[test]
fn budget_violation_then_reset() {
    let mut tracker = MemoryTracker::new();
    let mut arena = LinearAllocator::create(&mut tracker, 1024).unwrap();

    arena.allocate(100).unwrap();
    assert_eq!(arena.allocated(), 100);

    let err = arena.allocate(1000).unwrap_err();
    assert_eq!(
        err,
        ArenaError::OutOfBudget {
            requested: 1000,
            remaining: 924
        }
    );
    assert_eq!(arena.allocated(), 100);

    arena.free_all();
    assert_eq!(arena.allocated(), 0);

    let block = arena.allocate(1000).unwrap();
    assert_eq!(block.as_ptr(), arena.base_ptr());
    assert_eq!(arena.allocated(), 1000);

    arena.destroy(&mut tracker);
    let stats = tracker.shutdown().unwrap();
    assert_eq!(stats.total_allocated(), 0);
}

/// Toy subsystem: a score table keyed by player name.
struct Scoreboard<'a> {
    scores: HashTable<'a, u32>,
}

struct ScoreboardConfig {
    max_players: usize,
}

impl<'a> Subsystem<'a> for Scoreboard<'a> {
    type Config = ScoreboardConfig;
    type Error = ArenaError;
    const NAME: &'static str = "scoreboard";

    fn memory_requirement(config: &Self::Config) -> MemoryRequirement {
        HashTable::<u32>::memory_requirement(config.max_players)
    }

    fn initialize(config: Self::Config, mut region: ArenaRegion<'a>) -> Result<Self, Self::Error> {
        let memory = region.take_zeroed::<u32>(config.max_players)?;
        let scores = HashTable::create(config.max_players, memory)
            .map_err(|_| ArenaError::ZeroSize)?;
        Ok(Self { scores })
    }
}

#[test]
fn subsystems_compose_over_one_arena() {
    let mut tracker = MemoryTracker::new();
    let arena = LinearAllocator::create(&mut tracker, 4096).unwrap();

    let mut first = arena
        .initialize_subsystem::<Scoreboard<'_>>(ScoreboardConfig { max_players: 64 })
        .unwrap();
    let carved = arena.allocated();
    assert_eq!(
        carved,
        Scoreboard::memory_requirement(&ScoreboardConfig { max_players: 64 }).size()
    );

    let mut second = arena
        .initialize_subsystem::<Scoreboard<'_>>(ScoreboardConfig { max_players: 16 })
        .unwrap();
    assert!(arena.allocated() > carved);

    first.scores.set("ada", 10);
    second.scores.set("ada", 99);
    assert_eq!(first.scores.get("ada"), 10);
    assert_eq!(second.scores.get("ada"), 99);

    let too_big = arena.initialize_subsystem::<Scoreboard<'_>>(ScoreboardConfig {
        max_players: 4096,
    });
    assert!(matches!(too_big, Err(ArenaError::OutOfBudget { .. })));

    drop((first, second));
    arena.destroy(&mut tracker);
}

#[test]
fn usage_report_reflects_live_blocks() {
    let mut tracker = MemoryTracker::new();
    let arena = LinearAllocator::create(&mut tracker, 3 * 1024 * 1024).unwrap();
    tracker.record(2048, MemoryTag::Texture);

    let report = tracker.usage_report().to_string();
    assert!(report.contains("LINEAR ALOC: 3.00MiB"));
    assert!(report.contains("TEXTURE    : 2.00KiB"));

    arena.destroy(&mut tracker);
    assert_eq!(tracker.live_allocations(), 0);
    assert_eq!(tracker.alloc_count(), 2);
}
