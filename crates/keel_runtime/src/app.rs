//! Composition root: owns the tracker and the systems arena, brings
//! subsystems up in order and tears them down in reverse.

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use keel_asset::{texture_system_config, HeadlessBackend, ImageDirectory, TextureSystem};
use keel_core::memory::{LinearAllocator, MemoryStats, MemoryTracker};
use keel_core::resource::{CacheStats, ResourceError};
use tracing::{error, info, warn};

type Textures<'a> = TextureSystem<'a, ImageDirectory, HeadlessBackend>;

/// Outcome of one engine run.
#[derive(Debug)]
pub struct RunSummary {
    pub textures: CacheStats,
    /// Preloads that failed to load and were left out.
    pub skipped_preloads: Vec<String>,
    pub final_memory: Option<MemoryStats>,
}

pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    config.validate()?;

    let mut tracker = MemoryTracker::new();
    let arena = LinearAllocator::create(&mut tracker, config.systems_arena_size)
        .context("Failed to create the systems arena")?;
    info!(bytes = arena.total_size(), "systems arena created");

    let session = run_textures(&arena, &tracker, config);

    arena.destroy(&mut tracker);
    let final_memory = tracker.shutdown();
    let (textures, skipped_preloads) = session?;
    Ok(RunSummary {
        textures,
        skipped_preloads,
        final_memory,
    })
}

fn run_textures(
    arena: &LinearAllocator<'_>,
    tracker: &MemoryTracker,
    config: &EngineConfig,
) -> Result<(CacheStats, Vec<String>)> {
    let texture_config = texture_system_config(
        config.max_texture_count,
        ImageDirectory::new(&config.texture_directory),
        HeadlessBackend::new(),
    )
    .with_table_count(config.texture_table_count());

    let mut textures = arena
        .initialize_subsystem::<Textures<'_>>(texture_config)
        .context("Failed to initialize texture system. Application cannot continue.")?;
    info!(
        max_texture_count = config.max_texture_count,
        arena_used = arena.allocated(),
        "texture system initialized"
    );

    let mut acquired = Vec::new();
    let mut skipped = Vec::new();
    for name in &config.preload_textures {
        match textures.acquire(name, false) {
            Ok(_) => acquired.push(name.as_str()),
            Err(err) if err.is_fatal() => {
                error!(error = %err, "texture preload cannot continue");
                return Err(err.into());
            }
            Err(err) => {
                warn!(name = %name, error = %err, "preload failed; skipping it");
                skipped.push(name.clone());
            }
        }
    }

    info!("{}", tracker.usage_report());
    info!(
        resident = textures.resident_count(),
        backend_bytes = textures.factory().backend().resident_bytes(),
        "textures resident"
    );

    for name in acquired {
        textures.release(name);
    }
    Ok((textures.shutdown(), skipped))
}

/// Whether `err` came from a fatal resource condition.
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ResourceError>())
        .any(ResourceError::is_fatal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::{Path, PathBuf};

    fn small_config(dir: &Path) -> EngineConfig {
        EngineConfig {
            systems_arena_size: 1 << 20,
            max_texture_count: 8,
            texture_directory: dir.to_path_buf(),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn run_with_no_preloads() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&small_config(dir.path())).unwrap();
        assert_eq!(summary.textures, CacheStats::default());
        assert_eq!(summary.final_memory.unwrap().total_allocated(), 0);
    }

    #[test]
    fn failed_preloads_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([40, 160, 40, 255]))
            .save(dir.path().join("grass.png"))
            .unwrap();
        std::fs::write(dir.path().join("broken.png"), b"\x89PNG but not really").unwrap();

        let config = EngineConfig {
            preload_textures: vec!["grass".into(), "absent".into(), "broken".into()],
            ..small_config(dir.path())
        };
        let summary = run(&config).unwrap();
        assert_eq!(summary.skipped_preloads, vec!["absent", "broken"]);
        assert_eq!(summary.textures.loads, 1);
        // Preloads stay resident until shutdown.
        assert_eq!(summary.textures.unloads, 1);
    }

    #[test]
    fn full_texture_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["grass", "stone", "sand"] {
            RgbaImage::from_pixel(2, 2, Rgba([90, 90, 90, 255]))
                .save(dir.path().join(format!("{name}.png")))
                .unwrap();
        }
        // Two slots, four table entries: the three names hash apart.
        let config = EngineConfig {
            max_texture_count: 2,
            preload_textures: vec!["grass".into(), "stone".into(), "sand".into()],
            ..small_config(dir.path())
        };
        let err = run(&config).unwrap_err();
        assert!(is_fatal(&err));
    }

    #[test]
    fn undersized_arena_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            systems_arena_size: 64,
            ..small_config(dir.path())
        };
        let err = run(&config).unwrap_err();
        assert!(is_fatal(&err));
    }

    #[test]
    fn invalid_config_is_rejected_before_allocating() {
        let config = EngineConfig {
            max_texture_count: 0,
            ..small_config(&PathBuf::from("."))
        };
        assert!(run(&config).is_err());
    }
}
