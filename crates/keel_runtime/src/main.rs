//! Keel Engine Runtime
//!
//! Boots the memory and resource layer, runs a short texture session and
//! shuts everything down again.

mod app;
mod config;

use anyhow::Result;
use config::EngineConfig;
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Keel Engine v{}", keel_core::VERSION);

    let config = match std::env::args_os().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    match app::run(&config) {
        Ok(summary) => {
            tracing::info!(
                loads = summary.textures.loads,
                unloads = summary.textures.unloads,
                skipped = summary.skipped_preloads.len(),
                leaked_bytes = summary
                    .final_memory
                    .as_ref()
                    .map_or(0, |stats| stats.total_allocated()),
                "Runtime shut down cleanly"
            );
            Ok(())
        }
        Err(err) => {
            if app::is_fatal(&err) {
                tracing::error!("Fatal engine error; application cannot continue");
            }
            Err(err)
        }
    }
}
