//! Engine configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MIB: usize = 1024 * 1024;

/// Default name-table entries per texture slot. Above one, a full cache
/// reports exhaustion instead of handing a new name a colliding texture.
const TEXTURE_TABLE_ENTRIES_PER_SLOT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("systems_arena_size must be greater than zero")]
    ZeroArena,

    #[error("max_texture_count must be greater than zero")]
    ZeroTextureCount,

    #[error("texture_table_count must be greater than zero when set")]
    ZeroTextureTable,
}

/// Engine settings, read from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bytes reserved up front for every subsystem's state.
    pub systems_arena_size: usize,
    pub max_texture_count: u32,
    /// Name-table entries for the texture cache; defaults to twice
    /// `max_texture_count`.
    pub texture_table_count: Option<u32>,
    /// Directory textures are decoded from, as `<name>.png`.
    pub texture_directory: PathBuf,
    /// Textures acquired at startup and kept resident.
    pub preload_textures: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            systems_arena_size: 64 * MIB,
            max_texture_count: 65536,
            texture_table_count: None,
            texture_directory: PathBuf::from("assets/textures"),
            preload_textures: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.systems_arena_size == 0 {
            return Err(ConfigError::ZeroArena);
        }
        if self.max_texture_count == 0 {
            return Err(ConfigError::ZeroTextureCount);
        }
        if self.texture_table_count == Some(0) {
            return Err(ConfigError::ZeroTextureTable);
        }
        Ok(())
    }

    pub fn texture_table_count(&self) -> u32 {
        self.texture_table_count.unwrap_or_else(|| {
            self.max_texture_count
                .saturating_mul(TEXTURE_TABLE_ENTRIES_PER_SLOT)
        })
    }
}
