//! Splitter configuration
//!
//! Loaded from a TOML file next to the host, e.g.
//!
//! ```toml
//! fps = 30
//! store_path = "splits.json"
//! segment_prefix = "Segment"
//! default_icon = [8, 0]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Result, SplitterError};

/// Top-level configuration for a [`crate::Splitter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Host logic ticks per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// JSON file used by the persistence gateway; in-memory when absent
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Label prefix for splits without a name
    #[serde(default = "default_segment_prefix")]
    pub segment_prefix: String,
    /// Sprite coordinate shown for splits without an icon
    #[serde(default = "default_icon")]
    pub default_icon: [f64; 2],
}

fn default_fps() -> u32 {
    30
}

fn default_segment_prefix() -> String {
    "Segment".to_string()
}

fn default_icon() -> [f64; 2] {
    [8.0, 0.0]
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            store_path: None,
            segment_prefix: default_segment_prefix(),
            default_icon: default_icon(),
        }
    }
}

impl SplitterConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SplitterConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        log::debug!("Loading splitter config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Set the tick rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the persistence file
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(SplitterError::Config("fps must be greater than zero".to_string()));
        }
        Ok(())
    }
}
