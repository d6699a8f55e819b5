//! Runtime settings
//!
//! There are no command line flags. Tuning comes from an optional JSON file
//! named by `KIOSKFX_CONFIG`; every key falls back to the built-in default.

use crate::error::{FxError, Result};
use crate::phase::PhaseParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "KIOSKFX_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
    /// Overrides the program's end-of-frame sleep
    pub frame_delay_ms: Option<u64>,
    /// Stop after this many frames (unset = run until quit)
    pub max_frames: Option<u64>,
    /// Overrides the program's star population
    pub star_count: Option<usize>,
    pub font_path: PathBuf,
    pub font_size: u16,
    pub hyperspace: PhaseParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            frame_delay_ms: None,
            max_frames: None,
            star_count: None,
            font_path: PathBuf::from("DejaVuSansMono.ttf"),
            font_size: 18,
            hyperspace: PhaseParams::default(),
        }
    }
}

impl Settings {
    /// Load from the file named by `KIOSKFX_CONFIG`, or defaults if unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FxError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json).map_err(|source| FxError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn star_count_or(&self, default: usize) -> usize {
        self.star_count.unwrap_or(default)
    }
}
