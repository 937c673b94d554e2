use crate::session::SessionParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
}

// ============================================================================
// Library Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LibraryConfig {
    /// Path to the recorded gesture store
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("gestures.json")
}

// ============================================================================
// Matching Config
// ============================================================================

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct MatchingConfig {
    /// DTW distance below which a keyframe matches
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Seconds to ignore all frames after a detection
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: f32,

    /// Seconds a stage may wait for its keyframe before the sequence resets
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: f32,

    /// Process every Nth frame (1 = every frame)
    #[serde(default = "default_frame_decimation")]
    pub frame_decimation: u32,

    /// Log per-frame noise such as skipped incomplete frames
    #[serde(default)]
    pub verbose: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            cooldown_secs: default_cooldown_secs(),
            stage_timeout_secs: default_stage_timeout_secs(),
            frame_decimation: default_frame_decimation(),
            verbose: false,
        }
    }
}

impl MatchingConfig {
    /// Session parameters derived from this section
    pub fn params(&self) -> SessionParams {
        SessionParams {
            threshold: self.threshold,
            cooldown: Duration::from_secs_f32(self.cooldown_secs),
            stage_timeout: Duration::from_secs_f32(self.stage_timeout_secs),
            frame_decimation: self.frame_decimation,
        }
    }
}

fn default_threshold() -> f32 {
    0.9
}

fn default_cooldown_secs() -> f32 {
    1.0
}

fn default_stage_timeout_secs() -> f32 {
    5.0
}

fn default_frame_decimation() -> u32 {
    1
}

// ============================================================================
// Actions Config
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ActionsConfig {
    /// Gesture-to-program bindings for run mode
    #[serde(default)]
    pub bind: Vec<ActionBinding>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActionBinding {
    pub gesture: String,
    pub command: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    /// Read a config file; a missing file means defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: failed to parse {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: failed to read {}: {}", path.display(), e);
                Config::default()
            }
        }
    }
}
