use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub patrol: PatrolConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub default_grid_file: DefaultGridFileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct PatrolConfig {
    /// Overrides the built-in step budget (4 steps per cell)
    #[serde(default)]
    pub step_limit: Option<usize>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_steps_per_frame")]
    pub steps_per_frame: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct DefaultGridFileConfig {
    #[serde(default = "default_grid_file_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default values
fn default_parallel() -> bool { true }
fn default_window_title() -> String { "PatrolGrid - Guard Patrol Viewer".to_string() }
fn default_cell_size() -> f32 { 24.0 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_steps_per_frame() -> usize { 1 }
fn default_grid_file_path() -> String { "test_data/canonical.json".to_string() }
fn default_log_filter() -> String { "patrolgrid=info".to_string() }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_size: default_cell_size(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            steps_per_frame: default_steps_per_frame(),
        }
    }
}

impl Default for DefaultGridFileConfig {
    fn default() -> Self {
        Self {
            path: default_grid_file_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patrol: PatrolConfig::default(),
            analysis: AnalysisConfig::default(),
            visual: VisualConfig::default(),
            default_grid_file: DefaultGridFileConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file gives the defaults; a file that
    /// exists but does not parse is an error, so the caller can report it.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
