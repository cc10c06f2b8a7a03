// Configuration module for reading Filler.toml
// This module provides the tunable search limits, the default game setup and debug logging options

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::search::SearchOptions;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub game: GameConfig,
    pub debug: DebugConfig,
}

/// Search limits and execution strategy
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub parallel_depth: u8,
    pub min_cpus_for_parallel: usize,
    pub polling_interval_ms: u64,
}

impl SearchConfig {
    /// Search options for the configured limits
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            max_depth: self.max_depth,
            parallel_depth: self.parallel_depth,
        }
    }
}

/// Default game setup used when no board is given on the command line
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    pub second_player_starts: bool,
    /// One string of color digits per row, row 0 first
    pub board: Vec<String>,
    /// Colors already played, by name or index
    #[serde(default)]
    pub opening: Vec<String>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Filler.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Filler.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Filler.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Filler.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                max_depth: 56,
                parallel_depth: 2,
                min_cpus_for_parallel: 2,
                polling_interval_ms: 1000,
            },
            game: GameConfig {
                second_player_starts: false,
                board: [
                    "24102024", "42534251", "31212343", "45350502", "50231323", "13103251",
                    "32024105",
                ]
                .iter()
                .map(|row| row.to_string())
                .collect(),
                opening: Vec::new(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "filler_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Filler.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
