// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the cue engine.
//!
//! Settings are read from YAML, or TOML when the file ends in `.toml`.
//! Every field has a default, so an empty file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::music::Notation;
use crate::setlist::SchedulerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CueConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CueConfig {
    /// Load from a YAML or TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Scheduler settings derived from the playback and display sections
    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(self.playback.poll_interval_ms.max(1)),
            end_threshold: self.playback.end_threshold_seconds,
            notation: self.display.notation,
            shuffle_seed: self.playback.shuffle_seed,
        }
    }
}

/// Where songs and setlists live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryConfig {
    #[serde(default = "default_songs_dir")]
    pub songs_dir: PathBuf,
    #[serde(default = "default_setlists_dir")]
    pub setlists_dir: PathBuf,
}

fn default_songs_dir() -> PathBuf {
    PathBuf::from("data/songs")
}
fn default_setlists_dir() -> PathBuf {
    PathBuf::from("data/setlists")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            songs_dir: default_songs_dir(),
            setlists_dir: default_setlists_dir(),
        }
    }
}

impl LibraryConfig {
    /// Resolve a setlist argument. A bare file name that does not exist in
    /// the working directory is looked up in `setlists_dir`.
    pub fn setlist_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        let bare = path.components().count() == 1 && path.file_name().is_some();
        if bare && !path.exists() {
            self.setlists_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// How songs are shown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Accidental spelling; unset uses each song's preference
    #[serde(default)]
    pub notation: Option<Notation>,
    /// Window for upcoming entries, in seconds
    #[serde(default = "default_lookahead")]
    pub lookahead_seconds: f64,
}

fn default_lookahead() -> f64 {
    5.0
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            notation: None,
            lookahead_seconds: default_lookahead(),
        }
    }
}

/// Position sampling and auto-advance timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Interval between position samples fed to the sync engine
    #[serde(default = "default_position_interval")]
    pub position_interval_ms: u64,
    /// Interval between end-of-song checks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Seconds before the end at which a song counts as finished
    #[serde(default = "default_end_threshold")]
    pub end_threshold_seconds: f64,
    /// Fixed seed for shuffle order
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_position_interval() -> u64 {
    50
}
fn default_poll_interval() -> u64 {
    100
}
fn default_end_threshold() -> f64 {
    0.5
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            position_interval_ms: default_position_interval(),
            poll_interval_ms: default_poll_interval(),
            end_threshold_seconds: default_end_threshold(),
            shuffle_seed: None,
        }
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = CueConfig::from_yaml("").unwrap();
        assert_eq!(config, CueConfig::default());
        assert_eq!(config.library.songs_dir, PathBuf::from("data/songs"));
        assert_eq!(config.display.lookahead_seconds, 5.0);
        assert_eq!(config.playback.position_interval_ms, 50);
        assert_eq!(config.playback.poll_interval_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
library:
  songs_dir: "/srv/songs"
display:
  notation: flat
playback:
  poll_interval_ms: 250
  shuffle_seed: 42
"#;

        let config = CueConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.library.songs_dir, PathBuf::from("/srv/songs"));
        assert_eq!(config.library.setlists_dir, PathBuf::from("data/setlists"));
        assert_eq!(config.display.notation, Some(Notation::Flat));
        assert_eq!(config.playback.poll_interval_ms, 250);
        assert_eq!(config.playback.end_threshold_seconds, 0.5);

        let scheduler = config.scheduler();
        assert_eq!(scheduler.poll_interval, Duration::from_millis(250));
        assert_eq!(scheduler.notation, Some(Notation::Flat));
        assert_eq!(scheduler.shuffle_seed, Some(42));
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
[display]
notation = "sharp"
lookahead_seconds = 8.0

[logging]
level = "debug"
"#;

        let config = CueConfig::from_toml(text).unwrap();
        assert_eq!(config.display.notation, Some(Notation::Sharp));
        assert_eq!(config.display.lookahead_seconds, 8.0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        assert!(CueConfig::from_yaml("playback: [1, 2").is_err());
        assert!(CueConfig::from_yaml("display:\n  notation: sideways\n").is_err());
    }

    #[test]
    fn test_setlist_path() {
        let dir = tempdir().unwrap();
        let library = LibraryConfig {
            setlists_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        assert_eq!(
            library.setlist_path("friday-gig.yaml"),
            dir.path().join("friday-gig.yaml")
        );
        assert_eq!(library.setlist_path("sets/gig.json"), PathBuf::from("sets/gig.json"));
        // Files in the working directory win
        assert_eq!(library.setlist_path("Cargo.toml"), PathBuf::from("Cargo.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();

        let mut config = CueConfig::default();
        config.playback.end_threshold_seconds = 1.0;
        config.display.notation = Some(Notation::Flat);

        let path = dir.path().join("cue.yaml");
        config.save(&path).unwrap();
        assert_eq!(CueConfig::load(&path).unwrap(), config);

        let toml_path = dir.path().join("cue.toml");
        fs::write(&toml_path, "[playback]\nend_threshold_seconds = 1.5\n").unwrap();
        let loaded = CueConfig::load(&toml_path).unwrap();
        assert_eq!(loaded.playback.end_threshold_seconds, 1.5);

        assert!(CueConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
