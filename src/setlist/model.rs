// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Setlist documents: ordered song references with shared playback settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CueError, Result};

/// Setlist format version written by `Setlist::new`
pub const SETLIST_VERSION: &str = "1.0.0";

/// Longest allowed gap between songs
pub const MAX_GAP_SECONDS: u32 = 60;

/// A song reference inside a setlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetlistSong {
    /// Song id in the library
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Expected length in seconds
    pub duration: f64,
    /// Performance notes (capo, tuning, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Transpose applied when this song is played
    #[serde(default)]
    pub transpose: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
}

impl SetlistSong {
    /// Create a reference with no overrides
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration,
            notes: None,
            transpose: 0,
            key: None,
            bpm: None,
        }
    }
}

/// Playback policy shared by every song in a setlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetlistSettings {
    /// Move to the next song when the current one ends
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    /// Silence between songs
    #[serde(default = "default_gap_seconds")]
    pub gap_seconds: u32,
    /// Start over after the last song
    #[serde(default, rename = "loop")]
    pub loop_: bool,
    #[serde(default)]
    pub shuffle: bool,
    /// Announce the gap second by second
    #[serde(default = "default_true")]
    pub countdown: bool,
}

fn default_true() -> bool {
    true
}

fn default_gap_seconds() -> u32 {
    5
}

impl Default for SetlistSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            gap_seconds: default_gap_seconds(),
            loop_: false,
            shuffle: false,
            countdown: true,
        }
    }
}

/// An ordered list of songs for a performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setlist {
    #[serde(default = "default_version")]
    pub version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: SetlistSettings,
    #[serde(default)]
    pub songs: Vec<SetlistSong>,
    /// Venue, genre, ...
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    SETLIST_VERSION.to_string()
}

impl Setlist {
    /// Create an empty setlist with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            name: name.into(),
            description: None,
            settings: SetlistSettings::default(),
            songs: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Load from disk; `.yaml`/`.yml` files are read as YAML, anything else as JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CueError::NotFound(format!("Setlist not found: {}", path.display())));
        }

        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let setlist: Setlist = serde_json::from_str(json)?;
        setlist.validate()?;
        Ok(setlist)
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let setlist: Setlist = serde_yaml::from_str(yaml)?;
        setlist.validate()?;
        Ok(setlist)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and write as JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject settings and songs the scheduler cannot play
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CueError::validation("Setlist name must not be empty"));
        }
        if self.settings.gap_seconds > MAX_GAP_SECONDS {
            return Err(CueError::validation(format!(
                "gap_seconds must be between 0 and {}, got {}",
                MAX_GAP_SECONDS, self.settings.gap_seconds
            )));
        }
        for (i, song) in self.songs.iter().enumerate() {
            if song.id.trim().is_empty() {
                return Err(CueError::validation(format!("Song {} has an empty id", i)));
            }
            if !(song.duration >= 0.0) {
                return Err(CueError::validation(format!(
                    "Song {} ('{}') has invalid duration {}",
                    i, song.id, song.duration
                )));
            }
        }
        Ok(())
    }

    /// Song time plus the gaps between songs, in seconds
    pub fn total_duration(&self) -> f64 {
        let songs: f64 = self.songs.iter().map(|s| s.duration).sum();
        let gaps = self.songs.len().saturating_sub(1) as f64 * self.settings.gap_seconds as f64;
        songs + gaps
    }

    /// Human-readable length, e.g. "1h 5m", "3m 20s" or "45 minutes"
    pub fn estimated_time(&self) -> String {
        let total = self.total_duration();
        let minutes = (total / 60.0) as u64;
        let seconds = (total % 60.0) as u64;

        if minutes > 60 {
            format!("{}h {}m", minutes / 60, minutes % 60)
        } else if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{} minutes", minutes)
        }
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Append a song, or insert it at `index` (clamped to the end)
    pub fn add_song(&mut self, song: SetlistSong, index: Option<usize>) {
        match index {
            Some(i) => self.songs.insert(i.min(self.songs.len()), song),
            None => self.songs.push(song),
        }
    }

    /// Remove and return the song at `index`
    pub fn remove_song(&mut self, index: usize) -> Option<SetlistSong> {
        if index < self.songs.len() {
            Some(self.songs.remove(index))
        } else {
            None
        }
    }

    /// Move a song; does nothing when either index is out of range
    pub fn move_song(&mut self, from: usize, to: usize) -> bool {
        if from >= self.songs.len() || to >= self.songs.len() {
            return false;
        }
        let song = self.songs.remove(from);
        self.songs.insert(to, song);
        true
    }

    pub fn get_song(&self, index: usize) -> Option<&SetlistSong> {
        self.songs.get(index)
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }

    /// Copy of this setlist under a new name
    pub fn duplicate(&self, name: impl Into<String>) -> Setlist {
        Setlist {
            version: default_version(),
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Three songs of 180, 240 and 200 seconds with a 5 second gap
    pub(crate) fn sample_setlist() -> Setlist {
        let mut setlist = Setlist::new("Coffee Shop Gig");
        setlist.add_song(SetlistSong::new("one", "One", "A", 180.0), None);
        setlist.add_song(SetlistSong::new("two", "Two", "B", 240.0), None);
        setlist.add_song(SetlistSong::new("three", "Three", "C", 200.0), None);
        setlist
    }

    #[test]
    fn test_total_duration() {
        let setlist = sample_setlist();
        assert_eq!(setlist.total_duration(), 630.0);

        let mut single = Setlist::new("Solo");
        assert_eq!(single.total_duration(), 0.0);
        single.add_song(SetlistSong::new("one", "One", "A", 100.0), None);
        assert_eq!(single.total_duration(), 100.0);
    }

    #[test]
    fn test_estimated_time() {
        let mut setlist = Setlist::new("Times");
        setlist.settings.gap_seconds = 0;

        setlist.add_song(SetlistSong::new("a", "A", "X", 2700.0), None);
        assert_eq!(setlist.estimated_time(), "45 minutes");

        setlist.songs[0].duration = 200.0;
        assert_eq!(setlist.estimated_time(), "3m 20s");

        setlist.songs[0].duration = 3900.0;
        assert_eq!(setlist.estimated_time(), "1h 5m");
    }

    #[test]
    fn test_edit_operations() {
        let mut setlist = sample_setlist();

        setlist.add_song(SetlistSong::new("zero", "Zero", "D", 60.0), Some(0));
        assert_eq!(setlist.get_song(0).unwrap().id, "zero");
        assert_eq!(setlist.song_count(), 4);

        assert!(setlist.move_song(0, 3));
        assert_eq!(setlist.get_song(3).unwrap().id, "zero");
        assert!(!setlist.move_song(0, 9));

        let removed = setlist.remove_song(3).unwrap();
        assert_eq!(removed.id, "zero");
        assert!(setlist.remove_song(3).is_none());

        let copy = setlist.duplicate("Copy");
        assert_eq!(copy.name, "Copy");
        assert_eq!(copy.songs, setlist.songs);

        setlist.clear();
        assert!(setlist.is_empty());
        assert_eq!(copy.song_count(), 3);
    }

    #[test]
    fn test_validate() {
        let mut setlist = sample_setlist();
        assert!(setlist.validate().is_ok());

        setlist.settings.gap_seconds = 61;
        assert!(matches!(setlist.validate(), Err(CueError::Validation(_))));
        setlist.settings.gap_seconds = 60;
        assert!(setlist.validate().is_ok());

        setlist.songs[1].duration = -1.0;
        assert!(setlist.validate().is_err());
    }

    #[test]
    fn test_parse_json_with_defaults() {
        let json = r#"{
            "name": "Open Mic",
            "settings": { "gap_seconds": 3, "loop": true },
            "songs": [
                { "id": "wonderwall.mlc", "title": "Wonderwall", "artist": "Oasis",
                  "duration": 225, "notes": "Capo 2", "transpose": -2 }
            ]
        }"#;

        let setlist = Setlist::from_json(json).unwrap();
        assert_eq!(setlist.version, SETLIST_VERSION);
        assert!(setlist.settings.auto_advance);
        assert!(setlist.settings.countdown);
        assert!(setlist.settings.loop_);
        assert_eq!(setlist.settings.gap_seconds, 3);
        assert_eq!(setlist.songs[0].transpose, -2);
        assert_eq!(setlist.songs[0].notes.as_deref(), Some("Capo 2"));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "name: Rehearsal\nsongs:\n  - id: intro\n    title: Intro\n    artist: Band\n    duration: 90\n";
        let setlist = Setlist::from_yaml(yaml).unwrap();
        assert_eq!(setlist.songs[0].id, "intro");
        assert_eq!(setlist.settings.gap_seconds, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sets").join("gig.json");

        let setlist = sample_setlist();
        setlist.save(&path).unwrap();
        let loaded = Setlist::load(&path).unwrap();
        assert_eq!(loaded, setlist);

        assert!(matches!(
            Setlist::load(dir.path().join("missing.json")),
            Err(CueError::NotFound(_))
        ));
    }
}
