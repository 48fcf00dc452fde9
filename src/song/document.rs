// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song documents (`.mlc` files).
//!
//! A song document is JSON (YAML is accepted as well) holding metadata and
//! timed sections of lyric entries. Documents are checked field by field
//! before decoding so a broken file is rejected with a message naming the
//! first missing field, and never reaches the song model.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CueError, Result};
use crate::music::Notation;

/// Current document format version
pub const FORMAT_VERSION: &str = "1.0.0";

const REQUIRED_META_FIELDS: [&str; 4] = ["title", "bpm", "key", "duration"];
const REQUIRED_SECTION_FIELDS: [&str; 4] = ["name", "start_time", "end_time", "entries"];
const REQUIRED_ENTRY_FIELDS: [&str; 2] = ["start_time", "end_time"];

/// Root of a song document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongDocument {
    /// Format version
    pub version: String,
    /// Song metadata
    pub meta: SongMeta,
    /// Timed sections in playback order
    #[serde(default)]
    pub sections: Vec<SectionDoc>,
}

/// Song metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongMeta {
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: String,
    /// Tempo in BPM
    pub bpm: f64,
    /// Musical key (e.g., "C", "Am", "F#")
    pub key: String,
    #[serde(default = "default_time_signature")]
    pub time_signature: String,
    /// Default transpose in semitones
    #[serde(default)]
    pub transpose: i32,
    /// Capo fret, added to the transpose
    #[serde(default)]
    pub capo: i32,
    /// Length of the audio in seconds
    pub duration: f64,
    /// Path of the backing audio, relative to the library
    #[serde(default)]
    pub audio_file: Option<String>,
    #[serde(default)]
    pub prefer_notation: Notation,
}

fn default_artist() -> String {
    "Unknown".to_string()
}
fn default_time_signature() -> String {
    "4/4".to_string()
}

/// A section as stored in the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionDoc {
    pub name: String,
    #[serde(default)]
    pub order: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub entries: Vec<EntryDoc>,
}

/// A lyric entry as stored in the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryDoc {
    #[serde(default)]
    pub word: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    /// Space-separated chord annotation (e.g., "Am7 G")
    #[serde(default)]
    pub chords: Option<String>,
}

impl SongDocument {
    /// Create an empty document with default metadata
    pub fn empty(title: &str, artist: &str, bpm: f64, key: &str) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            meta: SongMeta {
                title: title.to_string(),
                artist: artist.to_string(),
                album: String::new(),
                year: None,
                genre: String::new(),
                bpm,
                key: key.to_string(),
                time_signature: default_time_signature(),
                transpose: 0,
                capo: 0,
                duration: 0.0,
                audio_file: None,
                prefer_notation: Notation::Sharp,
            },
            sections: Vec::new(),
        }
    }

    /// Load a document from disk; `.yaml`/`.yml` files are read as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CueError::NotFound(format!("File not found: {}", path.display())));
        }

        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Validate an already-decoded document tree and convert it
    pub fn from_value(value: Value) -> Result<Self> {
        validate_structure(&value)?;
        let document: SongDocument = serde_json::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    /// Check value ranges that the structural pass cannot see
    pub fn validate(&self) -> Result<()> {
        if !(self.meta.bpm > 0.0) {
            return Err(CueError::validation(format!(
                "Invalid bpm: {}",
                self.meta.bpm
            )));
        }
        if self.meta.duration < 0.0 {
            return Err(CueError::validation(format!(
                "Invalid duration: {}",
                self.meta.duration
            )));
        }

        for (i, section) in self.sections.iter().enumerate() {
            if section.start_time < 0.0 || section.end_time < section.start_time {
                return Err(CueError::validation(format!(
                    "Section {} has invalid time range {}..{}",
                    i, section.start_time, section.end_time
                )));
            }
            for (j, entry) in section.entries.iter().enumerate() {
                if entry.start_time < 0.0 || entry.end_time < entry.start_time {
                    return Err(CueError::validation(format!(
                        "Section {}, entry {} has invalid time range {}..{}",
                        i, j, entry.start_time, entry.end_time
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and write to disk, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Check that every required field is present, reporting the first one missing
pub fn validate_structure(value: &Value) -> Result<()> {
    if value.get("version").is_none() {
        return Err(CueError::validation("Missing 'version' field"));
    }

    let meta = value
        .get("meta")
        .ok_or_else(|| CueError::validation("Missing 'meta' field"))?;
    for field in REQUIRED_META_FIELDS {
        if meta.get(field).is_none() {
            return Err(CueError::validation(format!(
                "Missing required meta field: {}",
                field
            )));
        }
    }

    let sections = value
        .get("sections")
        .ok_or_else(|| CueError::validation("Missing 'sections' field"))?
        .as_array()
        .ok_or_else(|| CueError::validation("'sections' must be a list"))?;

    for (i, section) in sections.iter().enumerate() {
        for field in REQUIRED_SECTION_FIELDS {
            if section.get(field).is_none() {
                return Err(CueError::validation(format!(
                    "Section {} missing '{}'",
                    i, field
                )));
            }
        }

        let entries = section["entries"].as_array().ok_or_else(|| {
            CueError::validation(format!("Section {} 'entries' must be a list", i))
        })?;
        for (j, entry) in entries.iter().enumerate() {
            for field in REQUIRED_ENTRY_FIELDS {
                if entry.get(field).is_none() {
                    return Err(CueError::validation(format!(
                        "Section {}, entry {} missing '{}'",
                        i, j, field
                    )));
                }
            }
        }
    }

    Ok(())
}
