// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song library: resolving setlist song ids to documents on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use super::document::SongDocument;
use crate::error::{CueError, Result};

/// File extension for song documents
pub const SONG_EXTENSION: &str = "mlc";

/// Resolves a song id to a full document
pub trait SongLoader: Send + Sync {
    /// Load and validate the document for `id`
    fn load_song(&self, id: &str) -> Result<SongDocument>;
}

/// Summary row for a song in the library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongListing {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration: f64,
    pub bpm: f64,
    pub key: String,
}

/// A directory of `.mlc` song documents
#[derive(Debug, Clone)]
pub struct SongLibrary {
    root: PathBuf,
}

impl SongLibrary {
    /// Create a library rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Library directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for an id: `<root>/<id>.mlc`, unless the id already ends in `.mlc`.
    /// Ids naming anything outside the library are rejected.
    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if matches!(id, "" | "." | "..")
            || id.contains(['/', '\\'])
            || Path::new(id).is_absolute()
        {
            return Err(CueError::validation(format!("Invalid song id '{}'", id)));
        }

        let suffix = format!(".{}", SONG_EXTENSION);
        if id.ends_with(&suffix) {
            Ok(self.root.join(id))
        } else {
            Ok(self.root.join(format!("{}{}", id, suffix)))
        }
    }

    /// List every readable song, sorted by id. Broken files are skipped.
    pub fn list(&self) -> Result<Vec<SongListing>> {
        let mut listings = Vec::new();

        for dir_entry in fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SONG_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match SongDocument::load(&path) {
                Ok(doc) => listings.push(SongListing {
                    id: id.to_string(),
                    title: doc.meta.title,
                    artist: doc.meta.artist,
                    duration: doc.meta.duration,
                    bpm: doc.meta.bpm,
                    key: doc.meta.key,
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable song"),
            }
        }

        listings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(listings)
    }

    /// Write a document under `id`
    pub fn save(&self, id: &str, document: &SongDocument) -> Result<PathBuf> {
        let path = self.path_for(id)?;
        document.save(&path)?;
        Ok(path)
    }
}

impl SongLoader for SongLibrary {
    fn load_song(&self, id: &str) -> Result<SongDocument> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(CueError::NotFound(format!("Song '{}' ({})", id, path.display())));
        }
        SongDocument::load(path)
    }
}
