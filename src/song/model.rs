// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timed song script with a transposed view.
//!
//! A [`Song`] keeps the script exactly as the document wrote it behind an
//! `Arc`, and a projected copy of the sections with every chord moved by
//! the current transpose. Changing the transpose or notation builds a new
//! `Song`; the source script is never touched, so callers can hold the
//! before and after views side by side.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::document::{SongDocument, SongMeta};
use crate::music::{transpose_key, ChordToken, Notation};

/// Default tempo when neither override nor metadata provides one
pub const DEFAULT_BPM: f64 = 120.0;

/// Default key when neither override nor metadata provides one
pub const DEFAULT_KEY: &str = "C";

/// One item of a chord annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordSymbol {
    /// Text shown to the performer
    pub text: String,
    /// Parsed chord, absent for free-form text like `N.C.`
    #[serde(skip)]
    pub token: Option<ChordToken>,
}

impl ChordSymbol {
    /// Read one whitespace-free item; unparseable text is kept as-is
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            token: ChordToken::parse(text).ok(),
        }
    }

    fn transposed(&self, semitones: i32, notation: Notation) -> Self {
        match &self.token {
            Some(token) => {
                let moved = token.transpose(semitones);
                Self {
                    text: moved.render(notation),
                    token: Some(moved),
                }
            }
            None => self.clone(),
        }
    }
}

/// A timed lyric word with optional chords
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub word: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub chords: Vec<ChordSymbol>,
}

impl Entry {
    /// Whether `time` falls within this entry (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Chords joined back into a single line, or `None` without chords
    pub fn chord_text(&self) -> Option<String> {
        if self.chords.is_empty() {
            None
        } else {
            Some(
                self.chords
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
    }
}

/// A named, time-bounded group of entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub order: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub entries: Vec<Entry>,
}

impl Section {
    /// Whether `time` falls within this section (inclusive)
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// Index-based identity of an entry within a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryLocation {
    pub section: usize,
    pub entry: usize,
}

/// Two neighbours whose time ranges overlap
#[derive(Debug, Clone, PartialEq)]
pub enum Overlap {
    /// Section `first` ends after section `second` starts
    Sections { first: usize, second: usize },
    /// Two entries of the same section overlap
    Entries {
        section: usize,
        first: usize,
        second: usize,
    },
}

/// Entry as sent to displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub word: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub chords: Option<String>,
    pub section: String,
}

impl EntryView {
    fn new(section: &Section, entry: &Entry) -> Self {
        Self {
            word: entry.word.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            chords: entry.chord_text(),
            section: section.name.clone(),
        }
    }
}

/// Section header as sent to displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub name: String,
    pub order: i32,
    pub start_time: f64,
    pub end_time: f64,
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
            order: section.order,
            start_time: section.start_time,
            end_time: section.end_time,
        }
    }
}

/// Short description of a loaded song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongSummary {
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    pub key: String,
    pub transpose: i32,
    pub notation: Notation,
    pub duration: f64,
    pub audio_file: Option<String>,
}

/// How a song should be viewed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongOptions {
    /// Semitones to transpose (capo is added on top)
    pub transpose: i32,
    /// Accidental spelling, or the document's preference when `None`
    pub notation: Option<Notation>,
    pub bpm_override: Option<f64>,
    pub key_override: Option<String>,
}

/// A timed script with a transposed view
#[derive(Debug, Clone)]
pub struct Song {
    meta: SongMeta,
    source: Arc<Vec<Section>>,
    sections: Vec<Section>,
    transpose: i32,
    notation: Notation,
    bpm_override: Option<f64>,
    key_override: Option<String>,
}

impl Song {
    /// Build a song from a validated document
    pub fn from_document(document: SongDocument, options: SongOptions) -> Self {
        let source: Vec<Section> = document
            .sections
            .into_iter()
            .map(|section| Section {
                name: section.name,
                order: section.order,
                start_time: section.start_time,
                end_time: section.end_time,
                entries: section
                    .entries
                    .into_iter()
                    .map(|entry| Entry {
                        word: entry.word,
                        start_time: entry.start_time,
                        end_time: entry.end_time,
                        chords: entry
                            .chords
                            .as_deref()
                            .map(|line| line.split_whitespace().map(ChordSymbol::parse).collect())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        let notation = options.notation.unwrap_or(document.meta.prefer_notation);
        let transpose = options.transpose + document.meta.capo;
        let song = Self {
            sections: project_sections(&source, transpose, notation),
            source: Arc::new(source),
            meta: document.meta,
            transpose,
            notation,
            bpm_override: options.bpm_override,
            key_override: options.key_override,
        };

        for overlap in song.overlaps() {
            warn!(title = %song.meta.title, ?overlap, "overlapping time ranges in song");
        }

        song
    }

    /// A new view of the same script with a different transpose and notation
    pub fn project(&self, transpose: i32, notation: Notation) -> Song {
        Song {
            meta: self.meta.clone(),
            source: Arc::clone(&self.source),
            sections: project_sections(&self.source, transpose, notation),
            transpose,
            notation,
            bpm_override: self.bpm_override,
            key_override: self.key_override.clone(),
        }
    }

    /// Same view with a BPM override applied
    pub fn with_bpm(mut self, bpm: Option<f64>) -> Self {
        self.bpm_override = bpm.filter(|b| *b > 0.0);
        self
    }

    /// Same view with a key override applied
    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key_override = key;
        self
    }

    pub fn meta(&self) -> &SongMeta {
        &self.meta
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn artist(&self) -> &str {
        &self.meta.artist
    }

    pub fn duration(&self) -> f64 {
        self.meta.duration
    }

    pub fn audio_file(&self) -> Option<&str> {
        self.meta.audio_file.as_deref()
    }

    /// Projected sections
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections as written in the document
    pub fn source_sections(&self) -> &[Section] {
        &self.source
    }

    /// Effective transpose in semitones
    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Override, then metadata, then 120
    pub fn bpm(&self) -> f64 {
        self.bpm_override
            .or(Some(self.meta.bpm).filter(|b| *b > 0.0))
            .unwrap_or(DEFAULT_BPM)
    }

    /// Override, then metadata, then "C"
    pub fn key(&self) -> &str {
        self.key_override
            .as_deref()
            .or(Some(self.meta.key.as_str()).filter(|k| !k.is_empty()))
            .unwrap_or(DEFAULT_KEY)
    }

    /// The effective key moved by the current transpose
    pub fn transposed_key(&self) -> String {
        transpose_key(self.key(), self.transpose, self.notation)
            .unwrap_or_else(|| self.key().to_string())
    }

    /// First section containing `time`
    pub fn locate_section(&self, time: f64) -> Option<usize> {
        self.sections.iter().position(|s| s.contains(time))
    }

    /// Location of the entry playing at `time`, if any
    pub fn locate_entry(&self, time: f64) -> Option<EntryLocation> {
        let section = self.locate_section(time)?;
        let entry = self.sections[section]
            .entries
            .iter()
            .position(|e| e.contains(time))?;
        Some(EntryLocation { section, entry })
    }

    pub fn section_at(&self, time: f64) -> Option<&Section> {
        self.locate_section(time).map(|i| &self.sections[i])
    }

    /// Entry playing at `time` together with its section
    pub fn entry_at(&self, time: f64) -> Option<(&Section, &Entry)> {
        self.locate_entry(time).and_then(|loc| self.resolve(loc))
    }

    /// Look up a location produced by [`Song::locate_entry`]
    pub fn resolve(&self, location: EntryLocation) -> Option<(&Section, &Entry)> {
        let section = self.sections.get(location.section)?;
        let entry = section.entries.get(location.entry)?;
        Some((section, entry))
    }

    /// Display view of the entry at `location`
    pub fn entry_view(&self, location: EntryLocation) -> Option<EntryView> {
        self.resolve(location)
            .map(|(section, entry)| EntryView::new(section, entry))
    }

    /// Adjacent sections or entries whose time ranges overlap
    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut found = Vec::new();
        for (i, pair) in self.sections.windows(2).enumerate() {
            if pair[0].end_time > pair[1].start_time {
                found.push(Overlap::Sections {
                    first: i,
                    second: i + 1,
                });
            }
        }
        for (s, section) in self.sections.iter().enumerate() {
            for (i, pair) in section.entries.windows(2).enumerate() {
                if pair[0].end_time > pair[1].start_time {
                    found.push(Overlap::Entries {
                        section: s,
                        first: i,
                        second: i + 1,
                    });
                }
            }
        }
        found
    }

    pub fn summary(&self) -> SongSummary {
        SongSummary {
            title: self.meta.title.clone(),
            artist: self.meta.artist.clone(),
            bpm: self.bpm(),
            key: self.key().to_string(),
            transpose: self.transpose,
            notation: self.notation,
            duration: self.meta.duration,
            audio_file: self.meta.audio_file.clone(),
        }
    }
}

fn project_sections(source: &[Section], transpose: i32, notation: Notation) -> Vec<Section> {
    if transpose == 0 {
        return source.to_vec();
    }

    source
        .iter()
        .map(|section| Section {
            name: section.name.clone(),
            order: section.order,
            start_time: section.start_time,
            end_time: section.end_time,
            entries: section
                .entries
                .iter()
                .map(|entry| Entry {
                    word: entry.word.clone(),
                    start_time: entry.start_time,
                    end_time: entry.end_time,
                    chords: entry
                        .chords
                        .iter()
                        .map(|c| c.transposed(transpose, notation))
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
