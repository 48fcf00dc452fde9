// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord tokens: parsing, transposition, and rendering.
//!
//! A chord is a root pitch, an opaque quality string (`m`, `maj7`,
//! `m7b5`, `sus4`, ...) and an optional slash bass. Only the pitches move
//! when transposing; the quality is carried through untouched, so any
//! extension a chart author writes survives a key change.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::pitch::{Notation, PitchClass};

/// Reasons a chord token could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    /// Nothing to parse
    #[error("Empty chord")]
    Empty,
    /// First character is not a note letter A-G
    #[error("Invalid chord root in '{0}'")]
    InvalidRoot(String),
    /// Text after `/` is not a single note name
    #[error("Invalid bass note in '{0}'")]
    InvalidBass(String),
}

/// A parsed chord symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordToken {
    root: PitchClass,
    quality: String,
    bass: Option<PitchClass>,
}

impl ChordToken {
    /// Create a chord from its parts
    pub fn new(root: PitchClass, quality: impl Into<String>, bass: Option<PitchClass>) -> Self {
        Self {
            root,
            quality: quality.into(),
            bass,
        }
    }

    /// Parse a chord such as `"C#m7b5"`, `"G/B"`, or `"ebmaj7"`.
    ///
    /// Grammar: `root [#|b] [quality] [/bass [#|b]]`. Root, accidentals and
    /// bass are case-insensitive; the quality is everything between the root
    /// and the optional slash, kept verbatim.
    pub fn parse(text: &str) -> Result<Self, ChordParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let (root, used) = PitchClass::parse_prefix(text)
            .ok_or_else(|| ChordParseError::InvalidRoot(text.to_string()))?;
        let rest = &text[used..];

        let (quality, bass) = match rest.split_once('/') {
            None => (rest, None),
            Some((quality, bass_text)) => {
                let bass = PitchClass::parse(bass_text)
                    .filter(|_| bass_text.trim() == bass_text)
                    .ok_or_else(|| ChordParseError::InvalidBass(text.to_string()))?;
                (quality, Some(bass))
            }
        };

        Ok(Self::new(root, quality, bass))
    }

    /// Root pitch
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Quality/extension text
    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// Slash bass, if any
    pub fn bass(&self) -> Option<PitchClass> {
        self.bass
    }

    /// Return a copy moved by `semitones`; quality is untouched
    pub fn transpose(&self, semitones: i32) -> Self {
        Self {
            root: self.root.transpose(semitones),
            quality: self.quality.clone(),
            bass: self.bass.map(|b| b.transpose(semitones)),
        }
    }

    /// Render with the given accidental spelling
    pub fn render(&self, notation: Notation) -> String {
        let mut out = String::with_capacity(self.quality.len() + 5);
        out.push_str(self.root.name(notation));
        out.push_str(&self.quality);
        if let Some(bass) = self.bass {
            out.push('/');
            out.push_str(bass.name(notation));
        }
        out
    }
}

impl FromStr for ChordToken {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordToken::parse(s)
    }
}

impl fmt::Display for ChordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Notation::Sharp))
    }
}
