// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and their spellings.
//!
//! A pitch class is one of the twelve semitones of the octave, stored
//! as `0..=11` with C at zero. Names come from two fixed tables so the
//! same pitch can be displayed as `C#` or `Db` depending on the
//! performer's preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sharp spellings indexed by pitch class
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings indexed by pitch class
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Accidental spelling preference for rendered chords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// C#, D#, F#, G#, A#
    #[default]
    Sharp,
    /// Db, Eb, Gb, Ab, Bb
    Flat,
}

impl Notation {
    /// Whether sharps are preferred
    pub fn prefers_sharp(self) -> bool {
        matches!(self, Notation::Sharp)
    }

    /// The name table for this spelling
    pub fn names(self) -> &'static [&'static str; 12] {
        match self {
            Notation::Sharp => &SHARP_NAMES,
            Notation::Flat => &FLAT_NAMES,
        }
    }
}

impl FromStr for Notation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sharp" | "sharps" | "#" => Ok(Notation::Sharp),
            "flat" | "flats" | "b" => Ok(Notation::Flat),
            other => Err(format!("Unknown notation: {}", other)),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Sharp => write!(f, "sharp"),
            Notation::Flat => write!(f, "flat"),
        }
    }
}

/// One of the twelve semitones, normalized to `0..=11`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create a pitch class from any integer, wrapping into `0..=11`
    pub fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    /// Semitones above C
    pub fn value(self) -> u8 {
        self.0
    }

    /// Move by a number of semitones (either direction)
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Ascending interval to another pitch class
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }

    /// Spelled name for the given notation
    pub fn name(self, notation: Notation) -> &'static str {
        notation.names()[self.0 as usize]
    }

    /// Parse a note letter with an optional accidental from the start of `text`.
    ///
    /// Returns the pitch class and the number of bytes consumed. Letters and
    /// accidentals are case-insensitive, so `"bb"` reads as B-flat.
    pub fn parse_prefix(text: &str) -> Option<(Self, usize)> {
        let mut chars = text.chars();
        let base = match chars.next()?.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        match chars.next() {
            Some('#') => Some((PitchClass::new(base + 1), 2)),
            Some('b') | Some('B') => Some((PitchClass::new(base - 1), 2)),
            _ => Some((PitchClass::new(base), 1)),
        }
    }

    /// Parse a complete note name such as `"F#"` or `"Eb"`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match Self::parse_prefix(text) {
            Some((pitch, used)) if used == text.len() => Some(pitch),
            _ => None,
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(Notation::Sharp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(PitchClass::new(12).value(), 0);
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(-13).value(), 11);
        assert_eq!(PitchClass::new(25).value(), 1);
    }

    #[test]
    fn test_names() {
        let cs = PitchClass::new(1);
        assert_eq!(cs.name(Notation::Sharp), "C#");
        assert_eq!(cs.name(Notation::Flat), "Db");
        assert_eq!(PitchClass::new(4).name(Notation::Flat), "E");
        assert_eq!(cs.to_string(), "C#");
    }

    #[test]
    fn test_parse() {
        assert_eq!(PitchClass::parse("C"), Some(PitchClass::new(0)));
        assert_eq!(PitchClass::parse("c#"), Some(PitchClass::new(1)));
        assert_eq!(PitchClass::parse("Db"), Some(PitchClass::new(1)));
        assert_eq!(PitchClass::parse("bb"), Some(PitchClass::new(10)));
        assert_eq!(PitchClass::parse("Cb"), Some(PitchClass::new(11)));
        assert_eq!(PitchClass::parse("E#"), Some(PitchClass::new(5)));
        assert_eq!(PitchClass::parse("H"), None);
        assert_eq!(PitchClass::parse("C#m"), None);
        assert_eq!(PitchClass::parse(""), None);
    }

    #[test]
    fn test_parse_prefix_consumes_accidental() {
        assert_eq!(PitchClass::parse_prefix("F#m7"), Some((PitchClass::new(6), 2)));
        assert_eq!(PitchClass::parse_prefix("Am"), Some((PitchClass::new(9), 1)));
        assert_eq!(PitchClass::parse_prefix("xyz"), None);
    }

    #[test]
    fn test_interval() {
        let c = PitchClass::new(0);
        let g = PitchClass::new(7);
        assert_eq!(c.interval_to(g), 7);
        assert_eq!(g.interval_to(c), 5);
    }

    #[test]
    fn test_notation_from_str() {
        assert_eq!("flat".parse::<Notation>(), Ok(Notation::Flat));
        assert_eq!("Sharp".parse::<Notation>(), Ok(Notation::Sharp));
        assert!("double".parse::<Notation>().is_err());
        assert!(Notation::default().prefers_sharp());
    }
}
