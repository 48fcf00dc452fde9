// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for CUE.
//!
//! This module provides pitch classes with sharp/flat spellings, chord
//! tokens, and transposition of chord annotations and keys.

pub mod chord;
pub mod pitch;
pub mod transpose;

pub use chord::{ChordParseError, ChordToken};
pub use pitch::{Notation, PitchClass, FLAT_NAMES, SHARP_NAMES};
pub use transpose::{semitones_between_keys, transpose_chord, transpose_chord_line, transpose_key};
