// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transposition helpers for chord annotations and keys.

use super::chord::ChordToken;
use super::pitch::Notation;

/// Transpose a single chord, or `None` if `text` is not a chord
pub fn transpose_chord(text: &str, semitones: i32, notation: Notation) -> Option<String> {
    ChordToken::parse(text)
        .ok()
        .map(|chord| chord.transpose(semitones).render(notation))
}

/// Transpose a whitespace-separated chord line such as `"Am7 G F"`.
///
/// Tokens that do not parse (`N.C.`, `|`, `x2`, ...) are passed through
/// unchanged so free-form annotations survive.
pub fn transpose_chord_line(line: &str, semitones: i32, notation: Notation) -> String {
    line.split_whitespace()
        .map(|token| {
            transpose_chord(token, semitones, notation).unwrap_or_else(|| token.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Transpose a key name. Keys follow chord rules, so `"Am"` stays minor.
pub fn transpose_key(key: &str, semitones: i32, notation: Notation) -> Option<String> {
    transpose_chord(key, semitones, notation)
}

/// Smallest signed distance in semitones from one key to another (`-6..=6`)
pub fn semitones_between_keys(from: &str, to: &str) -> Option<i32> {
    let from = ChordToken::parse(from).ok()?;
    let to = ChordToken::parse(to).ok()?;

    let mut diff = to.root().value() as i32 - from.root().value() as i32;
    if diff > 6 {
        diff -= 12;
    } else if diff < -6 {
        diff += 12;
    }
    Some(diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_chord() {
        assert_eq!(transpose_chord("C", 2, Notation::Sharp), Some("D".to_string()));
        assert_eq!(transpose_chord("Am7", 3, Notation::Sharp), Some("Cm7".to_string()));
        assert_eq!(transpose_chord("C", 1, Notation::Flat), Some("Db".to_string()));
        assert_eq!(transpose_chord("X7", 1, Notation::Sharp), None);
    }

    #[test]
    fn test_transpose_chord_line() {
        assert_eq!(
            transpose_chord_line("Am7 G F", 2, Notation::Sharp),
            "Bm7 A G"
        );
        assert_eq!(
            transpose_chord_line("C  N.C. | G/B", 1, Notation::Flat),
            "Db N.C. | Ab/C"
        );
        assert_eq!(transpose_chord_line("", 4, Notation::Sharp), "");
    }

    #[test]
    fn test_transpose_key() {
        assert_eq!(transpose_key("Am", 2, Notation::Sharp), Some("Bm".to_string()));
        assert_eq!(transpose_key("F#", -1, Notation::Sharp), Some("F".to_string()));
    }

    #[test]
    fn test_semitones_between_keys() {
        assert_eq!(semitones_between_keys("C", "D"), Some(2));
        assert_eq!(semitones_between_keys("C", "A"), Some(-3));
        assert_eq!(semitones_between_keys("A", "C"), Some(3));
        assert_eq!(semitones_between_keys("C", "F#"), Some(6));
        assert_eq!(semitones_between_keys("B", "C"), Some(1));
        assert_eq!(semitones_between_keys("C", "B"), Some(-1));
        assert_eq!(semitones_between_keys("C", "nope"), None);
    }
}
