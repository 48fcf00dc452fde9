// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tempo and time conversions.

/// Seconds per beat at `bpm`
pub fn bpm_to_beat_duration(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Tempo for a beat lasting `seconds`, rounded down
pub fn beat_duration_to_bpm(seconds: f64) -> u32 {
    (60.0 / seconds) as u32
}

pub fn time_to_beats(seconds: f64, bpm: f64) -> f64 {
    seconds / bpm_to_beat_duration(bpm)
}

pub fn beats_to_time(beats: f64, bpm: f64) -> f64 {
    beats * bpm_to_beat_duration(bpm)
}

/// Bars elapsed after `seconds` with `beats_per_bar` beats per bar
pub fn time_to_measures(seconds: f64, bpm: f64, beats_per_bar: u32) -> f64 {
    time_to_beats(seconds, bpm) / beats_per_bar.max(1) as f64
}

/// `MM:SS`
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0) as u64;
    format!("{:02}:{:02}", minutes, secs)
}

/// `MM:SS.mmm`
pub fn format_time_ms(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    format!("{:02}:{:06.3}", minutes, seconds % 60.0)
}
