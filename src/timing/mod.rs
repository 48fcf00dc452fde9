// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! Tempo conversions and the engine that turns playback position into
//! display events.

pub mod convert;
pub mod sync;

pub use convert::{
    beat_duration_to_bpm, beats_to_time, bpm_to_beat_duration, format_time, format_time_ms,
    time_to_beats, time_to_measures,
};
pub use sync::{SyncEngine, BEATS_PER_BAR};
