// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! CUE - live lyrics and chord cue engine.
//!
//! Follows a playing song's position and tells displays which word, chord
//! and section is current, and steps through a setlist with timed gaps
//! between songs.

pub mod config;
pub mod error;
pub mod events;
pub mod music;
pub mod playback;
pub mod session;
pub mod setlist;
pub mod song;
pub mod timing;

pub use error::{CueError, Result};
