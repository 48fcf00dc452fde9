// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback position within a setlist.
//!
//! The queue tracks a logical index into the playback order. Without
//! shuffle the playback order is the setlist order; with shuffle it is a
//! permutation drawn once when the setlist is loaded and kept across
//! loop-wraps.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::model::{Setlist, SetlistSettings, SetlistSong};

/// Result of moving to the next song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Now at this logical index
    Moved(usize),
    /// Past the last song and not looping
    Finished,
    /// Nothing loaded, or the setlist has no songs
    Empty,
}

/// How far through the setlist playback is
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Progress {
    pub current_index: usize,
    pub total_songs: usize,
    /// 0..=100, rounded down
    pub percent: u32,
    pub elapsed_seconds: f64,
    pub total_seconds: f64,
    pub remaining_songs: usize,
}

/// Snapshot sent with every setlist update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetlistState {
    pub setlist_name: Option<String>,
    pub current_song: Option<SetlistSong>,
    pub next_song: Option<SetlistSong>,
    pub progress: Progress,
    pub settings: Option<SetlistSettings>,
    pub is_playing: bool,
}

/// Complete description of the loaded setlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetlistInfo {
    pub name: String,
    pub description: Option<String>,
    pub song_count: usize,
    pub total_duration: f64,
    pub estimated_time: String,
    pub settings: SetlistSettings,
    pub songs: Vec<SetlistSong>,
    pub current_index: usize,
    pub is_playing: bool,
}

/// Setlist plus the current position in its playback order
#[derive(Debug, Clone, Default)]
pub struct Queue {
    setlist: Option<Setlist>,
    current_index: usize,
    shuffle_order: Option<Vec<usize>>,
    is_playing: bool,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the setlist and rewind to the first song
    pub fn load<R: Rng + ?Sized>(&mut self, setlist: Setlist, rng: &mut R) {
        self.shuffle_order = if setlist.settings.shuffle {
            let mut order: Vec<usize> = (0..setlist.songs.len()).collect();
            order.shuffle(rng);
            Some(order)
        } else {
            None
        };
        self.setlist = Some(setlist);
        self.current_index = 0;
        self.is_playing = false;
    }

    pub fn setlist(&self) -> Option<&Setlist> {
        self.setlist.as_ref()
    }

    pub fn settings(&self) -> Option<&SetlistSettings> {
        self.setlist.as_ref().map(|s| &s.settings)
    }

    pub fn shuffle_order(&self) -> Option<&[usize]> {
        self.shuffle_order.as_deref()
    }

    /// Logical index into the playback order
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    fn len(&self) -> usize {
        self.setlist.as_ref().map_or(0, |s| s.songs.len())
    }

    /// Position in the setlist's song list for a logical index
    pub fn resolve_actual(&self, logical: usize) -> usize {
        match &self.shuffle_order {
            Some(order) => order.get(logical).copied().unwrap_or(logical),
            None => logical,
        }
    }

    fn song_at(&self, logical: usize) -> Option<&SetlistSong> {
        let setlist = self.setlist.as_ref()?;
        setlist.songs.get(self.resolve_actual(logical))
    }

    pub fn current_song(&self) -> Option<&SetlistSong> {
        self.song_at(self.current_index)
    }

    /// Song after the current one, wrapping to the first when looping
    pub fn next_song(&self) -> Option<&SetlistSong> {
        let setlist = self.setlist.as_ref()?;
        let next = self.current_index + 1;
        if next < setlist.songs.len() {
            self.song_at(next)
        } else if setlist.settings.loop_ {
            self.song_at(0)
        } else {
            None
        }
    }

    /// Song before the current one; never wraps
    pub fn previous_song(&self) -> Option<&SetlistSong> {
        if self.current_index == 0 {
            return None;
        }
        self.song_at(self.current_index - 1)
    }

    /// Move to the next song. Finishing stops playback and keeps the index
    /// on the last song.
    pub fn advance(&mut self) -> Advance {
        let Some(setlist) = &self.setlist else {
            return Advance::Empty;
        };
        if setlist.songs.is_empty() {
            return Advance::Empty;
        }

        let next = self.current_index + 1;
        if next < setlist.songs.len() {
            self.current_index = next;
            Advance::Moved(next)
        } else if setlist.settings.loop_ {
            self.current_index = 0;
            Advance::Moved(0)
        } else {
            self.is_playing = false;
            Advance::Finished
        }
    }

    /// Jump to a logical index; out of range leaves the queue untouched
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    /// Step back one song; false at the first song
    pub fn step_back(&mut self) -> bool {
        if self.current_index > 0 && self.len() > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn progress(&self) -> Progress {
        let Some(setlist) = &self.setlist else {
            return Progress::default();
        };

        let total = setlist.songs.len();
        let played: f64 = (0..self.current_index.min(total))
            .filter_map(|i| self.song_at(i))
            .map(|s| s.duration)
            .sum();
        let gaps = self.current_index as f64 * setlist.settings.gap_seconds as f64;

        Progress {
            current_index: self.current_index,
            total_songs: total,
            percent: if total == 0 {
                0
            } else {
                (self.current_index * 100 / total) as u32
            },
            elapsed_seconds: played + gaps,
            total_seconds: setlist.total_duration(),
            remaining_songs: total.saturating_sub(self.current_index + 1),
        }
    }

    pub fn state(&self) -> SetlistState {
        SetlistState {
            setlist_name: self.setlist.as_ref().map(|s| s.name.clone()),
            current_song: self.current_song().cloned(),
            next_song: self.next_song().cloned(),
            progress: self.progress(),
            settings: self.settings().cloned(),
            is_playing: self.is_playing,
        }
    }

    pub fn info(&self) -> Option<SetlistInfo> {
        let setlist = self.setlist.as_ref()?;
        Some(SetlistInfo {
            name: setlist.name.clone(),
            description: setlist.description.clone(),
            song_count: setlist.song_count(),
            total_duration: setlist.total_duration(),
            estimated_time: setlist.estimated_time(),
            settings: setlist.settings.clone(),
            songs: setlist.songs.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
        })
    }
}
