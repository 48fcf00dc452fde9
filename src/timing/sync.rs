// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback-position to display-event synchronization.
//!
//! [`SyncEngine::advance`] is fed the player position many times a second.
//! It looks up the entry and section under that position and emits an
//! event only when either one changes, plus a beat event every beat
//! duration. Events are edge-triggered: a stream of samples inside the
//! same word produces a single `EntryChanged`.

use std::sync::Arc;

use tracing::debug;

use super::convert::bpm_to_beat_duration;
use crate::events::{Event, EventSink};
use crate::song::{EntryLocation, EntryView, Section, SectionView, Song};

/// Beats per bar for the beat counter
pub const BEATS_PER_BAR: u8 = 4;

/// Turns playback positions into entry, section and beat events
pub struct SyncEngine {
    song: Option<Arc<Song>>,
    position: f64,
    last_entry: Option<EntryLocation>,
    last_section: Option<usize>,
    beat_index: u8,
    last_beat_time: f64,
    sink: Arc<dyn EventSink>,
}

impl SyncEngine {
    /// Create an engine with no song bound
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            song: None,
            position: 0.0,
            last_entry: None,
            last_section: None,
            beat_index: 0,
            last_beat_time: 0.0,
            sink,
        }
    }

    /// Create an engine bound to `song`
    pub fn with_song(song: Arc<Song>, sink: Arc<dyn EventSink>) -> Self {
        let mut engine = Self::new(sink);
        engine.song = Some(song);
        engine
    }

    /// Replace the song and start over from zero
    pub fn bind(&mut self, song: Option<Arc<Song>>) {
        if let Some(song) = &song {
            debug!(title = song.title(), "sync engine bound");
        }
        self.song = song;
        self.reset();
    }

    pub fn song(&self) -> Option<&Arc<Song>> {
        self.song.as_ref()
    }

    /// Feed a new playback position
    pub fn advance(&mut self, position: f64) {
        self.position = position;
        let Some(song) = self.song.clone() else {
            return;
        };

        let entry = song.locate_entry(position);
        if entry != self.last_entry {
            self.last_entry = entry;
            if let Some(view) = entry.and_then(|loc| song.entry_view(loc)) {
                self.sink.emit(Event::EntryChanged { entry: view });
            }
        }

        let section = song.locate_section(position);
        if section != self.last_section {
            self.last_section = section;
            if let Some(s) = section.and_then(|i| song.sections().get(i)) {
                self.sink.emit(Event::SectionChanged {
                    section: SectionView::from(s),
                });
            }
        }

        self.update_beat(position, song.bpm());
    }

    fn update_beat(&mut self, position: f64, bpm: f64) {
        // Seeking backwards restarts the beat grid from the new position
        if position < self.last_beat_time {
            self.last_beat_time = position;
            return;
        }

        if position - self.last_beat_time >= bpm_to_beat_duration(bpm) {
            self.last_beat_time = position;
            self.beat_index = (self.beat_index + 1) % BEATS_PER_BAR;
            self.sink.emit(Event::Beat {
                beat: self.beat_index + 1,
            });
        }
    }

    /// Entries starting within `lookahead` seconds of the current position
    pub fn upcoming(&self, lookahead: f64) -> Vec<EntryView> {
        let Some(song) = &self.song else {
            return Vec::new();
        };
        let from = self.position;
        let until = from + lookahead;

        let mut upcoming = Vec::new();
        for section in song.sections() {
            if section.start_time > until {
                break;
            }
            if section.end_time < from {
                continue;
            }
            upcoming.extend(
                section
                    .entries
                    .iter()
                    .filter(|e| from <= e.start_time && e.start_time <= until)
                    .map(|e| EntryView {
                        word: e.word.clone(),
                        start_time: e.start_time,
                        end_time: e.end_time,
                        chords: e.chord_text(),
                        section: section.name.clone(),
                    }),
            );
        }
        upcoming
    }

    /// Forget transition state and position; keeps the song
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.last_entry = None;
        self.last_section = None;
        self.beat_index = 0;
        self.last_beat_time = 0.0;
    }

    pub fn current_entry(&self) -> Option<EntryView> {
        let song = self.song.as_ref()?;
        song.entry_view(self.last_entry?)
    }

    pub fn current_section(&self) -> Option<&Section> {
        let song = self.song.as_ref()?;
        song.sections().get(self.last_section?)
    }

    /// Beat within the bar, 1..=4
    pub fn current_beat(&self) -> u8 {
        self.beat_index + 1
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}
