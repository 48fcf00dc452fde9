// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Events sent to displays and the sinks that deliver them.

pub mod broadcaster;

pub use broadcaster::{Broadcaster, Subscribers, SubscriptionToken};

use serde::Serialize;

use crate::error::Result;
use crate::setlist::{SetlistSong, SetlistState};
use crate::song::{EntryView, SectionView, SongSummary};

/// Everything the engine tells the outside world
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new lyric entry became current
    EntryChanged { entry: EntryView },
    /// A new section became current
    SectionChanged { section: SectionView },
    /// Beat within the bar, 1..=4
    Beat { beat: u8 },
    /// The scheduler resolved and published a song
    SongLoaded { song: SongSummary },
    /// Setlist position or play state changed
    SetlistUpdate(SetlistState),
    /// Seconds left before the next song starts
    GapCountdown {
        remaining: u32,
        next_song: Option<SetlistSong>,
    },
    /// Last song finished and the setlist does not loop
    SetlistFinished { message: String, total_songs: usize },
    /// A non-fatal failure
    Error { message: String },
}

impl Event {
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    /// Wire name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Event::EntryChanged { .. } => "entry_changed",
            Event::SectionChanged { .. } => "section_changed",
            Event::Beat { .. } => "beat",
            Event::SongLoaded { .. } => "song_loaded",
            Event::SetlistUpdate(_) => "setlist_update",
            Event::GapCountdown { .. } => "gap_countdown",
            Event::SetlistFinished { .. } => "setlist_finished",
            Event::Error { .. } => "error",
        }
    }

    /// Serialize as a single JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Receives events; delivery is fire-and-forget and must not block
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}
