// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for CUE
//!
//! These tests verify that multiple components work together correctly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;

use cue::config::CueConfig;
use cue::events::{Broadcaster, Event, EventSink};
use cue::music::{transpose_chord_line, ChordToken, Notation, PitchClass};
use cue::playback::SharedPosition;
use cue::session::Session;
use cue::setlist::{Setlist, SetlistSong};
use cue::song::{Song, SongDocument, SongLibrary, SongLoader, SongOptions};
use cue::timing::SyncEngine;

const SONG_JSON: &str = r#"{
  "version": "1.0.0",
  "meta": {
    "title": "Wonderwall",
    "artist": "Oasis",
    "bpm": 87,
    "key": "F#m",
    "duration": 30,
    "prefer_notation": "sharp"
  },
  "sections": [
    {
      "name": "Intro",
      "order": 0,
      "start_time": 0,
      "end_time": 10,
      "entries": [
        { "start_time": 0, "end_time": 5, "chords": "Em7 G" },
        { "start_time": 5, "end_time": 10, "chords": "Dsus4 A7sus4" }
      ]
    },
    {
      "name": "Verse",
      "order": 1,
      "start_time": 10,
      "end_time": 30,
      "entries": [
        { "word": "Today", "start_time": 10, "end_time": 12, "chords": "Em7" },
        { "word": "is", "start_time": 12, "end_time": 13 },
        { "word": "gonna", "start_time": 13, "end_time": 15, "chords": "G" },
        { "word": "be", "start_time": 15, "end_time": 30, "chords": "Dsus4/F#" }
      ]
    }
  ]
}"#;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl EventSink for Recorder {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

fn entry_chords(events: &[Event]) -> Vec<Option<String>> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::EntryChanged { entry } => Some(entry.chords.clone()),
            _ => None,
        })
        .collect()
}

/// Document on disk through song projection and the sync engine
#[test]
fn test_document_to_sync_events() {
    let dir = tempdir().unwrap();
    let library = SongLibrary::new(dir.path());
    std::fs::write(dir.path().join("wonderwall.mlc"), SONG_JSON).unwrap();

    let doc = library.load_song("wonderwall").unwrap();
    let song = Song::from_document(
        doc,
        SongOptions {
            transpose: 2,
            ..Default::default()
        },
    );
    assert_eq!(song.transposed_key(), "G#m");

    let recorder = Arc::new(Recorder::default());
    let mut engine = SyncEngine::with_song(Arc::new(song), recorder.clone());

    let mut t = 0.0;
    while t < 16.0 {
        engine.advance(t);
        t += 0.05;
    }

    let events = recorder.events.lock().unwrap();
    assert_eq!(
        entry_chords(&events),
        vec![
            Some("F#m7 A".to_string()),
            Some("Esus4 B7sus4".to_string()),
            Some("F#m7".to_string()),
            None,
            Some("A".to_string()),
            Some("Esus4/G#".to_string()),
        ]
    );

    let sections: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::SectionChanged { section } => Some(section.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sections, vec!["Intro", "Verse"]);
}

/// Transposing and rendering stays consistent across the chord layer
#[test]
fn test_chord_transposition_group_action() {
    let chords = ["C", "C#m7b5", "Ebmaj7", "G/B", "Bbsus4/F", "F#dim"];

    for text in chords {
        let chord = ChordToken::parse(text).unwrap();
        for m in -12..=12 {
            for n in -12..=12 {
                let stepwise = chord.transpose(m).transpose(n);
                let direct = chord.transpose((m + n).rem_euclid(12));
                assert_eq!(stepwise, direct, "{} by {} then {}", text, m, n);
            }
        }
        assert_eq!(chord.transpose(12), chord);
    }

    assert_eq!(
        transpose_chord_line("C  G/B N.C. Am", 5, Notation::Flat),
        "F C/E N.C. Dm"
    );
    assert_eq!(PitchClass::parse("Cb").map(|p| p.value()), Some(11));
}

/// Invalid documents are rejected with the field that is missing
#[test]
fn test_invalid_document_reports_field() {
    let broken = SONG_JSON.replace("\"bpm\": 87,", "");
    let err = SongDocument::from_json(&broken).unwrap_err();
    assert!(err.to_string().contains("bpm"), "{}", err);
}

/// Broadcaster keeps delivering to healthy observers
#[test]
fn test_broadcaster_isolates_failing_observer() {
    let broadcaster = Broadcaster::new();
    let seen = Arc::new(Mutex::new(0));

    broadcaster.subscribe(|_| panic!("display crashed"));
    let counter = Arc::clone(&seen);
    broadcaster.subscribe(move |_| {
        *counter.lock().unwrap() += 1;
        Ok(())
    });
    let mut rx = broadcaster.channel();

    for beat in 1..=4 {
        broadcaster.emit(Event::Beat { beat });
    }

    assert_eq!(*seen.lock().unwrap(), 4);
    assert_eq!(broadcaster.subscriber_count(), 2);
    assert_eq!(rx.try_recv().unwrap(), Event::Beat { beat: 1 });
}

fn write_library(dir: &std::path::Path, ids: &[&str]) {
    let library = SongLibrary::new(dir);
    for id in ids {
        let mut doc = SongDocument::from_json(SONG_JSON).unwrap();
        doc.meta.title = id.to_string();
        library.save(id, &doc).unwrap();
    }
}

/// A whole setlist played through a session with auto-advance
#[tokio::test(start_paused = true)]
async fn test_session_plays_setlist_to_the_end() {
    let dir = tempdir().unwrap();
    write_library(dir.path(), &["first", "second"]);

    let position = Arc::new(SharedPosition::new());
    position.set_duration(30.0);
    position.set_position(29.8);

    let loader: Arc<dyn SongLoader> = Arc::new(SongLibrary::new(dir.path()));
    let session = Session::start(position.clone(), Some(loader), &CueConfig::default());
    let mut events = session.events();

    let mut setlist = Setlist::new("Integration");
    setlist.settings.gap_seconds = 2;
    setlist.add_song(SetlistSong::new("first", "First", "Oasis", 30.0), None);
    setlist.add_song(SetlistSong::new("second", "Second", "Oasis", 30.0), None);

    session.scheduler().load(setlist).await;
    session.scheduler().play_current().await;

    let mut loaded = Vec::new();
    let mut countdown = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(60), events.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            Event::SongLoaded { song } => loaded.push(song.title),
            Event::GapCountdown {
                remaining,
                next_song,
            } => countdown.push((remaining, next_song.map(|s| s.id))),
            Event::SetlistFinished { total_songs, .. } => {
                assert_eq!(total_songs, 2);
                break;
            }
            _ => {}
        }
    }

    assert_eq!(loaded, vec!["first", "second"]);
    // The last song still counts down its gap, with nothing to announce
    let second = Some("second".to_string());
    assert_eq!(
        countdown,
        vec![(2, second.clone()), (1, second), (2, None), (1, None)]
    );
    assert!(!session.scheduler().is_playing().await);

    session.shutdown().await;
}

/// Scheduler and setlist files agree on the wire format
#[tokio::test]
async fn test_setlist_file_round_trip_through_scheduler() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gig.yaml");
    std::fs::write(
        &path,
        "name: Gig\nsettings:\n  auto_advance: false\n  gap_seconds: 10\nsongs:\n  - id: a\n    title: A\n    artist: X\n    duration: 100\n  - id: b\n    title: B\n    artist: X\n    duration: 50\n",
    )
    .unwrap();
    let setlist = Setlist::load(&path).unwrap();

    let position = Arc::new(SharedPosition::new());
    let session = Session::start(position, None, &CueConfig::default());
    session.scheduler().load(setlist).await;
    session.scheduler().jump_to(1).await;

    let info = session.scheduler().info().await.unwrap();
    assert_eq!(info.total_duration, 160.0);
    assert_eq!(info.current_index, 1);
    assert!(info.is_playing);

    let state = session.scheduler().state().await;
    let json = Event::SetlistUpdate(state).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "setlist_update");
    assert_eq!(value["current_song"]["id"], "b");
    assert_eq!(value["progress"]["elapsed_seconds"], 110.0);
    assert!(value["next_song"].is_null());

    session.shutdown().await;
}
