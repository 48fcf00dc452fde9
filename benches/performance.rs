// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for CUE
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Chord parsing and line transposition
//! - Song projection to a new transpose
//! - Entry lookup by time
//! - Sync engine throughput at display sample rates

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cue::events::{Event, EventSink};
use cue::music::{transpose_chord_line, ChordToken, Notation};
use cue::song::{EntryDoc, SectionDoc, Song, SongDocument, SongOptions};
use cue::timing::SyncEngine;

struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, event: Event) {
        black_box(event);
    }
}

/// A song with `sections` sections of 16 one-second entries each
fn build_song(sections: usize) -> Song {
    let mut doc = SongDocument::empty("Bench", "Bench", 120.0, "C");
    let chords = ["C", "Am7", "F/A", "G7sus4", "Ebmaj7", "Bb/D", "N.C.", "C#m7b5"];

    for s in 0..sections {
        let start = (s * 16) as f64;
        doc.sections.push(SectionDoc {
            name: format!("Section {}", s + 1),
            order: s as i32,
            start_time: start,
            end_time: start + 16.0,
            entries: (0..16)
                .map(|e| EntryDoc {
                    word: Some(format!("word{}", e)),
                    start_time: start + e as f64,
                    end_time: start + e as f64 + 1.0,
                    chords: Some(chords[e % chords.len()].to_string()),
                })
                .collect(),
        });
    }
    doc.meta.duration = (sections * 16) as f64;
    Song::from_document(doc, SongOptions::default())
}

fn bench_chord_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("chords");

    group.bench_function("parse", |b| {
        b.iter(|| ChordToken::parse(black_box("C#m7b5/G#")))
    });

    let line = "C G/B Am7 Fmaj7 Dm7 G7sus4 N.C. Ebmaj7 Bb/D C#m7b5";
    group.bench_function("transpose_line", |b| {
        b.iter(|| transpose_chord_line(black_box(line), black_box(5), Notation::Flat))
    });

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    for sections in [4, 16, 64].iter() {
        let song = build_song(*sections);
        group.bench_with_input(BenchmarkId::new("transpose", sections), &song, |b, song| {
            b.iter(|| song.project(black_box(3), Notation::Sharp))
        });
    }

    group.finish();
}

fn bench_entry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_at");

    for sections in [4, 16, 64].iter() {
        let song = build_song(*sections);
        let end = song.duration();
        group.bench_with_input(BenchmarkId::new("sweep", sections), &song, |b, song| {
            b.iter(|| {
                let mut found = 0;
                let mut t = 0.0;
                while t < end {
                    if song.locate_entry(black_box(t)).is_some() {
                        found += 1;
                    }
                    t += 0.5;
                }
                black_box(found)
            })
        });
    }

    group.finish();
}

fn bench_sync_advance(c: &mut Criterion) {
    let song = Arc::new(build_song(16));
    let end = song.duration();

    // 20 Hz samples across the whole song
    c.bench_function("sync_advance_20hz", |b| {
        b.iter(|| {
            let mut engine = SyncEngine::with_song(Arc::clone(&song), Arc::new(NullSink));
            let mut t = 0.0;
            while t < end {
                engine.advance(black_box(t));
                t += 0.05;
            }
            black_box(engine.current_beat())
        })
    });
}

criterion_group!(
    benches,
    bench_chord_parsing,
    bench_projection,
    bench_entry_lookup,
    bench_sync_advance,
);

criterion_main!(benches);
