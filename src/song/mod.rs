// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Songs: documents on disk and the timed, transposable script built from them.

pub mod document;
pub mod library;
pub mod model;

pub use document::{EntryDoc, SectionDoc, SongDocument, SongMeta, FORMAT_VERSION};
pub use library::{SongLibrary, SongListing, SongLoader};
pub use model::{
    ChordSymbol, Entry, EntryLocation, EntryView, Overlap, Section, SectionView, Song,
    SongOptions, SongSummary,
};
