// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Setlist scheduler with auto-advance.
//!
//! The scheduler owns the [`Queue`] behind an async mutex and runs at most
//! one monitor task per playing song. The monitor polls the position source,
//! and once the song is within the end threshold it waits out the gap
//! (counting it down when enabled) and advances.
//!
//! Replacing a monitor aborts the old task and awaits its end while the
//! queue lock is held, so two monitors never overlap. Each monitor carries
//! an id; when it comes to advance it only proceeds if it is still the
//! registered monitor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::model::{Setlist, SetlistSong};
use super::queue::{Advance, Progress, Queue, SetlistInfo, SetlistState};
use crate::error::{CueError, Result};
use crate::events::{Event, EventSink};
use crate::music::Notation;
use crate::playback::PositionSource;
use crate::song::{Song, SongLoader, SongOptions};

/// Message sent when the last song of a non-looping setlist ends
pub const FINISHED_MESSAGE: &str = "All songs completed!";

/// Scheduler tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// How often the monitor reads the position source
    pub poll_interval: Duration,
    /// Seconds before the end at which a song counts as finished
    pub end_threshold: f64,
    /// Spelling for resolved songs; `None` keeps each song's preference
    pub notation: Option<Notation>,
    /// Seed for the shuffle order; random when `None`
    pub shuffle_seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            end_threshold: 0.5,
            notation: None,
            shuffle_seed: None,
        }
    }
}

struct Monitor {
    id: u64,
    handle: JoinHandle<()>,
}

struct State {
    queue: Queue,
    monitor: Option<Monitor>,
    rng: StdRng,
}

struct Inner {
    state: Mutex<State>,
    sink: Arc<dyn EventSink>,
    position: Arc<dyn PositionSource>,
    loader: Option<Arc<dyn SongLoader>>,
    config: SchedulerConfig,
    active_song: watch::Sender<Option<Arc<Song>>>,
    next_monitor_id: AtomicU64,
}

/// Cloneable handle to a running setlist
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Create a scheduler with nothing loaded
    pub fn new(
        sink: Arc<dyn EventSink>,
        position: Arc<dyn PositionSource>,
        loader: Option<Arc<dyn SongLoader>>,
        config: SchedulerConfig,
    ) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (active_song, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    queue: Queue::new(),
                    monitor: None,
                    rng,
                }),
                sink,
                position,
                loader,
                config,
                active_song,
                next_monitor_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Load a setlist and rewind to its first song
    pub async fn load(&self, setlist: Setlist) {
        let mut state = self.inner.state.lock().await;
        cancel_monitor(&mut state).await;

        info!(name = %setlist.name, songs = setlist.song_count(), "setlist loaded");
        let State { queue, rng, .. } = &mut *state;
        queue.load(setlist, rng);
        self.inner.active_song.send_replace(None);
        self.inner.sink.emit(Event::SetlistUpdate(state.queue.state()));
    }

    /// Play the song at the current index
    pub async fn play_current(&self) {
        let mut state = self.inner.state.lock().await;
        self.inner.play_current_locked(&mut state).await;
    }

    /// Move to the next song, or finish the setlist
    pub async fn advance_to_next(&self) {
        let mut state = self.inner.state.lock().await;
        self.inner.advance_locked(&mut state).await;
    }

    /// Go back one song; does nothing on the first song
    pub async fn go_previous(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.queue.current_index() == 0 || state.queue.current_song().is_none() {
            return false;
        }
        cancel_monitor(&mut state).await;
        state.queue.step_back();
        self.inner.play_current_locked(&mut state).await;
        true
    }

    /// Play the song at logical `index`; out of range does nothing
    pub async fn jump_to(&self, index: usize) -> bool {
        let mut state = self.inner.state.lock().await;
        let in_range = state.queue.setlist().map_or(false, |s| index < s.song_count());
        if !in_range {
            return false;
        }
        cancel_monitor(&mut state).await;
        state.queue.jump_to(index);
        self.inner.play_current_locked(&mut state).await;
        true
    }

    /// Stop playback and auto-advance, keeping the current index
    pub async fn stop(&self) {
        let mut state = self.inner.state.lock().await;
        state.queue.set_playing(false);
        cancel_monitor(&mut state).await;
        debug!(index = state.queue.current_index(), "setlist stopped");
        self.inner.sink.emit(Event::SetlistUpdate(state.queue.state()));
    }

    pub async fn current_song(&self) -> Option<SetlistSong> {
        self.inner.state.lock().await.queue.current_song().cloned()
    }

    pub async fn next_song(&self) -> Option<SetlistSong> {
        self.inner.state.lock().await.queue.next_song().cloned()
    }

    pub async fn previous_song(&self) -> Option<SetlistSong> {
        self.inner.state.lock().await.queue.previous_song().cloned()
    }

    pub async fn progress(&self) -> Progress {
        self.inner.state.lock().await.queue.progress()
    }

    pub async fn state(&self) -> SetlistState {
        self.inner.state.lock().await.queue.state()
    }

    pub async fn info(&self) -> Option<SetlistInfo> {
        self.inner.state.lock().await.queue.info()
    }

    pub async fn is_playing(&self) -> bool {
        self.inner.state.lock().await.queue.is_playing()
    }

    pub async fn current_index(&self) -> usize {
        self.inner.state.lock().await.queue.current_index()
    }

    /// Whether a monitor task is alive
    pub async fn is_monitoring(&self) -> bool {
        let state = self.inner.state.lock().await;
        state
            .monitor
            .as_ref()
            .map_or(false, |m| !m.handle.is_finished())
    }

    /// Receiver for the resolved song currently being played
    pub fn active_song(&self) -> watch::Receiver<Option<Arc<Song>>> {
        self.inner.active_song.subscribe()
    }
}

/// Abort the monitor and wait for it to end
async fn cancel_monitor(state: &mut State) {
    if let Some(monitor) = state.monitor.take() {
        monitor.handle.abort();
        // A cancelled join error is the expected outcome
        let _ = monitor.handle.await;
        debug!(monitor = monitor.id, "monitor cancelled");
    }
}

impl Inner {
    async fn play_current_locked(self: &Arc<Self>, state: &mut State) {
        let Some(entry) = state.queue.current_song().cloned() else {
            return;
        };

        cancel_monitor(state).await;
        state.queue.set_playing(true);
        info!(index = state.queue.current_index(), title = %entry.title, "playing");

        self.publish_song(&entry);
        self.sink.emit(Event::SetlistUpdate(state.queue.state()));

        if state.queue.settings().map_or(false, |s| s.auto_advance) {
            self.spawn_monitor(state);
        }
    }

    async fn advance_locked(self: &Arc<Self>, state: &mut State) {
        cancel_monitor(state).await;

        match state.queue.advance() {
            Advance::Moved(index) => {
                debug!(index, "advanced");
                self.play_current_locked(state).await;
            }
            Advance::Finished => {
                let total_songs = state.queue.setlist().map_or(0, |s| s.song_count());
                info!(total_songs, "setlist finished");
                self.sink.emit(Event::SetlistFinished {
                    message: FINISHED_MESSAGE.to_string(),
                    total_songs,
                });
            }
            Advance::Empty => {}
        }
    }

    /// Advance on behalf of monitor `id`, unless it has been replaced
    async fn advance_from_monitor(self: &Arc<Self>, id: u64) {
        let mut state = self.state.lock().await;
        if state.monitor.as_ref().map(|m| m.id) != Some(id) {
            debug!(monitor = id, "stale monitor, not advancing");
            return;
        }
        // Drop our own handle without aborting; this task is about to finish
        state.monitor = None;
        self.advance_locked(&mut state).await;
    }

    fn spawn_monitor(self: &Arc<Self>, state: &mut State) {
        let id = self.next_monitor_id.fetch_add(1, Ordering::Relaxed);
        let handle = tokio::spawn(run_monitor(Arc::clone(self), id));
        state.monitor = Some(Monitor { id, handle });
        debug!(monitor = id, "monitor started");
    }

    /// Resolve the song and publish it to the active-song channel
    fn publish_song(&self, entry: &SetlistSong) {
        let Some(loader) = &self.loader else {
            self.active_song.send_replace(None);
            return;
        };

        match self.resolve_song(loader.as_ref(), entry) {
            Ok(song) => {
                self.sink.emit(Event::SongLoaded {
                    song: song.summary(),
                });
                self.active_song.send_replace(Some(Arc::new(song)));
            }
            Err(e) => {
                warn!(id = %entry.id, error = %e, "could not load song");
                self.active_song.send_replace(None);
                self.sink
                    .emit(Event::error(format!("Failed to load '{}': {}", entry.id, e)));
            }
        }
    }

    fn resolve_song(&self, loader: &dyn SongLoader, entry: &SetlistSong) -> Result<Song> {
        let document = loader.load_song(&entry.id)?;
        Ok(Song::from_document(
            document,
            SongOptions {
                transpose: entry.transpose,
                notation: self.config.notation,
                bpm_override: entry.bpm.map(f64::from),
                key_override: entry.key.clone(),
            },
        ))
    }

    fn song_ending(&self) -> Result<bool> {
        let duration = self.position.duration()?;
        let position = self.position.position()?;
        if !duration.is_finite() || !position.is_finite() {
            return Err(CueError::resource("position source returned a non-finite value"));
        }
        Ok(duration > 0.0 && position >= duration - self.config.end_threshold)
    }
}

async fn run_monitor(inner: Arc<Inner>, id: u64) {
    loop {
        match inner.song_ending() {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                warn!(monitor = id, error = %e, "position source failed");
                inner
                    .sink
                    .emit(Event::error(format!("Position unavailable: {}", e)));
            }
        }
        tokio::time::sleep(inner.config.poll_interval).await;
    }

    let (gap, countdown, next_song) = {
        let state = inner.state.lock().await;
        if state.monitor.as_ref().map(|m| m.id) != Some(id) {
            return;
        }
        let settings = state.queue.settings().cloned().unwrap_or_default();
        (
            settings.gap_seconds,
            settings.countdown,
            state.queue.next_song().cloned(),
        )
    };
    debug!(monitor = id, gap, "song ending");

    if countdown && gap > 0 {
        // next_song is None on the last song of a non-looping setlist
        for remaining in (1..=gap).rev() {
            inner.sink.emit(Event::GapCountdown {
                remaining,
                next_song: next_song.clone(),
            });
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    } else {
        tokio::time::sleep(Duration::from_secs(u64::from(gap))).await;
    }

    inner.advance_from_monitor(id).await;
}
