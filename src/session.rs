// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A running cue engine: scheduler, sync engine and event fan-out wired together.
//!
//! The position pump samples the player and publishes to the feed, which
//! drives the sync engine. A follower task rebinds the sync engine every time
//! the scheduler publishes a new active song.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::CueConfig;
use crate::events::{Broadcaster, Event, SubscriptionToken};
use crate::playback::{interval_from_ms, spawn_pump, PositionFeed, PositionSource};
use crate::setlist::Scheduler;
use crate::song::{EntryView, SongLoader};
use crate::timing::SyncEngine;

/// Sync engine shared between the feed callback and callers
pub type SharedSync = Arc<Mutex<SyncEngine>>;

pub struct Session {
    broadcaster: Arc<Broadcaster>,
    feed: Arc<PositionFeed>,
    sync: SharedSync,
    scheduler: Scheduler,
    lookahead: f64,
    feed_token: SubscriptionToken,
    pump: JoinHandle<()>,
    follower: JoinHandle<()>,
}

impl Session {
    /// Build and start every part. Must be called inside a tokio runtime.
    pub fn start(
        position: Arc<dyn PositionSource>,
        loader: Option<Arc<dyn SongLoader>>,
        config: &CueConfig,
    ) -> Self {
        let broadcaster = Arc::new(Broadcaster::new());
        let feed = Arc::new(PositionFeed::new());
        let sync: SharedSync = Arc::new(Mutex::new(SyncEngine::new(broadcaster.clone())));
        let scheduler = Scheduler::new(
            broadcaster.clone(),
            Arc::clone(&position),
            loader,
            config.scheduler(),
        );

        let engine = Arc::clone(&sync);
        let feed_token = feed.subscribe(move |position| {
            if let Ok(mut engine) = engine.lock() {
                engine.advance(position);
            }
        });

        let pump = spawn_pump(
            position,
            Arc::clone(&feed),
            interval_from_ms(config.playback.position_interval_ms),
        );

        let mut active = scheduler.active_song();
        let engine = Arc::clone(&sync);
        let follower = tokio::spawn(async move {
            while active.changed().await.is_ok() {
                let song = active.borrow_and_update().clone();
                debug!(title = song.as_ref().map(|s| s.title()), "rebinding sync engine");
                if let Ok(mut engine) = engine.lock() {
                    engine.bind(song);
                }
            }
        });

        info!("session started");
        Self {
            broadcaster,
            feed,
            sync,
            scheduler,
            lookahead: config.display.lookahead_seconds,
            feed_token,
            pump,
            follower,
        }
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Channel receiving every event from now on
    pub fn events(&self) -> tokio::sync::mpsc::UnboundedReceiver<Event> {
        self.broadcaster.channel()
    }

    pub fn feed(&self) -> &Arc<PositionFeed> {
        &self.feed
    }

    pub fn sync(&self) -> &SharedSync {
        &self.sync
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Entries starting within the configured lookahead
    pub fn upcoming(&self) -> Vec<EntryView> {
        self.sync
            .lock()
            .map(|engine| engine.upcoming(self.lookahead))
            .unwrap_or_default()
    }

    /// Stop playback and the background tasks
    pub async fn shutdown(self) {
        self.pump.abort();
        self.follower.abort();
        self.feed.unsubscribe(self.feed_token);
        self.scheduler.stop().await;
        info!("session stopped");
    }
}
