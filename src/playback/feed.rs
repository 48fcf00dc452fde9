// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Position updates fanned out to interested parties.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::PositionSource;
use crate::events::{Subscribers, SubscriptionToken};

/// Publishes playback positions to subscribed callbacks
#[derive(Default)]
pub struct PositionFeed {
    subscribers: Subscribers<f64>,
}

impl PositionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every published position
    pub fn subscribe<F>(&self, mut handler: F) -> SubscriptionToken
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.subscribers.subscribe(move |position: &f64| {
            handler(*position);
            Ok(())
        })
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.subscribers.unsubscribe(token)
    }

    pub fn publish(&self, position: f64) {
        self.subscribers.publish(&position);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Poll `source` every `interval` and publish what it reports.
/// Read failures are skipped.
pub fn spawn_pump(
    source: Arc<dyn PositionSource>,
    feed: Arc<PositionFeed>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match source.position() {
                Ok(position) => feed.publish(position),
                Err(e) => debug!(error = %e, "position unavailable"),
            }
        }
    })
}
