// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Where playback time comes from.
//!
//! The engine never plays audio itself. A host reports the player's
//! position through a [`PositionSource`]; [`SharedPosition`] lets the host
//! push values in, and [`SimulatedPlayer`] runs a clock for demos.

pub mod feed;

pub use feed::{spawn_pump, PositionFeed};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CueError, Result};

/// Anything that can report playback position and duration in seconds
pub trait PositionSource: Send + Sync {
    fn position(&self) -> Result<f64>;
    fn duration(&self) -> Result<f64>;
}

/// Position and duration pushed in from outside
#[derive(Debug)]
pub struct SharedPosition {
    position: AtomicU64,
    duration: AtomicU64,
    unavailable: AtomicBool,
}

impl SharedPosition {
    pub fn new() -> Self {
        Self {
            position: AtomicU64::new(0f64.to_bits()),
            duration: AtomicU64::new(0f64.to_bits()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_position(&self, seconds: f64) {
        self.position.store(seconds.to_bits(), Ordering::Release);
    }

    pub fn set_duration(&self, seconds: f64) {
        self.duration.store(seconds.to_bits(), Ordering::Release);
    }

    /// Make reads fail until cleared, as when the player goes away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Acquire) {
            Err(CueError::resource("player not available"))
        } else {
            Ok(())
        }
    }
}

impl Default for SharedPosition {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for SharedPosition {
    fn position(&self) -> Result<f64> {
        self.check()?;
        Ok(f64::from_bits(self.position.load(Ordering::Acquire)))
    }

    fn duration(&self) -> Result<f64> {
        self.check()?;
        Ok(f64::from_bits(self.duration.load(Ordering::Acquire)))
    }
}

#[derive(Debug)]
struct PlayerState {
    started: Option<Instant>,
    duration: f64,
    speed: f64,
}

/// Clock-driven stand-in for an audio player
#[derive(Debug)]
pub struct SimulatedPlayer {
    state: Mutex<PlayerState>,
}

impl SimulatedPlayer {
    /// Create a stopped player; `speed` scales elapsed time
    pub fn new(speed: f64) -> Self {
        Self {
            state: Mutex::new(PlayerState {
                started: None,
                duration: 0.0,
                speed: if speed > 0.0 { speed } else { 1.0 },
            }),
        }
    }

    /// Start a song of `duration` seconds from the top
    pub fn start(&self, duration: f64) {
        if let Ok(mut state) = self.state.lock() {
            state.started = Some(Instant::now());
            state.duration = duration.max(0.0);
        }
    }

    pub fn stop(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.started = None;
            state.duration = 0.0;
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().map(|s| s.started.is_some()).unwrap_or(false)
    }

    fn read<T>(&self, f: impl FnOnce(&PlayerState) -> T) -> Result<T> {
        self.state
            .lock()
            .map(|state| f(&state))
            .map_err(|_| CueError::resource("simulated player state poisoned"))
    }
}

impl Default for SimulatedPlayer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PositionSource for SimulatedPlayer {
    fn position(&self) -> Result<f64> {
        self.read(|state| match state.started {
            Some(started) => {
                let elapsed = started.elapsed().as_secs_f64() * state.speed;
                elapsed.min(state.duration)
            }
            None => 0.0,
        })
    }

    fn duration(&self) -> Result<f64> {
        self.read(|state| state.duration)
    }
}

/// Convert a millisecond setting to a non-zero interval
pub(crate) fn interval_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}
