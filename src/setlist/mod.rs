// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Setlists: ordered song references and the scheduler that plays them.

pub mod model;
pub mod queue;
pub mod scheduler;

pub use model::{Setlist, SetlistSettings, SetlistSong, MAX_GAP_SECONDS, SETLIST_VERSION};
pub use queue::{Advance, Progress, Queue, SetlistInfo, SetlistState};
pub use scheduler::{Scheduler, SchedulerConfig, FINISHED_MESSAGE};
