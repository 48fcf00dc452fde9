// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Subscription registry and event fan-out.
//!
//! Handlers are registered with [`Subscribers::subscribe`] and get back a
//! token that removes them again. Publishing calls every handler in
//! registration order. A handler that returns an error or panics is
//! dropped from the registry; delivery to the remaining handlers continues.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{trace, warn};

use super::{Event, EventSink};
use crate::error::{CueError, Result};

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

type Handler<T> = Box<dyn FnMut(&T) -> Result<()> + Send>;

/// Ordered set of handlers for values of type `T`
pub struct Subscribers<T> {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler<T>)>>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a handler. Handlers run with the handler list locked, so a
    /// handler must not subscribe, unsubscribe or publish on the same
    /// `Subscribers` from inside its own call; doing so deadlocks. Forward to
    /// another sink or a channel instead.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
    where
        F: FnMut(&T) -> Result<()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Box::new(handler)));
        SubscriptionToken(id)
    }

    /// Remove a handler; returns false if it was already gone
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut handlers = self.lock();
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != token.0);
        handlers.len() != before
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `value` to every handler, dropping the ones that fail.
    /// Not reentrant: see [`Subscribers::subscribe`].
    pub fn publish(&self, value: &T) {
        self.lock().retain_mut(|(id, handler)| {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(value))) {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    warn!(subscriber = *id, error = %e, "removing failed subscriber");
                    false
                }
                Err(_) => {
                    warn!(subscriber = *id, "removing panicked subscriber");
                    false
                }
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Handler<T>)>> {
        // Handlers run under catch_unwind, so a poisoned lock still holds a valid list
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Event sink that fans events out to every subscriber
#[derive(Default)]
pub struct Broadcaster {
    subscribers: Subscribers<Event>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. The observer must not emit into, subscribe to
    /// or unsubscribe from this broadcaster while it runs.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
    where
        F: FnMut(&Event) -> Result<()> + Send + 'static,
    {
        self.subscribers.subscribe(handler)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.subscribers.unsubscribe(token)
    }

    /// Subscribe a channel; the subscription ends when the receiver is dropped
    pub fn channel(&self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(move |event| {
            tx.send(event.clone())
                .map_err(|_| CueError::Delivery("event receiver dropped".to_string()))
        });
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSink for Broadcaster {
    fn emit(&self, event: Event) {
        trace!(kind = event.kind(), "broadcast");
        self.subscribers.publish(&event);
    }
}
