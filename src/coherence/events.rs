//! Read events published to partition subscribers.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::error::FetchError;

/// Buffered events per subscriber before the oldest are dropped.
pub const EVENT_CAPACITY: usize = 64;

/// What a subscriber learns about one key of a partition.
#[derive(Debug)]
pub enum ReadEvent<V> {
    /// Cold read started; no value to show yet
    Loading { key: String },
    /// Warm read served from the cache; a refresh is running
    Cached { key: String, value: Arc<V> },
    /// Cold read completed
    Loaded { key: String, value: Arc<V> },
    /// A refresh or a local write replaced the value readers had
    Changed { key: String, value: Arc<V> },
    /// Cold read failed; nothing is cached
    Failed { key: String, error: FetchError },
    /// The entry was dropped because of a local mutation
    Invalidated { key: String },
}

impl<V> ReadEvent<V> {
    pub fn key(&self) -> &str {
        match self {
            ReadEvent::Loading { key }
            | ReadEvent::Cached { key, .. }
            | ReadEvent::Loaded { key, .. }
            | ReadEvent::Changed { key, .. }
            | ReadEvent::Failed { key, .. }
            | ReadEvent::Invalidated { key } => key,
        }
    }
}

// Manual Clone implementation that doesn't require V: Clone
impl<V> Clone for ReadEvent<V> {
    fn clone(&self) -> Self {
        match self {
            ReadEvent::Loading { key } => ReadEvent::Loading { key: key.clone() },
            ReadEvent::Cached { key, value } => ReadEvent::Cached {
                key: key.clone(),
                value: Arc::clone(value),
            },
            ReadEvent::Loaded { key, value } => ReadEvent::Loaded {
                key: key.clone(),
                value: Arc::clone(value),
            },
            ReadEvent::Changed { key, value } => ReadEvent::Changed {
                key: key.clone(),
                value: Arc::clone(value),
            },
            ReadEvent::Failed { key, error } => ReadEvent::Failed {
                key: key.clone(),
                error: error.clone(),
            },
            ReadEvent::Invalidated { key } => ReadEvent::Invalidated { key: key.clone() },
        }
    }
}

/// Fan-out of read events for one partition.
pub struct EventBus<V> {
    sender: broadcast::Sender<ReadEvent<V>>,
}

impl<V> Clone for EventBus<V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<V> EventBus<V> {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Deliver to current subscribers. Having none is fine.
    pub fn publish(&self, event: ReadEvent<V>) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> Subscription<V> {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<V> Default for EventBus<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end held by the presentation layer.
///
/// A subscriber that falls more than `EVENT_CAPACITY` events behind skips the
/// oldest ones; the latest `Changed` always reflects the cache.
pub struct Subscription<V> {
    receiver: broadcast::Receiver<ReadEvent<V>>,
}

impl<V> Subscription<V> {
    /// Wait for the next event. `None` once the partition is gone.
    pub async fn recv(&mut self) -> Option<ReadEvent<V>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered event, without waiting.
    pub fn try_recv(&mut self) -> Option<ReadEvent<V>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything buffered so far.
    pub fn drain(&mut self) -> Vec<ReadEvent<V>> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
