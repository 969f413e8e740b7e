//! Coherence Module
//!
//! Stale-while-revalidate coordination between a partition and an injected
//! remote fetch, plus the subscription channel observers listen on.

mod events;
mod revalidator;

pub use events::{EventBus, ReadEvent, Subscription, EVENT_CAPACITY};
pub use revalidator::{ReadOutcome, ReadSource, RefreshHandle, RefreshResult, Revalidator};
