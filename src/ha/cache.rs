//! Per-role config cache with consensus diffing and change fan-out
//!
//! One slot per replica, keyed by the replica's index in its role list.
//! A replica's entry is overwritten on every successful config report
//! (explicit or piggybacked) and removed on its next failure. Mutation,
//! consensus recomputation, the equality diff against the last published
//! value, and listener fan-out happen in a single critical section, so
//! concurrent completions can neither double-fire nor drop a notification.

use crate::common::Error;
use crate::ha::merge::Consolidate;
use std::collections::HashMap;
use std::sync::Mutex;

/// Delivered to subscribers whenever the published consensus changes.
/// Carries either the new consensus (`error` absent) or, when the cache
/// just became empty, no config plus the failure that emptied it.
#[derive(Debug, Clone)]
pub struct ConfigEvent<C> {
    pub config: Option<C>,
    pub error: Option<Error>,
}

type Listener<C> = Box<dyn Fn(ConfigEvent<C>) + Send + Sync>;

struct Entry<C> {
    config: C,
    /// Stamp from the cache-wide counter; highest stamp = most recently
    /// updated, which is what the last-writer-wins merge fields read.
    seq: u64,
}

struct Inner<C> {
    entries: HashMap<usize, Entry<C>>,
    seq: u64,
    /// Last consensus delivered to listeners (or published internally when
    /// none are registered yet).
    published: Option<C>,
    listeners: Vec<Listener<C>>,
}

pub(crate) struct ConfigCache<C> {
    inner: Mutex<Inner<C>>,
}

impl<C: Consolidate> ConfigCache<C> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                seq: 0,
                published: None,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register a change listener. Listeners run inside the cache's critical
    /// section, on whichever task completed the mutating request; they must
    /// not call back into config operations.
    pub fn subscribe(&self, listener: impl Fn(ConfigEvent<C>) + Send + Sync + 'static) {
        let mut inner = self.inner.lock().unwrap();
        inner.listeners.push(Box::new(listener));
    }

    /// Insert or overwrite `replica`'s snapshot and republish on change.
    pub fn update(&self, replica: usize, config: C) {
        let mut inner = self.inner.lock().unwrap();
        inner.seq += 1;
        let seq = inner.seq;
        inner.entries.insert(replica, Entry { config, seq });
        Self::republish(&mut inner, None);
    }

    /// Drop `replica`'s snapshot after a failed request and republish on
    /// change. Evicting an absent entry is a no-op.
    pub fn evict(&self, replica: usize, error: &Error) {
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.remove(&replica).is_none() {
            return;
        }
        Self::republish(&mut inner, Some(error));
    }

    /// Current consensus over all cached snapshots, without publishing.
    pub fn consensus(&self) -> Option<C> {
        let inner = self.inner.lock().unwrap();
        Self::consolidate(&inner)
    }

    fn consolidate(inner: &Inner<C>) -> Option<C> {
        let mut snapshots: Vec<&Entry<C>> = inner.entries.values().collect();
        snapshots.sort_by_key(|entry| entry.seq);
        let ordered: Vec<C> = snapshots
            .into_iter()
            .map(|entry| entry.config.clone())
            .collect();
        C::consolidate(&ordered)
    }

    fn republish(inner: &mut Inner<C>, error: Option<&Error>) {
        let consensus = Self::consolidate(inner);
        if consensus == inner.published {
            return;
        }
        tracing::debug!(
            entries = inner.entries.len(),
            cleared = consensus.is_none(),
            "consensus config changed"
        );
        inner.published = consensus.clone();

        let event = ConfigEvent {
            error: if consensus.is_none() {
                error.cloned()
            } else {
                None
            },
            config: consensus,
        };
        for listener in &inner.listeners {
            listener(event.clone());
        }
    }
}
