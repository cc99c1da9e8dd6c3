//! Keyboard latch between the platform's event callbacks and the tick.
//!
//! The platform delivers key-down/key-up transitions whenever it likes; the
//! simulation reads a [`HeldKeys`] snapshot once per tick. Only identifiers on
//! the watch-list supplied at construction are tracked.
//!
//! Consumption policy is **level-triggered, copy-on-read**: `snapshot()`
//! returns a copy of the held set and never clears it, so a held key is
//! reported on every tick until it is released. This applies to every key,
//! jump included.
//!
//! Events and ticks run on the same thread. On a multi-threaded host the
//! latch's `record_*` methods would be the only place needing a lock, since it
//! is the only state written from both the input callback and the tick.

use std::collections::HashSet;

use crate::error::ConfigError;

/// Keys that are physically down right now. Each identifier appears at most
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: HashSet<String>,
}

impl HeldKeys {
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }
}

#[derive(Debug, Clone)]
pub struct InputLatch {
    watched: HashSet<String>,
    held: HeldKeys,
}

impl InputLatch {
    pub fn new<I, S>(watch_list: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let watched: HashSet<String> = watch_list
            .into_iter()
            .map(Into::into)
            .filter(|key| !key.is_empty())
            .collect();
        if watched.is_empty() {
            return Err(ConfigError::EmptyWatchList);
        }
        Ok(Self {
            watched,
            held: HeldKeys::default(),
        })
    }

    pub fn is_watched(&self, key: &str) -> bool {
        self.watched.contains(key)
    }

    /// Returns true if the key became held by this call.
    pub fn record_down(&mut self, key: &str) -> bool {
        if !self.watched.contains(key) || self.held.contains(key) {
            return false;
        }
        self.held.keys.insert(key.to_string())
    }

    /// Returns true if the key was held before this call.
    pub fn record_up(&mut self, key: &str) -> bool {
        self.held.keys.remove(key)
    }

    /// Drop every held key, e.g. when the window loses focus and the matching
    /// key-up events will never arrive.
    pub fn release_all(&mut self) {
        self.held.keys.clear();
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    pub fn snapshot(&self) -> HeldKeys {
        self.held.clone()
    }
}
