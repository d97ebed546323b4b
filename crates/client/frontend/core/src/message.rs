//! News ticker backing the battle view's message strip.
use std::collections::VecDeque;

use battle_core::TilePos;

/// A single ticker line.
#[derive(Clone, Debug)]
pub struct MessageEntry {
    pub text: String,
    /// Game tick at which the message arrived.
    pub tick: Option<u64>,
    /// Where it happened, if anywhere in particular.
    pub location: Option<TilePos>,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, tick: Option<u64>) -> Self {
        Self {
            text: text.into(),
            tick,
            location: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: Option<TilePos>) -> Self {
        self.location = location;
        self
    }
}

/// Circular buffer of ticker messages, oldest evicted first.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn latest(&self) -> Option<&MessageEntry> {
        self.entries.back()
    }

    /// Location of the newest message, if it has one.
    pub fn last_location(&self) -> Option<TilePos> {
        self.latest().and_then(|entry| entry.location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
