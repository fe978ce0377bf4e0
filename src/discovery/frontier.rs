//! Breadth-first crawl frontier
//!
//! Entries are consumed in the order they were discovered, so every page at
//! depth `d` is visited before any page at depth `d + 1`.

use std::collections::VecDeque;

/// A URL waiting to be visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL as discovered (not yet canonicalized)
    pub url: String,

    /// Link distance from the start URL
    pub depth: u32,
}

/// FIFO queue of frontier entries
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,

    /// Number of entries ever pushed
    queued: usize,
}

impl Frontier {
    /// Creates a frontier seeded with the start URL at depth 0
    pub fn seeded(start_url: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(FrontierEntry {
            url: start_url.to_string(),
            depth: 0,
        });
        frontier
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
        self.queued += 1;
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs in the frontier
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total entries created over the frontier's lifetime
    pub fn queued(&self) -> usize {
        self.queued
    }
}
