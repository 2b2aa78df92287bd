use crate::results::{BusinessRecord, NO_NAME};
use std::collections::HashSet;

/// Tracks list positions handled in the current pass and names already captured
#[derive(Debug, Default)]
pub struct Deduplicator {
    indices: HashSet<usize>,
    names: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pass: forgets positions, re-learns names from what was already captured
    pub fn begin_pass(&mut self, captured: &[BusinessRecord]) {
        self.indices.clear();
        self.names.clear();
        for record in captured {
            self.remember_name(&record.name);
        }
    }

    pub fn is_processed(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn mark_processed(&mut self, index: usize) {
        self.indices.insert(index);
    }

    /// Whether a real name was already captured; the sentinel never matches
    pub fn is_known_name(&self, name: &str) -> bool {
        name != NO_NAME && self.names.contains(name)
    }

    /// Returns `false` when the name was already known or is the sentinel
    pub fn remember_name(&mut self, name: &str) -> bool {
        if name == NO_NAME {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn processed_count(&self) -> usize {
        self.indices.len()
    }
}
