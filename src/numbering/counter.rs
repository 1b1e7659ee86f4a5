//! Per-session list counters.

use std::collections::HashMap;

/// Current count per level, keyed by abstract numbering id.
///
/// Each list holds one slot per level reached so far. Counts start from
/// the level's start value and only move forward.
#[derive(Debug, Clone, Default)]
pub struct CounterTable {
    counts: HashMap<i64, Vec<u32>>,
}

impl CounterTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart a list: its counts become the single value `seed`.
    pub fn restart(&mut self, abstract_id: i64, seed: u32) -> &[u32] {
        let counts = self.counts.entry(abstract_id).or_default();
        counts.clear();
        counts.push(seed);
        counts
    }

    /// Count one more item at `ilvl`.
    ///
    /// A level reached for the first time gets its start value; levels
    /// skipped on the way there are seeded the same way. A level reached
    /// before is incremented.
    pub fn advance<F>(&mut self, abstract_id: i64, ilvl: usize, start_of: F) -> &[u32]
    where
        F: Fn(usize) -> u32,
    {
        let counts = self.counts.entry(abstract_id).or_default();
        if ilvl < counts.len() {
            counts[ilvl] = counts[ilvl].saturating_add(1);
        } else {
            while counts.len() <= ilvl {
                counts.push(start_of(counts.len()));
            }
        }
        counts
    }

    /// Forget every level deeper than `ilvl`.
    pub fn truncate(&mut self, abstract_id: i64, ilvl: usize) {
        if let Some(counts) = self.counts.get_mut(&abstract_id) {
            counts.truncate(ilvl + 1);
        }
    }

    /// Current counts of a list, if it was touched.
    pub fn counts(&self, abstract_id: i64) -> Option<&[u32]> {
        self.counts.get(&abstract_id).map(Vec::as_slice)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
