use rustc_hash::FxHashMap;

use crate::interner::OrthId;

/// Sparse id -> count table. Iteration follows first-increment order, so an
/// unmodified counter always enumerates identically.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    slots: FxHashMap<OrthId, usize>,
    entries: Vec<(OrthId, u64)>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the count for `id` and returns the new count. A zero
    /// delta leaves the counter untouched. Returns `None`, without changing
    /// anything, when the count would overflow.
    #[must_use]
    pub fn increment(&mut self, id: OrthId, delta: u64) -> Option<u64> {
        match self.slots.get(&id) {
            Some(&slot) => {
                let count = &mut self.entries[slot].1;
                *count = count.checked_add(delta)?;
                Some(*count)
            }
            None if delta == 0 => Some(0),
            None => {
                self.slots.insert(id, self.entries.len());
                self.entries.push((id, delta));
                Some(delta)
            }
        }
    }

    pub fn get(&self, id: OrthId) -> u64 {
        self.slots.get(&id).map_or(0, |&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OrthId, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of distinct ids with a non-zero count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, &(_, count)| sum.saturating_add(count))
    }
}
