use std::collections::BTreeSet;

/// Puzzles waiting to be re-evaluated by the session coordinator. A puzzle
/// notified several times within one tick is evaluated once.
#[derive(Debug, Default)]
pub struct CoordinatorQueue {
    pending: BTreeSet<usize>,
}

impl CoordinatorQueue {
    pub fn new() -> Self {
        Self {
            pending: BTreeSet::new(),
        }
    }

    pub fn push(&mut self, puzzle: usize) {
        self.pending.insert(puzzle);
    }

    /// Queue every puzzle, used when this peer becomes coordinator.
    pub fn push_all(&mut self, count: usize) {
        self.pending.extend(0..count);
    }

    pub fn drain(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
