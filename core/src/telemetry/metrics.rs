use serde::Serialize;

/// Edit counters kept by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditMetrics {
    pub placements: usize,
    pub moves: usize,
    pub clears: usize,
    pub saves: usize,
    pub loads: usize,
    pub failures: usize,
}

impl EditMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_placement(&mut self) {
        self.placements += 1;
    }

    pub fn record_move(&mut self) {
        self.moves += 1;
    }

    pub fn record_clear(&mut self) {
        self.clears += 1;
    }

    pub fn record_save(&mut self) {
        self.saves += 1;
    }

    pub fn record_load(&mut self) {
        self.loads += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn snapshot(&self) -> EditMetrics {
        *self
    }
}
