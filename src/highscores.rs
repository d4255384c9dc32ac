//! Session best score
//!
//! In-memory only: lives as long as the page session and is never written to
//! storage.

use serde::{Deserialize, Serialize};

/// What the game-over screen needs about the run that just ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub high_score: u32,
    /// Strictly beat the previous best (and scored at all)
    pub new_best: bool,
}

/// Running maximum of run scores this session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionBest {
    high_score: u32,
}

impl SessionBest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Record a finished run's score and update the best
    pub fn record(&mut self, score: u32) -> RunSummary {
        let previous = self.high_score;
        let new_best = score > 0 && score > previous;
        self.high_score = previous.max(score);
        RunSummary {
            score,
            high_score: self.high_score,
            new_best,
        }
    }
}
