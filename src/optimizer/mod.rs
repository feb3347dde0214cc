pub mod mutation;
pub mod runner;

pub use runner::{EpisodeOptions, EpisodeResult, EpisodeRunner, ProgressObserver};

use crate::board::Board;
use crate::oracle::SimulationOutcome;

/// A board configuration under consideration, paired with the move that
/// produced it and, once simulated, its outcome.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub board: Board,
    /// `(from, to)` slot move that generated this board; `None` for a
    /// root or restart seed.
    pub produced_by: Option<(u8, u8)>,
    pub outcome: Option<SimulationOutcome>,
}

impl SearchCandidate {
    pub fn seed(board: Board) -> Self {
        Self {
            board,
            produced_by: None,
            outcome: None,
        }
    }

    pub fn from_move(board: Board, mv: (u8, u8)) -> Self {
        Self {
            board,
            produced_by: Some(mv),
            outcome: None,
        }
    }

    /// Win probability, zero while the outcome is still pending.
    pub fn win(&self) -> f64 {
        self.outcome.map(|o| o.win).unwrap_or(0.0)
    }
}
