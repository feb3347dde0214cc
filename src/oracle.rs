use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::error;

use crate::board::{Board, PlayerSide};

/// Errors surfaced by the combat simulator or its preconditions.
///
/// None of these are retried here: the search engine drops the affected
/// candidate and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("board is not ready to simulate (every hero needs a nonzero level)")]
    IncompleteBoard,

    #[error("simulator cannot model this board: {0}")]
    UnsupportedConfiguration(String),

    #[error("simulation timed out")]
    Timeout,

    #[error("simulator fault: {0}")]
    Fault(String),
}

/// One combat sample from the simulator: the winning player id, or `None`
/// for a tie, plus the damage dealt by the winner.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatSample {
    pub winner: Option<String>,
    pub damage: f64,
}

/// The external stochastic combat simulator, treated as a black box.
///
/// Expensive, blocking and non-deterministic; `workers` is simulator-internal
/// parallelism and unrelated to this crate's worker pool.
pub trait CombatOracle: Send + Sync {
    fn simulate(
        &self,
        board: &Board,
        reference_player: &str,
        samples_per_worker: usize,
        workers: usize,
        timeout: Duration,
    ) -> Result<Vec<CombatSample>, SimError>;
}

/// Aggregated result of one simulated board, from the reference player's
/// perspective. Probabilities are sample fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationOutcome {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub win_damage: f64,
    pub loss_damage: f64,
}

impl SimulationOutcome {
    /// Display strings matching the tracker's formatting contract:
    /// two-decimal percentages, one-decimal damage means.
    pub fn chances(&self) -> (String, String, String, String, String) {
        (
            format!("{:.2}%", self.win * 100.0),
            format!("{:.2}%", self.tie * 100.0),
            format!("{:.2}%", self.loss * 100.0),
            format!("{:.1}", self.win_damage),
            format!("{:.1}", self.loss_damage),
        )
    }
}

/// Blocking wrapper around a [`CombatOracle`] that normalizes raw samples
/// into a [`SimulationOutcome`].
pub struct OracleClient {
    oracle: Arc<dyn CombatOracle>,
}

impl OracleClient {
    pub fn new(oracle: Arc<dyn CombatOracle>) -> Self {
        Self { oracle }
    }

    /// Runs `trials` total samples split across `worker_count` simulator
    /// workers and aggregates them by outcome.
    ///
    /// Returns `IncompleteBoard` without touching the oracle when either
    /// hero still has level zero (simulating such a board is meaningless).
    pub fn evaluate(
        &self,
        board: &Board,
        reference_player: &str,
        trials: usize,
        worker_count: usize,
        timeout: Duration,
    ) -> Result<SimulationOutcome, SimError> {
        for side in [PlayerSide::Player, PlayerSide::Opponent] {
            if board.hero(side).map_or(true, |hero| hero.level == 0) {
                return Err(SimError::IncompleteBoard);
            }
        }

        let workers = worker_count.max(1);
        let samples_per_worker = (trials / workers).max(1);

        let samples = self
            .oracle
            .simulate(board, reference_player, samples_per_worker, workers, timeout)
            .map_err(|e| {
                if let SimError::Fault(_) = e {
                    // Full board context for postmortem; the candidate itself
                    // is simply dropped by the caller.
                    let context = serde_json::to_string(board).unwrap_or_default();
                    error!(board = %context, "simulator fault: {e}");
                }
                e
            })?;

        if samples.is_empty() {
            return Err(SimError::Fault("simulator returned no samples".into()));
        }

        Ok(aggregate(&samples, reference_player))
    }
}

fn aggregate(samples: &[CombatSample], reference_player: &str) -> SimulationOutcome {
    let total = samples.len() as f64;
    let mut win_damages = Vec::new();
    let mut loss_damages = Vec::new();
    let mut ties = 0usize;

    for sample in samples {
        match &sample.winner {
            Some(id) if id == reference_player => win_damages.push(sample.damage),
            Some(_) => loss_damages.push(sample.damage),
            None => ties += 1,
        }
    }

    SimulationOutcome {
        win: win_damages.len() as f64 / total,
        tie: ties as f64 / total,
        loss: loss_damages.len() as f64 / total,
        win_damage: mean(&win_damages),
        loss_damage: mean(&loss_damages),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
