use std::sync::Arc;
use std::time::Duration;

use fnv::{FnvHashMap, FnvHashSet};
use tracing::{debug, info, warn};

use crate::board::{Board, PlayerSide};
use crate::config::Config;
use crate::fingerprint::{fingerprint, BoardFingerprint};
use crate::optimizer::{mutation, SearchCandidate};
use crate::oracle::{CombatOracle, SimError, SimulationOutcome};
use crate::worker::{SimRequest, SimulationPool};

pub struct EpisodeOptions {
    pub trials: usize,
    pub oracle_workers: usize,
    pub step_budget: usize,
    pub restarts: usize,
    pub sim_timeout: Duration,
    pub reference_player: String,
    pub seed: Option<u64>,
}

impl From<&Config> for EpisodeOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            trials: cfg.oracle.trials,
            oracle_workers: cfg.oracle.oracle_workers as usize,
            step_budget: cfg.search.step_budget,
            restarts: cfg.search.restarts,
            sim_timeout: Duration::from_secs(cfg.oracle.sim_timeout_secs),
            reference_player: PlayerSide::Player.role().to_string(),
            seed: None,
        }
    }
}

/// Receives live updates during an episode, for progress display.
pub trait ProgressObserver {
    /// Fired after every completed simulation with the current candidate
    /// at that point (root, step winner, or restart seed) and its chances,
    /// and once more when an improved arrangement is adopted. Not gated on
    /// improvement.
    fn on_outcome(&mut self, board: &Board, outcome: &SimulationOutcome);

    /// Fired when a candidate's evaluation fails; that candidate is dropped.
    fn on_error(&mut self, _error: &SimError) {}

    /// Fired once at the end with the globally best arrangement found.
    fn on_best(&mut self, _board: &Board, _outcome: &SimulationOutcome) {}
}

pub struct EpisodeResult {
    /// Best candidate across all restarts; `None` when every evaluation
    /// failed.
    pub best: Option<SearchCandidate>,
    /// Oracle submissions made during the episode.
    pub evaluations: usize,
}

/// Runs one search episode: a hill climb with random restarts over the
/// player's creature arrangement, using the combat simulator as the only
/// quality oracle.
pub struct EpisodeRunner {
    pool: SimulationPool,
    options: EpisodeOptions,
}

impl EpisodeRunner {
    pub fn new(oracle: Arc<dyn CombatOracle>, options: EpisodeOptions) -> Self {
        let pool = SimulationPool::new(oracle, options.sim_timeout);
        Self { pool, options }
    }

    /// Searches from the submitted board until the restart budget is spent.
    ///
    /// Per-candidate oracle errors never abort the episode; the candidate is
    /// dropped and the climb continues with whatever results exist.
    pub fn run<O: ProgressObserver>(&mut self, board: &Board, observer: &mut O) -> EpisodeResult {
        let mut rng = match self.options.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };

        let mut episode = EpisodeState::default();
        let mut best_boards: Vec<SearchCandidate> = Vec::new();

        for restart in 0..self.options.restarts {
            // Restarts always reshuffle the as-received board, not the best
            // local optimum so far.
            let seed_board = if restart == 0 {
                board.clone()
            } else {
                match mutation::randomize(board, &mut rng) {
                    Ok(b) => b,
                    Err(e) => {
                        warn!("could not randomize restart seed: {e}");
                        continue;
                    }
                }
            };

            info!(restart, "starting climb");
            let Some(current) = self.seed_candidate(seed_board, &mut episode, observer) else {
                continue;
            };

            let local_best = self.climb(current, &mut episode, &mut rng, observer);
            best_boards.push(local_best);
        }

        // First-encountered tie-break, same as the per-step winner pick.
        let mut best: Option<SearchCandidate> = None;
        for candidate in best_boards {
            if best.as_ref().map_or(true, |b| candidate.win() > b.win()) {
                best = Some(candidate);
            }
        }

        if let Some(candidate) = &best {
            if let Some(outcome) = candidate.outcome {
                info!(win = outcome.win, "episode done");
                observer.on_best(&candidate.board, &outcome);
            }
        } else {
            info!("episode done with no successful evaluation");
        }

        EpisodeResult {
            best,
            evaluations: episode.evaluations,
        }
    }

    /// Evaluates a restart seed, reusing the cached outcome when a reshuffle
    /// lands on an already-simulated arrangement.
    fn seed_candidate<O: ProgressObserver>(
        &mut self,
        seed_board: Board,
        episode: &mut EpisodeState,
        observer: &mut O,
    ) -> Option<SearchCandidate> {
        let fp = fingerprint(&seed_board);

        if episode.seen.contains(&fp) {
            return match episode.outcomes.get(&fp) {
                Some(&outcome) => {
                    debug!(%fp, "restart seed already simulated, reusing outcome");
                    let mut candidate = SearchCandidate::seed(seed_board);
                    candidate.outcome = Some(outcome);
                    Some(candidate)
                }
                // The earlier attempt errored; this restart has nothing to
                // build on.
                None => None,
            };
        }

        let candidate = self.evaluate(seed_board, None, episode, observer)?;
        if let Some(outcome) = candidate.outcome {
            observer.on_outcome(&candidate.board, &outcome);
        }
        Some(candidate)
    }

    /// One hill climb from `current` until local optimum or step budget.
    fn climb<O: ProgressObserver>(
        &mut self,
        mut current: SearchCandidate,
        episode: &mut EpisodeState,
        rng: &mut fastrand::Rng,
        observer: &mut O,
    ) -> SearchCandidate {
        let mut last_moved_to: Option<u8> = None;

        for _ in 0..self.options.step_budget {
            let start_slot = match last_moved_to {
                Some(slot) => slot,
                None => match mutation::random_slot(&current.board, last_moved_to, rng) {
                    Some(slot) => slot,
                    None => break,
                },
            };

            let mut batch: Vec<SearchCandidate> = Vec::new();
            for (from, to) in mutation::neighbor_moves(start_slot) {
                // Empty slots are a no-op target.
                if current.board.unit_in_slot(PlayerSide::Player, to).is_none() {
                    continue;
                }
                let neighbor = match mutation::swap(&current.board, from, to) {
                    Ok(b) => b,
                    Err(e) => {
                        warn!("skipping neighbor move {from}->{to}: {e}");
                        continue;
                    }
                };
                if episode.seen.contains(&fingerprint(&neighbor)) {
                    debug!(from, to, "neighbor already simulated");
                    continue;
                }

                if let Some(candidate) = self.evaluate(neighbor, Some((from, to)), episode, observer)
                {
                    batch.push(candidate);
                    // Live update for the current candidate; the neighbor's
                    // own chances only surface if it gets adopted.
                    if let Some(outcome) = current.outcome {
                        observer.on_outcome(&current.board, &outcome);
                    }
                }
            }

            if batch.is_empty() {
                debug!("all neighbors previously simulated or failed");
                break;
            }

            let mut winner = 0;
            for (i, candidate) in batch.iter().enumerate().skip(1) {
                if candidate.win() > batch[winner].win() {
                    winner = i;
                }
            }

            if batch[winner].win() <= current.win() {
                debug!("no step improves on the current arrangement");
                break;
            }

            current = batch.swap_remove(winner);
            if let Some((from, to)) = current.produced_by {
                info!(from, to, win = current.win(), "adopted improved arrangement");
                last_moved_to = Some(to);
            }
            // Surface the improved chances even if the climb ends here.
            if let Some(outcome) = current.outcome {
                observer.on_outcome(&current.board, &outcome);
            }
        }

        current
    }

    fn evaluate<O: ProgressObserver>(
        &mut self,
        board: Board,
        produced_by: Option<(u8, u8)>,
        episode: &mut EpisodeState,
        observer: &mut O,
    ) -> Option<SearchCandidate> {
        let fp = fingerprint(&board);
        episode.seen.insert(fp.clone());
        episode.evaluations += 1;
        debug!(%fp, "submitting board for simulation");

        let request = SimRequest {
            board: board.clone(),
            reference_player: self.options.reference_player.clone(),
            trials: self.options.trials,
            worker_count: self.options.oracle_workers,
        };
        if let Err(e) = self.pool.submit(request) {
            warn!("dropping candidate, submission failed: {e}");
            observer.on_error(&e);
            return None;
        }

        match self.pool.wait() {
            Ok(outcome) => {
                episode.outcomes.insert(fp, outcome);
                let mut candidate = match produced_by {
                    Some(mv) => SearchCandidate::from_move(board, mv),
                    None => SearchCandidate::seed(board),
                };
                candidate.outcome = Some(outcome);
                Some(candidate)
            }
            Err(e) => {
                warn!("dropping candidate, simulation failed: {e}");
                observer.on_error(&e);
                None
            }
        }
    }
}

/// Per-episode bookkeeping, owned exclusively by the search loop.
#[derive(Default)]
struct EpisodeState {
    /// Every fingerprint ever submitted; guarantees no arrangement is
    /// simulated twice within the episode.
    seen: FnvHashSet<BoardFingerprint>,
    /// Successful outcomes, for reuse when a restart reshuffle collides.
    outcomes: FnvHashMap<BoardFingerprint, SimulationOutcome>,
    evaluations: usize,
}
