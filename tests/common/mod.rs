#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use brawlboard::board::{Board, Unit, Zone};
use brawlboard::fingerprint::{fingerprint, BoardFingerprint};
use brawlboard::oracle::{CombatOracle, CombatSample, SimError};

pub fn creature(player_id: &str, slot: u8, content_id: &str) -> Unit {
    Unit {
        slot,
        zone: Zone::Character,
        content_id: content_id.to_string(),
        attack: 3,
        health: 4,
        is_golden: false,
        cost: 3,
        subtypes: vec!["Animal".to_string()],
        player_id: player_id.to_string(),
        level: 0,
    }
}

pub fn hero(player_id: &str, level: u32) -> Unit {
    Unit {
        slot: 7,
        zone: Zone::Hero,
        content_id: format!("{}_hero", player_id),
        attack: 0,
        health: 0,
        is_golden: false,
        cost: 0,
        subtypes: vec![],
        player_id: player_id.to_string(),
        level,
    }
}

/// Board with leveled heroes on both sides and creatures in the given slots.
pub fn board_with(player_slots: &[u8], opponent_slots: &[u8]) -> Board {
    let mut player: Vec<Unit> = player_slots
        .iter()
        .map(|&s| creature("player", s, &format!("p{}", s)))
        .collect();
    player.push(hero("player", 2));

    let mut opponent: Vec<Unit> = opponent_slots
        .iter()
        .map(|&s| creature("opponent", s, &format!("o{}", s)))
        .collect();
    opponent.push(hero("opponent", 2));

    Board { player, opponent }
}

/// Deterministic oracle scripted per board fingerprint.
///
/// Produces exactly `rate * samples` wins for the reference player and
/// losses for the rest, and records every submission for dedup assertions.
pub struct ScriptedOracle {
    rates: HashMap<BoardFingerprint, f64>,
    default_rate: f64,
    pub submissions: Mutex<Vec<BoardFingerprint>>,
}

impl ScriptedOracle {
    pub fn new(default_rate: f64) -> Self {
        Self {
            rates: HashMap::new(),
            default_rate,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn script(&mut self, board: &Board, rate: f64) {
        self.rates.insert(fingerprint(board), rate);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

impl CombatOracle for ScriptedOracle {
    fn simulate(
        &self,
        board: &Board,
        reference_player: &str,
        samples_per_worker: usize,
        workers: usize,
        _timeout: Duration,
    ) -> Result<Vec<CombatSample>, SimError> {
        let fp = fingerprint(board);
        self.submissions.lock().unwrap().push(fp.clone());

        let rate = self.rates.get(&fp).copied().unwrap_or(self.default_rate);
        let total = samples_per_worker * workers;
        let wins = (rate * total as f64).round() as usize;

        let samples = (0..total)
            .map(|i| {
                if i < wins {
                    CombatSample {
                        winner: Some(reference_player.to_string()),
                        damage: 10.0,
                    }
                } else {
                    CombatSample {
                        winner: Some("opponent".to_string()),
                        damage: 5.0,
                    }
                }
            })
            .collect();
        Ok(samples)
    }
}

/// Oracle that fails every call with a fixed error.
pub struct FailingOracle(pub SimError);

impl CombatOracle for FailingOracle {
    fn simulate(
        &self,
        _board: &Board,
        _reference_player: &str,
        _samples_per_worker: usize,
        _workers: usize,
        _timeout: Duration,
    ) -> Result<Vec<CombatSample>, SimError> {
        Err(self.0.clone())
    }
}
