use std::collections::BTreeMap;

use fastrand::Rng;

use crate::board::{Board, PlayerSide, ADJACENT_SLOTS, BATTLEFIELD_SLOTS};
use crate::{BbResult, BrawlboardError};

/// Applies a simultaneous slot permutation to the player's creatures.
///
/// Creatures whose slot is a key of `permute_map` relocate to the mapped
/// slot; everything else stays put. Pure: the input board is never mutated.
///
/// Fails with `InvalidPermutation` when a key references an empty slot,
/// a target is outside the battlefield, or two creatures would end up in
/// the same slot.
pub fn apply_permutation(board: &Board, permute_map: &BTreeMap<u8, u8>) -> BbResult<Board> {
    let occupied = board.occupied_slots(PlayerSide::Player);

    for (&from, &to) in permute_map {
        if !occupied.contains(&from) {
            return Err(BrawlboardError::InvalidPermutation(format!(
                "slot {} has no creature to move",
                from
            )));
        }
        if to >= BATTLEFIELD_SLOTS {
            return Err(BrawlboardError::InvalidPermutation(format!(
                "target slot {} is outside the battlefield",
                to
            )));
        }
    }

    let mut rearranged = board.clone();
    for unit in rearranged.side_mut(PlayerSide::Player) {
        if !unit.is_movable() {
            continue;
        }
        if let Some(&to) = permute_map.get(&unit.slot) {
            unit.slot = to;
        }
    }

    let mut seen = [false; BATTLEFIELD_SLOTS as usize];
    for unit in rearranged.side(PlayerSide::Player) {
        if !unit.is_movable() {
            continue;
        }
        if seen[unit.slot as usize] {
            return Err(BrawlboardError::InvalidPermutation(format!(
                "two creatures map to slot {}",
                unit.slot
            )));
        }
        seen[unit.slot as usize] = true;
    }

    Ok(rearranged)
}

/// Exchanges the creatures in two slots. When exactly one slot is occupied
/// this degrades to a plain move; two empty slots are a caller error.
pub fn swap(board: &Board, slot_a: u8, slot_b: u8) -> BbResult<Board> {
    let occupied_a = board.unit_in_slot(PlayerSide::Player, slot_a).is_some();
    let occupied_b = board.unit_in_slot(PlayerSide::Player, slot_b).is_some();

    let mut permute_map = BTreeMap::new();
    match (occupied_a, occupied_b) {
        (true, true) => {
            permute_map.insert(slot_a, slot_b);
            permute_map.insert(slot_b, slot_a);
        }
        (true, false) => {
            permute_map.insert(slot_a, slot_b);
        }
        (false, true) => {
            permute_map.insert(slot_b, slot_a);
        }
        (false, false) => {
            return Err(BrawlboardError::InvalidPermutation(format!(
                "no creature in slot {} or {}",
                slot_a, slot_b
            )));
        }
    }

    apply_permutation(board, &permute_map)
}

/// Shuffles the player's creatures uniformly across their occupied slots.
/// A shuffle equal to identity is possible; this is not a derangement.
pub fn randomize(board: &Board, rng: &mut Rng) -> BbResult<Board> {
    let occupied = board.occupied_slots(PlayerSide::Player);
    let mut targets = occupied.clone();
    rng.shuffle(&mut targets);

    let permute_map: BTreeMap<u8, u8> = occupied.into_iter().zip(targets).collect();
    apply_permutation(board, &permute_map)
}

/// `(from, to)` candidate moves out of a slot, per the adjacency table.
pub fn neighbor_moves(slot: u8) -> Vec<(u8, u8)> {
    ADJACENT_SLOTS
        .get(slot as usize)
        .map(|dests| dests.iter().map(|&dest| (slot, dest)).collect())
        .unwrap_or_default()
}

/// Picks a uniformly random occupied creature slot, excluding the slot the
/// previous step moved into (stepping right back would undo it).
pub fn random_slot(board: &Board, exclude: Option<u8>, rng: &mut Rng) -> Option<u8> {
    let slots: Vec<u8> = board
        .occupied_slots(PlayerSide::Player)
        .into_iter()
        .filter(|&s| Some(s) != exclude)
        .collect();

    if slots.is_empty() {
        None
    } else {
        Some(slots[rng.usize(0..slots.len())])
    }
}
