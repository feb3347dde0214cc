mod common;

use std::collections::BTreeMap;

use brawlboard::board::PlayerSide;
use brawlboard::fingerprint::fingerprint;
use brawlboard::optimizer::mutation;
use brawlboard::BrawlboardError;
use common::board_with;
use rstest::rstest;

#[test]
fn swap_exchanges_two_creatures() {
    let board = board_with(&[0, 1, 2], &[0]);
    let swapped = mutation::swap(&board, 0, 1).unwrap();

    assert_eq!(
        swapped.unit_in_slot(PlayerSide::Player, 0).unwrap().content_id,
        "p1"
    );
    assert_eq!(
        swapped.unit_in_slot(PlayerSide::Player, 1).unwrap().content_id,
        "p0"
    );
    // Bystander untouched.
    assert_eq!(
        swapped.unit_in_slot(PlayerSide::Player, 2).unwrap().content_id,
        "p2"
    );
}

#[test]
fn swap_into_empty_slot_is_a_move() {
    let board = board_with(&[0], &[0]);
    let moved = mutation::swap(&board, 0, 4).unwrap();

    assert!(moved.unit_in_slot(PlayerSide::Player, 0).is_none());
    assert_eq!(
        moved.unit_in_slot(PlayerSide::Player, 4).unwrap().content_id,
        "p0"
    );
}

#[test]
fn swap_from_empty_slot_pulls_the_occupant() {
    let board = board_with(&[3], &[0]);
    let moved = mutation::swap(&board, 6, 3).unwrap();
    assert_eq!(
        moved.unit_in_slot(PlayerSide::Player, 6).unwrap().content_id,
        "p3"
    );
}

#[test]
fn swap_of_two_empty_slots_is_invalid() {
    let board = board_with(&[0], &[0]);
    assert!(matches!(
        mutation::swap(&board, 5, 6),
        Err(BrawlboardError::InvalidPermutation(_))
    ));
}

#[test]
fn colliding_permutation_is_rejected() {
    let board = board_with(&[0, 1, 2], &[0]);
    let map: BTreeMap<u8, u8> = [(0, 2), (1, 2)].into_iter().collect();

    assert!(matches!(
        mutation::apply_permutation(&board, &map),
        Err(BrawlboardError::InvalidPermutation(_))
    ));
}

#[test]
fn permutation_of_unoccupied_slot_is_rejected() {
    let board = board_with(&[0, 1], &[0]);
    let map: BTreeMap<u8, u8> = [(5, 0)].into_iter().collect();

    assert!(matches!(
        mutation::apply_permutation(&board, &map),
        Err(BrawlboardError::InvalidPermutation(_))
    ));
}

#[test]
fn permutation_target_outside_battlefield_is_rejected() {
    let board = board_with(&[0], &[0]);
    let map: BTreeMap<u8, u8> = [(0, 7)].into_iter().collect();

    assert!(matches!(
        mutation::apply_permutation(&board, &map),
        Err(BrawlboardError::InvalidPermutation(_))
    ));
}

#[test]
fn three_cycle_rotates_creatures() {
    let board = board_with(&[0, 1, 2], &[0]);
    let map: BTreeMap<u8, u8> = [(0, 1), (1, 2), (2, 0)].into_iter().collect();
    let rotated = mutation::apply_permutation(&board, &map).unwrap();

    assert_eq!(
        rotated.unit_in_slot(PlayerSide::Player, 1).unwrap().content_id,
        "p0"
    );
    assert_eq!(
        rotated.unit_in_slot(PlayerSide::Player, 2).unwrap().content_id,
        "p1"
    );
    assert_eq!(
        rotated.unit_in_slot(PlayerSide::Player, 0).unwrap().content_id,
        "p2"
    );
}

#[test]
fn permutation_then_inverse_restores_the_fingerprint() {
    let board = board_with(&[0, 1, 2, 4], &[0, 1]);
    let map: BTreeMap<u8, u8> = [(0, 1), (1, 4), (4, 0)].into_iter().collect();
    let inverse: BTreeMap<u8, u8> = map.iter().map(|(&k, &v)| (v, k)).collect();

    let there = mutation::apply_permutation(&board, &map).unwrap();
    let back = mutation::apply_permutation(&there, &inverse).unwrap();

    assert_ne!(fingerprint(&board), fingerprint(&there));
    assert_eq!(fingerprint(&board), fingerprint(&back));
}

#[test]
fn randomize_preserves_the_creature_and_slot_sets() {
    let board = board_with(&[0, 2, 3, 5, 6], &[0]);
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..20 {
        let shuffled = mutation::randomize(&board, &mut rng).unwrap();
        assert_eq!(
            shuffled.occupied_slots(PlayerSide::Player),
            board.occupied_slots(PlayerSide::Player)
        );

        let mut contents: Vec<&str> = shuffled
            .player
            .iter()
            .filter(|u| u.is_movable())
            .map(|u| u.content_id.as_str())
            .collect();
        contents.sort_unstable();
        assert_eq!(contents, vec!["p0", "p2", "p3", "p5", "p6"]);
    }
}

#[rstest]
#[case(0, vec![(0, 1), (0, 4)])]
#[case(3, vec![(3, 2), (3, 6)])]
#[case(5, vec![(5, 1), (5, 2), (5, 4), (5, 6)])]
fn neighbor_moves_follow_the_adjacency_table(#[case] slot: u8, #[case] expected: Vec<(u8, u8)>) {
    assert_eq!(mutation::neighbor_moves(slot), expected);
}

#[test]
fn neighbor_moves_outside_battlefield_are_empty() {
    assert!(mutation::neighbor_moves(7).is_empty());
}

#[test]
fn random_slot_respects_the_exclusion() {
    let board = board_with(&[2, 5], &[0]);
    let mut rng = fastrand::Rng::with_seed(1);

    for _ in 0..20 {
        assert_eq!(mutation::random_slot(&board, Some(5), &mut rng), Some(2));
    }
}

#[test]
fn random_slot_on_empty_battlefield_is_none() {
    let board = board_with(&[], &[0]);
    let mut rng = fastrand::Rng::with_seed(1);
    assert_eq!(mutation::random_slot(&board, None, &mut rng), None);
}
