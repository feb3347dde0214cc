use std::fs;

use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use brawlboard::board::{Board, PlayerSide};
use brawlboard::fingerprint::fingerprint;
use brawlboard::optimizer::mutation;
use brawlboard::BbResult;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a board snapshot JSON file
    pub snapshot: String,
}

pub fn run(args: InspectArgs) -> BbResult<()> {
    let text = fs::read_to_string(&args.snapshot)?;
    let board = Board::from_json(&text)?;

    println!("Fingerprint: {}", fingerprint(&board));

    for side in [PlayerSide::Player, PlayerSide::Opponent] {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Slot", "Zone", "Card", "Atk", "HP", "Golden", "Cost", "Level",
        ]);

        for unit in board.side(side) {
            table.add_row(vec![
                unit.slot.to_string(),
                unit.zone.to_string(),
                unit.content_id.clone(),
                unit.attack.to_string(),
                unit.health.to_string(),
                unit.is_golden.to_string(),
                unit.cost.to_string(),
                unit.level.to_string(),
            ]);
        }

        println!("\n{}:\n{}", side, table);
    }

    println!("\nCandidate moves (occupied targets only):");
    for slot in board.occupied_slots(PlayerSide::Player) {
        let moves: Vec<String> = mutation::neighbor_moves(slot)
            .into_iter()
            .filter(|&(_, to)| board.unit_in_slot(PlayerSide::Player, to).is_some())
            .map(|(from, to)| format!("{}->{}", from, to))
            .collect();
        println!("  slot {}: {}", slot, moves.join(", "));
    }

    Ok(())
}
