use std::fmt;

use sha2::{Digest, Sha256};

use crate::board::{Board, PlayerSide, Unit};

/// Content-derived digest of a board's creature placement.
///
/// Used purely as a set-membership key for "already simulated" tracking;
/// sha2 is for cross-run stability, not security.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardFingerprint(String);

impl BoardFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprints a board independently of the order its units were listed in.
///
/// Each side's units are sorted by (slot, zone) and fed to the hasher field
/// by field, so two structurally identical boards always hash the same and
/// any slot reassignment changes the digest.
pub fn fingerprint(board: &Board) -> BoardFingerprint {
    let mut hasher = Sha256::new();

    for side in [PlayerSide::Player, PlayerSide::Opponent] {
        hasher.update(side.role().as_bytes());
        hasher.update([0xff]);

        let mut units: Vec<&Unit> = board.side(side).iter().collect();
        units.sort_by_key(|u| (u.slot, u.zone));

        for unit in units {
            hash_unit(&mut hasher, unit);
        }
    }

    BoardFingerprint(hex::encode(hasher.finalize()))
}

fn hash_unit(hasher: &mut Sha256, unit: &Unit) {
    hasher.update([unit.slot]);
    hasher.update(unit.zone.to_string().as_bytes());
    hasher.update([0xfe]);
    hasher.update(unit.content_id.as_bytes());
    hasher.update([0xfe]);
    hasher.update(unit.attack.to_le_bytes());
    hasher.update(unit.health.to_le_bytes());
    hasher.update([unit.is_golden as u8]);
    hasher.update(unit.cost.to_le_bytes());
    for tribe in &unit.subtypes {
        hasher.update(tribe.as_bytes());
        hasher.update([0xfe]);
    }
    hasher.update(unit.player_id.as_bytes());
    hasher.update([0xfe]);
    hasher.update(unit.level.to_le_bytes());
    // Field values are length-ambiguous on their own; the terminator keeps
    // adjacent units from running together.
    hasher.update([0xff]);
}
