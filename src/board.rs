use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{BbResult, BrawlboardError};

/// Number of movable battlefield slots per player (0-6, two staggered rows).
pub const BATTLEFIELD_SLOTS: u8 = 7;

/// Geometric adjacency for the staggered 7-slot battlefield.
///
/// Slots 0-3 are the back row, 4-6 the front row. This is fixed domain
/// data for the board shape, not derived from anything.
pub const ADJACENT_SLOTS: [&[u8]; 7] = [
    &[1, 4],
    &[0, 2, 4, 5],
    &[1, 3, 5, 6],
    &[2, 6],
    &[0, 1, 5],
    &[1, 2, 4, 6],
    &[2, 3, 5],
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
pub enum Zone {
    Character,
    Hero,
    Treasure,
    Spell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlayerSide {
    Player,
    Opponent,
}

impl PlayerSide {
    pub fn role(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Opponent => "opponent",
        }
    }
}

/// One observed board entry. Immutable once observed; rearrangement always
/// constructs a new [`Board`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    // Treasure and spell entries sit in fixed zones and may omit the slot.
    #[serde(deserialize_with = "de_slot", default)]
    pub slot: u8,
    pub zone: Zone,
    pub content_id: String,
    #[serde(rename = "cardattack", default)]
    pub attack: i64,
    #[serde(rename = "cardhealth", default)]
    pub health: i64,
    #[serde(deserialize_with = "de_flag", default)]
    pub is_golden: bool,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(rename = "playerid", default)]
    pub player_id: String,
    // Only meaningful on Hero entries; the simulator refuses boards whose
    // heroes have not been leveled yet.
    #[serde(default)]
    pub level: u32,
}

impl Unit {
    pub fn is_movable(&self) -> bool {
        self.zone == Zone::Character && self.slot < BATTLEFIELD_SLOTS
    }
}

// Game logs emit the slot either as a bare integer or a quoted string.
fn de_slot<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSlot {
        Num(u8),
        Text(String),
    }

    match RawSlot::deserialize(deserializer)? {
        RawSlot::Num(n) => Ok(n),
        RawSlot::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid slot '{}'", s))),
    }
}

// Same story for the golden flag: `true` or `"True"` depending on the source.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Text(String),
    }

    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(de::Error::custom(format!("invalid flag '{}'", other))),
        },
    }
}

/// A two-player board snapshot keyed by player role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub player: Vec<Unit>,
    pub opponent: Vec<Unit>,
}

impl Board {
    /// Parses a snapshot as delivered by the tracker and validates the
    /// slot invariants.
    pub fn from_json(text: &str) -> BbResult<Self> {
        let board: Board = serde_json::from_str(text)?;
        board.validate()?;
        Ok(board)
    }

    pub fn side(&self, side: PlayerSide) -> &[Unit] {
        match side {
            PlayerSide::Player => &self.player,
            PlayerSide::Opponent => &self.opponent,
        }
    }

    pub(crate) fn side_mut(&mut self, side: PlayerSide) -> &mut Vec<Unit> {
        match side {
            PlayerSide::Player => &mut self.player,
            PlayerSide::Opponent => &mut self.opponent,
        }
    }

    /// Movable creature slots for one side, ascending.
    pub fn occupied_slots(&self, side: PlayerSide) -> Vec<u8> {
        let mut slots: Vec<u8> = self
            .side(side)
            .iter()
            .filter(|u| u.is_movable())
            .map(|u| u.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn unit_in_slot(&self, side: PlayerSide, slot: u8) -> Option<&Unit> {
        self.side(side)
            .iter()
            .find(|u| u.is_movable() && u.slot == slot)
    }

    pub fn hero(&self, side: PlayerSide) -> Option<&Unit> {
        self.side(side).iter().find(|u| u.zone == Zone::Hero)
    }

    /// Checks that each side's movable slot numbers are unique and in range.
    pub fn validate(&self) -> BbResult<()> {
        for side in [PlayerSide::Player, PlayerSide::Opponent] {
            let mut seen = [false; BATTLEFIELD_SLOTS as usize];
            for unit in self.side(side).iter().filter(|u| u.zone == Zone::Character) {
                if unit.slot >= BATTLEFIELD_SLOTS {
                    return Err(BrawlboardError::Snapshot(format!(
                        "{} creature '{}' sits in slot {} outside the battlefield",
                        side, unit.content_id, unit.slot
                    )));
                }
                if seen[unit.slot as usize] {
                    return Err(BrawlboardError::Snapshot(format!(
                        "{} has two creatures in slot {}",
                        side, unit.slot
                    )));
                }
                seen[unit.slot as usize] = true;
            }
        }
        Ok(())
    }
}
