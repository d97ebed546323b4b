use super::position::TilePos;

/// Simulation ticks per in-game second.
pub const TICKS_PER_SECOND: u64 = 60;

/// Simulation ticks a turn lasts for timed fuses in turn-based battles.
pub const TICKS_PER_TURN: u64 = TICKS_PER_SECOND * 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleMode {
    #[default]
    RealTime,
    TurnBased,
}

impl BattleMode {
    pub const fn is_turn_based(self) -> bool {
        matches!(self, Self::TurnBased)
    }
}

/// Diplomatic stance of one organisation towards another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Allied,
    Friendly,
    #[default]
    Neutral,
    Unfriendly,
    Hostile,
}

/// View fields stored inside the battle save data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewPersistence {
    pub screen_center: TilePos,
    pub group_move: bool,
}
