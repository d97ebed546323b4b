use super::ids::{ItemTypeId, OrgId, UnitId};
use super::position::{Facing, TilePos};

/// Morale condition. Only `Normal` units accept player orders.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoraleState {
    #[default]
    Normal,
    Panicked,
    Berserk,
    Controlled,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementMode {
    #[default]
    Walking,
    Running,
    Prone,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KneelingMode {
    #[default]
    None,
    Kneeling,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AimingMode {
    #[default]
    Aimed,
    Snap,
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FirePermission {
    #[default]
    AtWill,
    CeaseFire,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorMode {
    Evasive,
    #[default]
    Normal,
    Aggressive,
}

/// Time units a unit keeps back at end of movement for a reaction shot.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReserveShotMode {
    #[default]
    None,
    Aimed,
    Snap,
    Auto,
}

/// Physical stance used by the jump order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyState {
    #[default]
    Standing,
    Kneeling,
    Prone,
    Flying,
    Jumping,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPart {
    Body,
    Helmet,
    LeftArm,
    Legs,
    RightArm,
}

impl BodyPart {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Psi attack currently carried out by a unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PsiStatus {
    #[default]
    NotEngaged,
    Control,
    Panic,
    Stun,
    Probe,
}

/// Energy, attack and defense psi values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsiStats {
    pub energy: i32,
    pub attack: i32,
    pub defense: i32,
}

impl PsiStats {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(energy: i32, attack: i32, defense: i32) -> Self {
        Self {
            energy,
            attack,
            defense,
        }
    }
}

/// Read-only copy of the unit state the interaction layer consults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: UnitId,
    pub owner: OrgId,

    // Liveness
    pub alive: bool,
    pub conscious: bool,
    pub retreated: bool,
    pub morale: MoraleState,

    // Placement
    pub tile: TilePos,
    pub goal: TilePos,
    pub facing: Facing,
    pub goal_facing: Facing,
    /// Tiles moved recently; drives the turn-based motion scanner.
    pub tiles_moved: u32,

    // Movement
    pub time_units: i32,
    pub can_move: bool,
    pub movement_mode: MovementMode,
    pub can_run: bool,
    pub can_fly: bool,
    pub large: bool,
    pub max_height: i32,

    // Equipment
    pub has_inventory: bool,
    pub throwing: bool,
    /// Front mission is a time-unit wait that may continue a partial move.
    pub continuable_move: bool,

    // Psi
    pub psi_status: PsiStatus,
    pub psi_item: Option<ItemTypeId>,
    pub psi_current: PsiStats,
    pub psi_max: PsiStats,

    // Medical
    pub fatal_wounds: [u16; <BodyPart as strum::EnumCount>::COUNT],
    pub healing: Option<BodyPart>,

    // Standing orders
    pub fire_permission: FirePermission,
    pub aiming: AimingMode,
    pub kneeling: KneelingMode,
    pub behavior: BehaviorMode,
    pub reserve_shot: ReserveShotMode,
    pub reserve_kneel: KneelingMode,
}

impl UnitView {
    /// Alive, conscious, still on the field, owned by `player` and in normal morale.
    pub fn is_controllable_by(&self, player: OrgId) -> bool {
        self.alive
            && self.conscious
            && !self.retreated
            && self.owner == player
            && self.morale == MoraleState::Normal
    }

    pub fn fatal_wound(&self, part: BodyPart) -> u16 {
        self.fatal_wounds[part.index()]
    }
}
