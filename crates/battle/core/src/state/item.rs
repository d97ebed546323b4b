use super::ids::{DamageTypeId, ItemTypeId, ScannerId};

/// Which hand slot an item occupies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const fn from_right(right: bool) -> Self {
        if right { Self::Right } else { Self::Left }
    }

    pub const fn is_right(self) -> bool {
        matches!(self, Self::Right)
    }

    pub const fn weapon_status(self) -> WeaponStatus {
        match self {
            Self::Left => WeaponStatus::FiringLeftHand,
            Self::Right => WeaponStatus::FiringRightHand,
        }
    }
}

/// Which hands take part in an attack order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponStatus {
    #[default]
    NotFiring,
    FiringLeftHand,
    FiringRightHand,
    FiringBothHands,
}

/// Item category as far as the hand slots are concerned.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon,
    Grenade,
    Ammo,
    Armor,
    MindBender,
    Teleporter,
    MotionScanner,
    MediKit,
    Popper,
    Brainsucker,
    Spawner,
    DisruptorShield,
    AlienDetector,
    CloakingField,
    DimensionForceField,
    MindShield,
    MultiTracker,
    StructureProbe,
    VortexAnalyzer,
    #[default]
    Loot,
}

impl ItemKind {
    /// Items whose use order fires once and needs no target.
    pub const fn is_single_shot_use(self) -> bool {
        matches!(self, Self::Popper | Self::Brainsucker | Self::Spawner)
    }
}

/// How a primed explosive decides to go off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerKind {
    #[default]
    None,
    Timed,
    Contact,
    Proximity,
    Boomeroid,
}

impl TriggerKind {
    /// Triggers that take a detection radius in addition to a delay.
    pub const fn has_range(self) -> bool {
        matches!(self, Self::Proximity | Self::Boomeroid)
    }
}

/// Read-only copy of an item held in a hand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemView {
    pub type_id: ItemTypeId,
    pub kind: ItemKind,
    pub damage_type: Option<DamageTypeId>,
    pub trigger: TriggerKind,

    /// A payload is present: clip, charge cell, or the item itself for armor.
    pub loaded: bool,
    /// Loaded ammunition, charge or durability, interpreted per `kind`.
    pub ammo: i32,
    /// Capacity of the loaded payload; zero when nothing is loaded.
    pub payload_max_ammo: i32,
    pub armor: i32,
    pub max_armor: i32,
    /// Accuracy percentage of the item or its loaded payload.
    pub accuracy: i32,

    pub can_fire: bool,
    /// Indirect-fire launcher.
    pub launcher: bool,
    pub in_use: bool,
    pub primed: bool,
}

/// Live state of a real-time motion scanner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerView {
    pub id: ScannerId,
    pub version: u64,
    /// Row-major grid of ticks since movement was last seen in each cell.
    pub movement_ticks: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl ScannerView {
    pub fn ticks_at(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.movement_ticks.get(y * self.width + x).copied().unwrap_or(0)
    }
}
