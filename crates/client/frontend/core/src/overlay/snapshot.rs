//! Equality-comparable snapshots driving the overlay bitmaps.
//!
//! A bitmap is redrawn only when its snapshot changes, so every field that
//! affects a pixel must take part in equality and nothing else should.

use battle_core::{
    BodyPart, DamageTypeId, Hand, ItemKind, ItemTypeId, ItemView, PsiStats, PsiStatus,
    ScannerId, ScannerView, TICKS_PER_SECOND, UnitId, UnitView,
};
use strum::IntoEnumIterator;

use crate::mode::InteractionMode;

/// What a hand slot shows: icon, damage type, accuracy and ammo meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ItemOverlaySnapshot {
    pub item_type: Option<ItemTypeId>,
    pub damage_type: Option<DamageTypeId>,
    /// Accuracy halved into 0..=50.
    pub accuracy: i32,
    pub cur_ammo: i32,
    pub max_ammo: i32,
    /// In use, primed, psi focus, or bound to the current fire/teleport mode.
    pub selected: bool,
}

impl ItemOverlaySnapshot {
    /// Snapshot of `hand` for the front unit. Empty when nothing is held.
    pub fn capture(
        unit: &UnitView,
        item: Option<&ItemView>,
        hand: Hand,
        mode: InteractionMode,
    ) -> Self {
        let Some(item) = item else {
            return Self::default();
        };

        let mut snapshot = Self {
            item_type: Some(item.type_id),
            accuracy: (item.accuracy / 2).max(0),
            ..Self::default()
        };
        if !item.loaded {
            return snapshot;
        }

        snapshot.damage_type = item.damage_type;
        let (cur, max) = match item.kind {
            ItemKind::Weapon | ItemKind::Ammo => (item.ammo, item.payload_max_ammo),
            ItemKind::Armor => (scaled(item.armor, item.max_armor, 30), 30),
            ItemKind::DisruptorShield => (scaled(item.ammo, item.payload_max_ammo, 30), 30),
            ItemKind::Teleporter => (scaled(item.ammo, item.payload_max_ammo, 3), 3),
            _ => (0, 0),
        };
        snapshot.cur_ammo = cur;
        snapshot.max_ammo = max;

        let psi_focus =
            unit.psi_status != PsiStatus::NotEngaged && unit.psi_item == Some(item.type_id);
        let bound_to_mode = matches!(
            (mode, hand),
            (InteractionMode::FireRight, Hand::Right)
                | (InteractionMode::FireLeft, Hand::Left)
                | (InteractionMode::TeleportRight, Hand::Right)
                | (InteractionMode::TeleportLeft, Hand::Left)
        );
        snapshot.selected = item.in_use || item.primed || psi_focus || bound_to_mode;
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.item_type.is_none()
    }
}

fn scaled(value: i32, max: i32, scale: i32) -> i32 {
    (value * scale).checked_div(max).unwrap_or(0)
}

/// Psi status and stats of the front unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PsiInfoSnapshot {
    pub status: PsiStatus,
    pub current: PsiStats,
    pub max: PsiStats,
}

impl PsiInfoSnapshot {
    /// All zero when no unit is selected.
    pub fn capture(unit: Option<&UnitView>) -> Self {
        unit.map_or_else(Self::default, |unit| Self {
            status: unit.psi_status,
            current: unit.psi_current,
            max: unit.psi_max,
        })
    }
}

/// Whose movement data the scanner shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScannerSource {
    /// Real-time scanner object.
    Live(ScannerId),
    /// Turn-based sample centred on a unit.
    Sampled(UnitId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MotionScannerSnapshot {
    /// Compass octant of the holder's facing.
    pub direction: u8,
    pub source: ScannerSource,
    pub version: u64,
    /// Sample centre; only meaningful for [`ScannerSource::Sampled`].
    pub position: (i32, i32),
}

impl MotionScannerSnapshot {
    pub fn live(unit: &UnitView, scanner: &ScannerView) -> Self {
        Self {
            direction: unit.facing.octant().unwrap_or(0),
            source: ScannerSource::Live(scanner.id),
            version: scanner.version,
            position: (0, 0),
        }
    }

    /// Turn-based scanners refresh every other in-game second.
    pub fn sampled(unit: &UnitView, game_ticks: u64) -> Self {
        Self {
            direction: unit.facing.octant().unwrap_or(0),
            source: ScannerSource::Sampled(unit.id),
            version: game_ticks / TICKS_PER_SECOND / 2,
            position: (unit.tile.x, unit.tile.y),
        }
    }
}

/// Body parts with fatal wounds and whether each is being treated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MedikitSnapshot {
    pub wounds: Vec<(BodyPart, bool)>,
}

impl MedikitSnapshot {
    pub fn capture(unit: &UnitView) -> Self {
        let wounds = BodyPart::iter()
            .filter(|part| unit.fatal_wound(*part) > 0)
            .map(|part| (part, unit.healing == Some(part)))
            .collect();
        Self { wounds }
    }
}
