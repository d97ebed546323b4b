//! Plain data exchanged with the simulation.
//!
//! Handles identify simulation-owned entities; `*View` structs are read-only
//! copies taken at query time and never written back.
mod ids;
mod item;
mod position;
mod turn;
mod unit;

pub use ids::{DamageTypeId, FloorItemId, ItemTypeId, OrgId, ScannerId, UnitId};
pub use item::{Hand, ItemKind, ItemView, ScannerView, TriggerKind, WeaponStatus};
pub use position::{Facing, MapSize, TilePos};
pub use turn::{BattleMode, Relation, TICKS_PER_SECOND, TICKS_PER_TURN, ViewPersistence};
pub use unit::{
    AimingMode, BehaviorMode, BodyPart, BodyState, FirePermission, KneelingMode, MoraleState,
    MovementMode, PsiStats, PsiStatus, ReserveShotMode, UnitView,
};
