//! Vocabulary shared between the tactical simulation and its interaction layer.
//!
//! `battle-core` owns no battle logic. It defines the identity handles, unit and
//! item snapshots, and the oracle/command traits through which the interaction
//! layer queries the simulation and issues missions to it. The simulation keeps
//! ownership of every unit, item and tile; everything exported here is either a
//! stable handle or a cheap copy of simulation state.
pub mod env;
pub mod error;
pub mod state;

#[cfg(feature = "mock")]
pub mod mock;

pub use env::{
    CommandError, CommandSink, DebugCommands, KillScope, MapOracle, MoveOrder, PathResult, Priming,
    Simulation, TurnOracle, UnitOracle,
};
pub use error::{BattleError, ErrorSeverity};
pub use state::{
    AimingMode, BattleMode, BehaviorMode, BodyPart, BodyState, DamageTypeId, Facing,
    FirePermission, FloorItemId, Hand, ItemKind, ItemTypeId, ItemView, KneelingMode, MapSize,
    MoraleState, MovementMode, OrgId, PsiStats, PsiStatus, Relation, ReserveShotMode,
    ScannerId, ScannerView, TICKS_PER_SECOND, TICKS_PER_TURN, TilePos, TriggerKind, UnitId,
    UnitView, ViewPersistence, WeaponStatus,
};
