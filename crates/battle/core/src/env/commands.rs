use crate::error::{BattleError, ErrorSeverity};
use crate::state::{
    AimingMode, BehaviorMode, BodyPart, BodyState, FirePermission, FloorItemId, Hand,
    ItemTypeId, KneelingMode, MovementMode, OrgId, PsiStatus, ReserveShotMode, TilePos, UnitId,
    WeaponStatus,
};

/// Reasons the simulation refuses a mission.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("insufficient time units")]
    InsufficientTimeUnits,

    #[error("target tile is blocked")]
    Blocked,

    #[error("no line of fire to target")]
    NoLineOfFire,

    #[error("no suitable item in hand")]
    NoItem,

    #[error("unit {0} cannot take orders")]
    UnitUnavailable(UnitId),

    #[error("order rejected: {0}")]
    Rejected(&'static str),
}

impl BattleError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientTimeUnits | Self::Blocked | Self::NoLineOfFire => {
                ErrorSeverity::Recoverable
            }
            Self::NoItem | Self::Rejected(_) => ErrorSeverity::Validation,
            Self::UnitUnavailable(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientTimeUnits => "COMMAND_INSUFFICIENT_TU",
            Self::Blocked => "COMMAND_BLOCKED",
            Self::NoLineOfFire => "COMMAND_NO_LINE_OF_FIRE",
            Self::NoItem => "COMMAND_NO_ITEM",
            Self::UnitUnavailable(_) => "COMMAND_UNIT_UNAVAILABLE",
            Self::Rejected(_) => "COMMAND_REJECTED",
        }
    }
}

/// Parameters of a move-to-location mission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOrder {
    pub target: TilePos,
    /// Facing offset kept while moving; non-zero when strafing.
    pub facing_delta: i32,
    /// Ask units standing in the way to step aside.
    pub demand_give_way: bool,
    /// Leave the battle through an exit without waiting for blockers.
    pub impatient: bool,
}

/// Fuse settings applied when arming an explosive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priming {
    /// The item's own default fuse.
    Default,
    Delayed { ticks: u64, range: i32 },
}

/// Missions and standing orders the interaction layer may issue.
///
/// Every mission returns whether the simulation accepted it. There is no dry
/// run: feasibility is learned from the result.
pub trait CommandSink {
    fn move_to(&mut self, unit: UnitId, order: MoveOrder) -> Result<(), CommandError>;

    /// Coordinated move keeping the group's relative formation.
    fn group_move(&mut self, units: &[UnitId], order: MoveOrder) -> Result<(), CommandError>;

    fn turn_to(&mut self, unit: UnitId, target: TilePos) -> Result<(), CommandError>;

    fn throw_item(&mut self, unit: UnitId, hand: Hand, target: TilePos)
    -> Result<(), CommandError>;

    fn teleport(&mut self, unit: UnitId, hand: Hand, target: TilePos) -> Result<(), CommandError>;

    fn attack_tile(
        &mut self,
        unit: UnitId,
        target: TilePos,
        status: WeaponStatus,
        modified: bool,
    ) -> Result<(), CommandError>;

    fn attack_unit(
        &mut self,
        unit: UnitId,
        target: UnitId,
        status: WeaponStatus,
    ) -> Result<(), CommandError>;

    /// Real-time auto-engagement focus.
    fn set_focus(&mut self, unit: UnitId, target: UnitId) -> Result<(), CommandError>;

    fn psi_attack(
        &mut self,
        unit: UnitId,
        target: UnitId,
        status: PsiStatus,
        item: ItemTypeId,
    ) -> Result<(), CommandError>;

    fn stop_psi(&mut self, unit: UnitId);

    /// Recompute what `unit`'s side can see, e.g. after releasing mind control.
    fn refresh_vision(&mut self, unit: UnitId);

    fn use_medikit(&mut self, unit: UnitId, part: BodyPart) -> Result<(), CommandError>;

    /// Activate a self-use item.
    fn use_item(&mut self, unit: UnitId, hand: Hand) -> Result<(), CommandError>;

    fn prime_item(&mut self, unit: UnitId, hand: Hand, priming: Priming)
    -> Result<(), CommandError>;

    /// Queue a drop ahead of every other pending mission.
    fn drop_item(&mut self, unit: UnitId, hand: Hand) -> Result<(), CommandError>;

    fn spend_time_units(&mut self, unit: UnitId, cost: i32) -> Result<(), CommandError>;

    fn pick_up(&mut self, unit: UnitId, item: FloorItemId, hand: Hand)
    -> Result<(), CommandError>;

    /// Discard the time-unit wait in front of a partial move so it continues.
    fn drop_pending_step(&mut self, unit: UnitId);

    fn notify_no_line_of_fire(&mut self, unit: UnitId);

    fn set_movement_mode(&mut self, unit: UnitId, mode: MovementMode);
    fn set_kneeling(&mut self, unit: UnitId, mode: KneelingMode);
    fn set_aiming(&mut self, unit: UnitId, mode: AimingMode);
    fn set_fire_permission(&mut self, unit: UnitId, permission: FirePermission);
    fn set_behavior(&mut self, unit: UnitId, mode: BehaviorMode);
    fn set_reserve_shot(&mut self, unit: UnitId, mode: ReserveShotMode);
    fn set_reserve_kneel(&mut self, unit: UnitId, mode: KneelingMode);
}

/// Which units a debug kill affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KillScope {
    Only,
    AllExcept,
    Radius(i32),
}

/// Cheat hooks reachable only from the view's debug mode.
pub trait DebugCommands {
    /// Clear interrupts, cancel every mission and pass the turn.
    fn force_end_turn(&mut self);
    fn collapse_tile(&mut self, tile: TilePos);
    fn reveal_map(&mut self, org: OrgId);
    fn make_prone(&mut self, tile: TilePos);
    fn kill(&mut self, target: UnitId, scope: KillScope);
    fn retreat(&mut self, unit: UnitId);
    fn amplify_psi(&mut self, unit: UnitId);
    fn panic(&mut self, unit: UnitId);
    fn heal_all(&mut self, org: OrgId);
    fn restore_time_units(&mut self, org: OrgId);
    fn toggle_ai(&mut self, org: OrgId);
    fn jump(&mut self, unit: UnitId, target: TilePos, body: BodyState);
    /// Give the unit a personal teleporter in `hand` if it holds none.
    fn grant_teleporter(&mut self, unit: UnitId, hand: Hand);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_orders_are_recoverable() {
        assert!(CommandError::InsufficientTimeUnits.severity().is_recoverable());
        assert!(CommandError::NoLineOfFire.severity().is_recoverable());
        assert!(CommandError::UnitUnavailable(UnitId(1)).severity().is_internal());
        assert_eq!(CommandError::Blocked.error_code(), "COMMAND_BLOCKED");
    }
}
