use crate::state::{BattleMode, OrgId, TilePos, ViewPersistence};

/// Turn ownership, idle counters and the tick clock.
pub trait TurnOracle {
    fn mode(&self) -> BattleMode;

    /// Organisation controlled by the local player.
    fn current_player(&self) -> OrgId;

    /// Organisation whose turn it currently is.
    fn active_org(&self) -> OrgId;

    fn turn(&self) -> u32;

    fn org_name(&self, org: OrgId) -> String;

    /// Set once the active side is done and the turn may pass.
    fn turn_end_allowed(&self) -> bool;

    fn set_turn_end_allowed(&mut self, allowed: bool);

    /// Any interrupt queued or resolving.
    fn interrupts_pending(&self) -> bool;

    /// Ticks since any unit last performed an action.
    fn ticks_without_action(&self) -> u64;

    /// Ticks since `org` last saw an action happen.
    fn ticks_without_seen_action(&self, org: OrgId) -> u64;

    fn last_seen_action_location(&self, org: OrgId) -> Option<TilePos>;

    /// Resets the idle counter as if an action had been performed.
    fn notify_action(&mut self);

    fn game_ticks(&self) -> u64;

    /// Advances the battle by one tick.
    fn step(&mut self);

    fn saved_view(&self) -> ViewPersistence;

    fn store_view(&mut self, view: ViewPersistence);
}
