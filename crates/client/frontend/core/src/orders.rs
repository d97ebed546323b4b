//! Order dispatcher: turns a resolved (mode, target, selection) into missions.
//!
//! Orders never fail loudly. A refused mission is logged and, for throws and
//! teleports, reported back as [`OrderOutcome::Refused`] so the caller can
//! start the action-impossible cooldown.

use battle_core::{
    BattleError, BodyPart, BodyState, CommandError, Facing, Hand, ItemKind, MoveOrder, Priming,
    PsiStatus, Simulation, TilePos, TriggerKind, UnitId, WeaponStatus,
};
use tracing::{Level, debug, error, warn};

use crate::error::log_level;
use crate::mode::InteractionMode;
use crate::selection::SelectionSet;

/// What the view has to do after an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Nothing changes on the view side.
    Done,
    /// Enter an aiming mode.
    Enter(InteractionMode),
    /// The aiming mode served its purpose; return to `Normal`.
    Completed,
    /// Refused throw or teleport; show the blocked cursor for a while.
    Refused,
    /// Show the priming panel for an unprimed grenade.
    OpenPriming { hand: Hand, trigger: TriggerKind },
    /// Show the psi panel for a mind bender.
    OpenPsi { hand: Hand },
}

/// Offset between the current facing and the facing towards `to`, in
/// octants, within `-3..=4`.
pub fn facing_delta(current: Facing, from: TilePos, to: TilePos) -> i32 {
    let wanted = Facing::new((to.x - from.x).signum() as i8, (to.y - from.y).signum() as i8);
    match (current.octant(), wanted.octant()) {
        (Some(current), Some(wanted)) => {
            let delta = (i32::from(wanted) - i32::from(current)).rem_euclid(8);
            if delta > 4 { delta - 8 } else { delta }
        }
        _ => 0,
    }
}

/// Issues missions for the current selection.
pub struct Orders<'a, S: ?Sized> {
    sim: &'a mut S,
    selection: &'a SelectionSet,
}

impl<'a, S> Orders<'a, S>
where
    S: Simulation + ?Sized,
{
    pub fn new(sim: &'a mut S, selection: &'a SelectionSet) -> Self {
        Self { sim, selection }
    }

    fn front(&self) -> Option<UnitId> {
        self.selection.front()
    }

    /// Move every selected unit, or the group as a whole when `group_move` is
    /// on. Units leaving through an exit do not wait for blockers.
    pub fn move_to(&mut self, target: TilePos, strafe: bool, demand_give_way: bool, group_move: bool) {
        let Some(front) = self.front().and_then(|id| self.sim.unit(id)) else {
            return;
        };

        let run_away = self.sim.has_exit(target);
        let facing_delta = if strafe {
            facing_delta(front.facing, front.tile, target)
        } else {
            0
        };
        let order = MoveOrder {
            target,
            facing_delta,
            demand_give_way,
            impatient: false,
        };

        if group_move && self.selection.len() > 1 && !run_away {
            match self.sim.group_move(self.selection.as_slice(), order) {
                Ok(()) => debug!(target: "orders", units = self.selection.len(), %target, "group move issued"),
                Err(err) => refused(&err, self.selection.front(), "group move"),
            }
            return;
        }

        let order = MoveOrder {
            impatient: run_away,
            ..order
        };
        for unit in self.selection.iter() {
            match self.sim.move_to(unit, order) {
                Ok(()) => debug!(target: "orders", %unit, %target, "going to location"),
                Err(err) => refused(&err, Some(unit), "move"),
            }
        }
    }

    pub fn turn(&mut self, target: TilePos) {
        for unit in self.selection.iter() {
            match self.sim.turn_to(unit, target) {
                Ok(()) => debug!(target: "orders", %unit, %target, "turning to face location"),
                Err(err) => refused(&err, Some(unit), "turn"),
            }
        }
    }

    pub fn throw(&mut self, target: TilePos, hand: Hand) -> OrderOutcome {
        let Some(unit) = self.front() else {
            return OrderOutcome::Done;
        };
        if self.sim.hand_item(unit, hand).is_none() {
            return OrderOutcome::Done;
        }
        match self.sim.throw_item(unit, hand, target) {
            Ok(()) => {
                debug!(target: "orders", %unit, %hand, %target, "throwing item");
                OrderOutcome::Completed
            }
            Err(err) => {
                refused(&err, Some(unit), "throw");
                OrderOutcome::Refused
            }
        }
    }

    /// Use the item in `hand`. `automatic` skips interactive steps such as the
    /// priming panel; items without an automatic use ignore it.
    pub fn use_item(&mut self, hand: Hand, automatic: bool) -> OrderOutcome {
        let Some(unit) = self.front() else {
            return OrderOutcome::Done;
        };
        let Some(item) = self.sim.hand_item(unit, hand) else {
            return OrderOutcome::Done;
        };

        match item.kind {
            ItemKind::Weapon => {
                if !item.can_fire || automatic {
                    return OrderOutcome::Done;
                }
                OrderOutcome::Enter(InteractionMode::fire(hand))
            }
            ItemKind::Grenade if automatic => {
                if !item.primed {
                    if let Err(err) = self.sim.prime_item(unit, hand, Priming::Default) {
                        refused(&err, Some(unit), "priming");
                        return OrderOutcome::Done;
                    }
                }
                OrderOutcome::Enter(InteractionMode::throw(hand))
            }
            ItemKind::Grenade if item.primed => OrderOutcome::Done,
            ItemKind::Grenade => OrderOutcome::OpenPriming {
                hand,
                trigger: item.trigger,
            },
            ItemKind::MindBender => OrderOutcome::OpenPsi { hand },
            ItemKind::Teleporter => OrderOutcome::Enter(InteractionMode::teleport(hand)),
            ItemKind::MotionScanner | ItemKind::MediKit if automatic => OrderOutcome::Done,
            kind @ (ItemKind::MotionScanner | ItemKind::MediKit) => {
                self.activate(unit, hand, kind);
                OrderOutcome::Done
            }
            kind if kind.is_single_shot_use() => {
                self.activate(unit, hand, kind);
                OrderOutcome::Done
            }
            _ => OrderOutcome::Done,
        }
    }

    fn activate(&mut self, unit: UnitId, hand: Hand, kind: ItemKind) {
        match self.sim.use_item(unit, hand) {
            Ok(()) => debug!(target: "orders", %unit, %kind, "item used"),
            Err(err) => refused(&err, Some(unit), "item use"),
        }
    }

    /// Drop what `hand` holds, or pick up the first floor item into it.
    pub fn drop_or_pick_up(&mut self, hand: Hand, pickup_cost: i32) {
        let Some(unit) = self.front().and_then(|id| self.sim.unit(id)) else {
            return;
        };
        if !unit.has_inventory {
            return;
        }

        if self.sim.hand_item(unit.id, hand).is_some() {
            match self.sim.drop_item(unit.id, hand) {
                Ok(()) => debug!(target: "orders", unit = %unit.id, %hand, "dropping item"),
                Err(err) => refused(&err, Some(unit.id), "drop"),
            }
            return;
        }

        let Some(item) = self.sim.floor_items(unit.tile).first().copied() else {
            return;
        };
        if self.sim.spend_time_units(unit.id, pickup_cost).is_err() {
            return;
        }
        if let Err(err) = self.sim.pick_up(unit.id, item, hand) {
            refused(&err, Some(unit.id), "pick up");
        }
    }

    /// Every selected unit attacks a tile.
    pub fn fire_at_tile(&mut self, target: TilePos, status: WeaponStatus, modified: bool) {
        for unit in self.selection.iter() {
            if let Err(err) = self.sim.attack_tile(unit, target, status, modified) {
                warn!(target: "orders", %unit, %err, "insufficient TU to fire");
            }
        }
    }

    /// Attack a unit: both-hands fire involves the whole selection, a single
    /// hand only the front unit. Without a line of fire the shot goes at the
    /// target's tile when `forced`, otherwise the player is told.
    pub fn fire_at_unit(&mut self, target: UnitId, status: WeaponStatus, forced: bool) {
        if self.selection.is_empty() {
            return;
        }
        let Some(target_tile) = self.sim.unit(target).map(|u| u.tile) else {
            return;
        };

        let shooters: Vec<UnitId> = if status == WeaponStatus::FiringBothHands {
            self.selection.iter().collect()
        } else {
            self.front().into_iter().collect()
        };

        let mut no_line_of_fire = false;
        for shooter in shooters {
            let result = if self.sim.has_line_to_unit(shooter, target) {
                self.sim.attack_unit(shooter, target, status)
            } else if forced {
                self.sim.attack_tile(shooter, target_tile, status, false)
            } else {
                no_line_of_fire = true;
                continue;
            };
            if let Err(err) = result {
                warn!(target: "orders", unit = %shooter, %err, "insufficient TU to fire");
            }
        }
        if no_line_of_fire {
            self.sim.notify_no_line_of_fire(target);
        }
    }

    /// Real-time only: redirect auto-engagement of every selected unit.
    pub fn focus(&mut self, target: UnitId) {
        for unit in self.selection.iter() {
            if let Err(err) = self.sim.set_focus(unit, target) {
                refused(&err, Some(unit), "focus");
            }
        }
    }

    pub fn cancel_psi(&mut self) {
        if let Some(unit) = self.front() {
            self.sim.stop_psi(unit);
        }
    }

    pub fn psi_attack(&mut self, target: UnitId, status: PsiStatus, hand: Hand) -> OrderOutcome {
        let Some(unit) = self.front() else {
            return OrderOutcome::Done;
        };
        let Some(item) = self
            .sim
            .hand_item(unit, hand)
            .filter(|item| item.kind == ItemKind::MindBender)
        else {
            debug!(target: "orders", %unit, %hand, "psi attack without a mind bender");
            return OrderOutcome::Done;
        };
        match self.sim.psi_attack(unit, target, status, item.type_id) {
            Ok(()) => {
                debug!(target: "orders", %unit, %target, %status, "psi attack started");
                OrderOutcome::Completed
            }
            Err(err) => {
                refused(&err, Some(unit), "psi attack");
                OrderOutcome::Done
            }
        }
    }

    /// Teleport the front unit. In debug mode a unit without a teleporter is
    /// handed one first.
    pub fn teleport(&mut self, target: TilePos, hand: Hand, debug_mode: bool) -> OrderOutcome {
        let Some(unit) = self.front() else {
            return OrderOutcome::Done;
        };
        let has_teleporter = self
            .sim
            .hand_item(unit, hand)
            .is_some_and(|item| item.kind == ItemKind::Teleporter);
        if !has_teleporter {
            if !debug_mode {
                warn!(target: "orders", %unit, %hand, "no teleporter in hand");
                return OrderOutcome::Refused;
            }
            warn!(target: "orders", %unit, "using teleporter cheat");
            self.sim.grant_teleporter(unit, hand);
        }
        match self.sim.teleport(unit, hand, target) {
            Ok(()) => {
                debug!(target: "orders", %unit, %hand, %target, "teleported");
                OrderOutcome::Completed
            }
            Err(err) => {
                warn!(target: "orders", %unit, %hand, %err, "could not teleport");
                OrderOutcome::Refused
            }
        }
    }

    pub fn heal(&mut self, part: BodyPart) {
        let Some(unit) = self.front() else {
            return;
        };
        if let Err(err) = self.sim.use_medikit(unit, part) {
            refused(&err, Some(unit), "medikit");
        }
    }

    pub fn jump(&mut self, target: TilePos) {
        if let Some(unit) = self.front() {
            self.sim.jump(unit, target, BodyState::Standing);
        }
    }
}

/// Logs a mission the simulation turned down, louder the less expected it is.
pub(crate) fn refused(err: &CommandError, unit: Option<UnitId>, order: &'static str) {
    let code = err.error_code();
    let level = log_level(err);
    if level == Level::ERROR {
        error!(target: "orders", ?unit, order, code, %err, "order refused");
    } else if level == Level::WARN {
        warn!(target: "orders", ?unit, order, code, %err, "order refused");
    } else {
        debug!(target: "orders", ?unit, order, code, %err, "order refused");
    }
}
