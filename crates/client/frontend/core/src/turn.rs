//! Turn ownership tracking for turn-based battles.
//!
//! Once per frame [`TurnSynchronizer::update`] decides whether the player may
//! act, walks the end-turn confirmation for units with unfinished moves, and
//! advances the simulation. While the other side acts unseen the view cuts
//! away to a placeholder and fast-forwards.

use std::collections::BTreeSet;

use battle_core::{OrgId, Simulation, TilePos, UnitId};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::camera::UpdateSpeed;
use crate::config::TurnConfig;
use crate::selection::SelectionSet;

/// Number of cut-away background pictures to choose from.
pub const HIDDEN_BACKGROUNDS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    MyTurnActive,
    NotMyTurn,
    EndTurnPending,
    /// Waiting for the player to answer the continue prompt for the unit.
    UnitConfirmationPending(UnitId),
    HiddenCutaway,
}

/// Something the view has to act on after a synchronizer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnSignal {
    /// Control passed away from the player; the selection was stashed.
    Yielded,
    /// Control returned; the stashed selection is back.
    Regained,
    /// Ask whether the unit should carry on with its remaining move.
    Prompt(UnitId),
    FocusCamera(TilePos),
}

/// Placeholder content shown while the cut-away is up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cutaway {
    pub turn: u32,
    pub side: String,
    pub player: &'static str,
    pub background: usize,
}

#[derive(Debug)]
pub struct TurnSynchronizer {
    config: TurnConfig,
    not_my_turn: bool,
    end_turn_requested: bool,
    pending: Option<UnitId>,
    /// Units already offered a continuation during this end-turn attempt.
    skipped: BTreeSet<UnitId>,
    saved_selection: SelectionSet,
    hidden: bool,
    background: usize,
    rng: StdRng,
}

impl TurnSynchronizer {
    pub fn new(config: TurnConfig, rng: StdRng) -> Self {
        Self {
            config,
            not_my_turn: false,
            end_turn_requested: false,
            pending: None,
            skipped: BTreeSet::new(),
            saved_selection: SelectionSet::new(),
            hidden: false,
            background: 0,
            rng,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        if self.hidden {
            TurnPhase::HiddenCutaway
        } else if let Some(unit) = self.pending {
            TurnPhase::UnitConfirmationPending(unit)
        } else if self.end_turn_requested {
            TurnPhase::EndTurnPending
        } else if self.not_my_turn {
            TurnPhase::NotMyTurn
        } else {
            TurnPhase::MyTurnActive
        }
    }

    pub fn is_my_turn(&self) -> bool {
        !self.not_my_turn
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn pending_unit(&self) -> Option<UnitId> {
        self.pending
    }

    pub fn skipped(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.skipped.iter().copied()
    }

    /// Selection to restore once the player regains control.
    pub fn saved_selection(&self) -> &SelectionSet {
        &self.saved_selection
    }

    pub fn request_end_turn(&mut self) {
        if !self.end_turn_requested {
            info!(target: "turn", "end turn requested");
        }
        self.end_turn_requested = true;
    }

    /// Answer to the continue prompt. Yes lets the unit carry on; no ends
    /// the turn without asking about anyone else.
    pub fn answer<S>(&mut self, sim: &mut S, carry_on: bool)
    where
        S: Simulation + ?Sized,
    {
        let Some(unit) = self.pending.take() else {
            debug!(target: "turn", "continue answer without a pending unit");
            return;
        };
        if carry_on {
            debug!(target: "turn", %unit, "unit continues its move");
            sim.drop_pending_step(unit);
        } else {
            self.open_turn_gate(sim);
        }
    }

    /// One frame of turn bookkeeping followed by the simulation ticks.
    pub fn update<S>(
        &mut self,
        sim: &mut S,
        selection: &mut SelectionSet,
        speed: UpdateSpeed,
    ) -> Vec<TurnSignal>
    where
        S: Simulation + ?Sized,
    {
        let mut signals = Vec::new();
        let turn_based = sim.mode().is_turn_based();

        if turn_based {
            self.sync_ownership(sim, selection, &mut signals);
            self.confirm_unfinished_moves(sim, &mut signals);
            self.maybe_hide(sim);
        }

        let ticks = if self.hidden {
            self.config.hidden_catchup_ticks
        } else {
            speed.ticks()
        };
        for _ in 0..ticks {
            sim.step();
            if self.hidden && self.try_unhide(sim, &mut signals) {
                break;
            }
        }
        signals
    }

    pub fn cutaway<S>(&self, sim: &S) -> Option<Cutaway>
    where
        S: Simulation + ?Sized,
    {
        self.hidden.then(|| Cutaway {
            turn: sim.turn(),
            side: sim.org_name(sim.active_org()),
            player: "Computer",
            background: self.background,
        })
    }

    fn not_my_turn<S>(&self, sim: &S) -> bool
    where
        S: Simulation + ?Sized,
    {
        self.end_turn_requested
            || sim.turn_end_allowed()
            || sim.interrupts_pending()
            || sim.active_org() != sim.current_player()
    }

    fn sync_ownership<S>(
        &mut self,
        sim: &S,
        selection: &mut SelectionSet,
        signals: &mut Vec<TurnSignal>,
    ) where
        S: Simulation + ?Sized,
    {
        let not_my_turn = self.not_my_turn(sim);
        if not_my_turn == self.not_my_turn {
            return;
        }
        let from = self.phase();
        self.not_my_turn = not_my_turn;
        if not_my_turn {
            self.saved_selection = std::mem::take(selection);
            signals.push(TurnSignal::Yielded);
        } else {
            *selection = self.saved_selection.clone();
            signals.push(TurnSignal::Regained);
        }
        info!(target: "turn", from = ?from, to = ?self.phase(), "turn phase changed");
    }

    fn confirm_unfinished_moves<S>(&mut self, sim: &mut S, signals: &mut Vec<TurnSignal>)
    where
        S: Simulation + ?Sized,
    {
        if !self.end_turn_requested
            || self.pending.is_some()
            || sim.ticks_without_action() < self.config.end_turn_idle_ticks
        {
            return;
        }

        let candidate = sim
            .units_of(sim.active_org())
            .into_iter()
            .find(|unit| unit.continuable_move && !self.skipped.contains(&unit.id));

        match candidate {
            Some(unit) => {
                info!(target: "turn", unit = %unit.id, "offering to continue unfinished move");
                self.pending = Some(unit.id);
                self.skipped.insert(unit.id);
                sim.notify_action();
                signals.push(TurnSignal::Prompt(unit.id));
            }
            None => self.open_turn_gate(sim),
        }
    }

    fn open_turn_gate<S>(&mut self, sim: &mut S)
    where
        S: Simulation + ?Sized,
    {
        info!(target: "turn", skipped = self.skipped.len(), "turn end allowed");
        sim.set_turn_end_allowed(true);
        self.end_turn_requested = false;
        self.skipped.clear();
    }

    fn maybe_hide<S>(&mut self, sim: &S)
    where
        S: Simulation + ?Sized,
    {
        let player = sim.current_player();
        if self.hidden
            || !self.not_my_turn
            || sim.active_org() == player
            || sim.ticks_without_seen_action(player) <= self.config.hide_display_ticks
        {
            return;
        }
        self.hidden = true;
        self.background = self.rng.gen_range(0..HIDDEN_BACKGROUNDS);
        info!(
            target: "turn",
            side = %sim.org_name(sim.active_org()),
            background = self.background,
            "hidden cut-away entered"
        );
    }

    /// Returns true once the cut-away ended.
    fn try_unhide<S>(&mut self, sim: &S, signals: &mut Vec<TurnSignal>) -> bool
    where
        S: Simulation + ?Sized,
    {
        let player: OrgId = sim.current_player();
        let focus = if sim.ticks_without_seen_action(player) == 0 {
            sim.last_seen_action_location(player)
        } else if sim.active_org() == player {
            self.saved_selection
                .front()
                .and_then(|unit| sim.unit(unit))
                .map(|unit| unit.tile)
        } else {
            return false;
        };

        self.hidden = false;
        info!(target: "turn", focus = ?focus, "hidden cut-away left");
        if let Some(tile) = focus {
            signals.push(TurnSignal::FocusCamera(tile));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::mock::{MockBattle, Scripted};
    use battle_core::{TurnOracle, UnitOracle};
    use rand::SeedableRng;

    fn sync() -> TurnSynchronizer {
        let config = TurnConfig {
            end_turn_idle_ticks: 3,
            hide_display_ticks: 5,
            hidden_catchup_ticks: 16,
        };
        TurnSynchronizer::new(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn selection_is_stashed_while_the_enemy_moves() {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
        let mut turns = sync();
        let mut selection = SelectionSet::single(unit);

        battle.active = MockBattle::ALIENS;
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert_eq!(signals, vec![TurnSignal::Yielded]);
        assert!(selection.is_empty());
        assert_eq!(turns.phase(), TurnPhase::NotMyTurn);

        battle.active = MockBattle::PLAYER;
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert_eq!(signals, vec![TurnSignal::Regained]);
        assert_eq!(selection.front(), Some(unit));
        assert_eq!(turns.phase(), TurnPhase::MyTurnActive);
    }

    #[test]
    fn yes_lets_the_unit_continue_and_asks_again_later() {
        let mut battle = MockBattle::turn_based();
        let a = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
        let b = battle.spawn(2, MockBattle::PLAYER, TilePos::new(2, 1, 0));
        battle.unit_mut(a).unwrap().continuable_move = true;
        battle.unit_mut(b).unwrap().continuable_move = true;
        battle.ticks_without_action = 10;

        let mut turns = sync();
        let mut selection = SelectionSet::new();
        turns.request_end_turn();
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert!(signals.contains(&TurnSignal::Prompt(a)));
        assert_eq!(battle.ticks_without_action(), 0);

        turns.answer(&mut battle, true);
        assert!(!battle.unit(a).unwrap().continuable_move);
        assert_eq!(turns.phase(), TurnPhase::EndTurnPending);

        battle.ticks_without_action = 10;
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert_eq!(signals, vec![TurnSignal::Prompt(b)]);
    }

    #[test]
    fn no_candidates_open_the_gate() {
        let mut battle = MockBattle::turn_based();
        battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
        battle.ticks_without_action = 10;

        let mut turns = sync();
        let mut selection = SelectionSet::new();
        turns.request_end_turn();
        turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert!(battle.turn_end_allowed());
        assert_eq!(turns.phase(), TurnPhase::NotMyTurn);
    }

    #[test]
    fn real_time_only_ticks() {
        let mut battle = MockBattle::real_time();
        battle.active = MockBattle::ALIENS;
        let mut turns = sync();
        let mut selection = SelectionSet::new();
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Speed3);
        assert!(signals.is_empty());
        assert_eq!(battle.game_ticks(), 4);
        assert!(turns.is_my_turn());
    }

    #[test]
    fn cutaway_ends_when_control_returns() {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(4, 4, 1));
        let mut turns = sync();
        let mut selection = SelectionSet::single(unit);

        battle.active = MockBattle::ALIENS;
        battle.ticks_without_seen_action.insert(MockBattle::PLAYER, 50);
        battle.schedule(20, Scripted::TurnTo(MockBattle::PLAYER));
        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert_eq!(signals, vec![TurnSignal::Yielded]);
        assert_eq!(turns.phase(), TurnPhase::HiddenCutaway);
        assert_eq!(battle.game_ticks(), 16);
        let cutaway = turns.cutaway(&battle).unwrap();
        assert_eq!(cutaway.side, "Aliens");
        assert!(cutaway.background < HIDDEN_BACKGROUNDS);

        let signals = turns.update(&mut battle, &mut selection, UpdateSpeed::Pause);
        assert_eq!(signals, vec![TurnSignal::FocusCamera(TilePos::new(4, 4, 1))]);
        assert!(!turns.is_hidden());
        assert_eq!(battle.game_ticks(), 20, "catch-up stops as soon as the cut-away ends");
    }
}
