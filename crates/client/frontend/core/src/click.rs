//! Map click resolution.
//!
//! A click on the map becomes a [`ClickAction`] according to the current
//! interaction mode, the held modifiers and who stands on the clicked tile.
//! Resolution only reads the simulation; the view carries the action out.

use battle_core::{
    BattleMode, Hand, PsiStatus, Relation, Simulation, TilePos, UnitId, UnitView, WeaponStatus,
};
use crossterm::event::MouseButton;
use tracing::debug;

use crate::input::ModifierKeys;
use crate::mode::InteractionMode;
use crate::selection::SelectFlags;

/// Units of interest on the clicked tile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTargets {
    /// Some unit's body fills the tile.
    pub occupied: bool,
    /// Unit an attack order would aim at.
    pub attack: Option<UnitView>,
    /// Own unit a select order would pick.
    pub selection: Option<UnitId>,
}

impl ClickTargets {
    pub fn resolve<S>(sim: &S, tile: TilePos) -> Self
    where
        S: Simulation + ?Sized,
    {
        let player = sim.current_player();
        let occupying: Vec<UnitView> = sim
            .units_occupying(tile)
            .into_iter()
            .filter_map(|id| sim.unit(id))
            .collect();
        let present: Vec<UnitView> = sim
            .units_present(tile)
            .into_iter()
            .filter_map(|id| sim.unit(id))
            .collect();

        let hostile_visible = |unit: &&UnitView| {
            sim.relation(player, unit.owner) == Relation::Hostile
                && sim.is_visible_to(player, unit.id)
        };
        let attack = occupying
            .iter()
            .find(hostile_visible)
            .or_else(|| present.iter().find(hostile_visible))
            .or_else(|| {
                occupying
                    .first()
                    .or_else(|| present.first())
                    .filter(|unit| unit.owner == player || sim.is_visible_to(player, unit.id))
            })
            .cloned();

        let selectable = |unit: &&UnitView| unit.is_controllable_by(player);
        let selection = occupying
            .iter()
            .find(selectable)
            .or_else(|| present.iter().find(selectable))
            .map(|unit| unit.id);

        Self {
            occupied: !occupying.is_empty(),
            attack,
            selection,
        }
    }

    fn hostile_attack<S>(&self, sim: &S) -> Option<&UnitView>
    where
        S: Simulation + ?Sized,
    {
        self.attack
            .as_ref()
            .filter(|unit| sim.relation(sim.current_player(), unit.owner) == Relation::Hostile)
    }
}

/// View state a click is interpreted against.
#[derive(Clone, Copy, Debug)]
pub struct ClickContext {
    pub mode: InteractionMode,
    pub modifiers: ModifierKeys,
    pub front: Option<UnitId>,
    /// Hand remembered by the psi panel.
    pub psi_hand: Hand,
    pub strategy_map: bool,
    pub debug_mode: bool,
}

/// What a map click asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    None,
    Select {
        unit: UnitId,
        flags: SelectFlags,
    },
    Move {
        target: TilePos,
        strafe: bool,
        demand_give_way: bool,
    },
    Turn(TilePos),
    FireAtUnit {
        target: UnitId,
        status: WeaponStatus,
        forced: bool,
    },
    FireAtTile {
        target: TilePos,
        status: WeaponStatus,
        modified: bool,
    },
    Focus(UnitId),
    Throw {
        target: TilePos,
        hand: Hand,
    },
    Teleport {
        target: TilePos,
        hand: Hand,
    },
    PsiAttack {
        target: UnitId,
        status: PsiStatus,
        hand: Hand,
    },
    /// Leave the current aiming mode for `Normal`.
    CancelMode,
    /// Leave psi targeting and clear the psi panel choice.
    LeavePsi,
    CenterOn(TilePos),
    /// Cheat: enter teleport targeting without a teleporter.
    CheatTeleport,
}

/// Resolves a map click against the current mode.
pub fn resolve_click<S>(
    sim: &S,
    context: &ClickContext,
    button: MouseButton,
    tile: TilePos,
) -> ClickAction
where
    S: Simulation + ?Sized,
{
    if button == MouseButton::Middle {
        return if context.strategy_map {
            ClickAction::CenterOn(tile)
        } else if context.debug_mode && context.front.is_some() {
            ClickAction::CheatTeleport
        } else {
            ClickAction::None
        };
    }

    let targets = ClickTargets::resolve(sim, tile);
    let left = button == MouseButton::Left;
    let mode = context.mode;
    debug!(target: "view", %tile, ?mode, ?button, "map click");

    match mode {
        InteractionMode::Normal | InteractionMode::NormalAlt => {
            let strafe = mode == InteractionMode::NormalAlt;
            if left {
                let move_to = ClickAction::Move {
                    target: tile,
                    strafe,
                    demand_give_way: false,
                };
                match targets.selection {
                    Some(_) if !targets.occupied && context.front.is_some() => move_to,
                    Some(unit) => ClickAction::Select {
                        unit,
                        flags: SelectFlags::REPLACE,
                    },
                    None if !targets.occupied => move_to,
                    None => ClickAction::None,
                }
            } else {
                match targets.hostile_attack(sim) {
                    Some(enemy) if !strafe => match sim.mode() {
                        BattleMode::TurnBased => ClickAction::FireAtUnit {
                            target: enemy.id,
                            status: WeaponStatus::FiringBothHands,
                            forced: context.modifiers.shift(),
                        },
                        BattleMode::RealTime if enemy.conscious => ClickAction::Focus(enemy.id),
                        BattleMode::RealTime => ClickAction::None,
                    },
                    _ => ClickAction::Turn(tile),
                }
            }
        }
        InteractionMode::NormalCtrl | InteractionMode::NormalCtrlAlt => {
            log_tile_info(sim, tile);
            match (left, targets.selection) {
                (true, Some(unit)) => ClickAction::Select {
                    unit,
                    flags: SelectFlags::ADD,
                },
                (true, None) if !targets.occupied && mode == InteractionMode::NormalCtrlAlt => {
                    ClickAction::Move {
                        target: tile,
                        strafe: false,
                        demand_give_way: true,
                    }
                }
                (false, Some(unit)) => ClickAction::Select {
                    unit,
                    flags: SelectFlags::REMOVE,
                },
                _ => ClickAction::None,
            }
        }
        InteractionMode::FireAny | InteractionMode::FireLeft | InteractionMode::FireRight => {
            if !left {
                return if mode == InteractionMode::FireAny {
                    ClickAction::None
                } else {
                    ClickAction::CancelMode
                };
            }
            let status = mode.weapon_status();
            let modified = context.modifiers.alt();
            match &targets.attack {
                Some(unit) if !modified => ClickAction::FireAtUnit {
                    target: unit.id,
                    status,
                    forced: context.modifiers.shift(),
                },
                _ => ClickAction::FireAtTile {
                    target: tile,
                    status,
                    modified,
                },
            }
        }
        InteractionMode::ThrowLeft | InteractionMode::ThrowRight => match mode.hand() {
            Some(hand) if left => ClickAction::Throw { target: tile, hand },
            _ => ClickAction::CancelMode,
        },
        InteractionMode::TeleportLeft | InteractionMode::TeleportRight => match mode.hand() {
            Some(hand) if left => ClickAction::Teleport { target: tile, hand },
            _ => ClickAction::CancelMode,
        },
        InteractionMode::PsiControl
        | InteractionMode::PsiPanic
        | InteractionMode::PsiStun
        | InteractionMode::PsiProbe => {
            if !left {
                return ClickAction::LeavePsi;
            }
            match &targets.attack {
                Some(unit) if Some(unit.id) != context.front => ClickAction::PsiAttack {
                    target: unit.id,
                    status: mode.psi_status(),
                    hand: context.psi_hand,
                },
                _ => ClickAction::None,
            }
        }
    }
}

fn log_tile_info<S>(sim: &S, tile: TilePos)
where
    S: Simulation + ?Sized,
{
    let units = sim.units_present(tile);
    debug!(
        target: "view",
        %tile,
        stand = sim.can_stand(tile, false),
        pass = sim.is_passable(tile, false, 0),
        exit = sim.has_exit(tile),
        ?units,
        items = sim.floor_items(tile).len(),
        "tile debug information"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::mock::MockBattle;
    use battle_core::MoraleState;

    const HERE: TilePos = TilePos::new(3, 3, 0);

    fn context(mode: InteractionMode, front: Option<UnitId>) -> ClickContext {
        ClickContext {
            mode,
            modifiers: ModifierKeys::empty(),
            front,
            psi_hand: Hand::Right,
            strategy_map: false,
            debug_mode: false,
        }
    }

    #[test]
    fn attack_target_prefers_visible_hostiles() {
        let mut battle = MockBattle::turn_based();
        let friend = battle.spawn(1, MockBattle::PLAYER, HERE);
        let alien = battle.spawn(2, MockBattle::ALIENS, HERE);

        let targets = ClickTargets::resolve(&battle, HERE);
        assert_eq!(targets.attack.as_ref().map(|u| u.id), Some(friend), "alien unseen");
        assert_eq!(targets.selection, Some(friend));

        battle.visible.insert((MockBattle::PLAYER, alien));
        let targets = ClickTargets::resolve(&battle, HERE);
        assert_eq!(targets.attack.map(|u| u.id), Some(alien));
        assert!(targets.occupied);
    }

    #[test]
    fn panicked_units_cannot_be_selected() {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, HERE);
        battle.unit_mut(unit).unwrap().morale = MoraleState::Panicked;
        assert_eq!(ClickTargets::resolve(&battle, HERE).selection, None);
    }

    #[test]
    fn normal_left_click_selects_or_moves() {
        let mut battle = MockBattle::turn_based();
        let a = battle.spawn(1, MockBattle::PLAYER, HERE);
        let empty = TilePos::new(5, 5, 0);

        let action = resolve_click(&battle, &context(InteractionMode::Normal, None), MouseButton::Left, HERE);
        assert_eq!(
            action,
            ClickAction::Select {
                unit: a,
                flags: SelectFlags::REPLACE
            }
        );

        let action = resolve_click(
            &battle,
            &context(InteractionMode::NormalAlt, Some(a)),
            MouseButton::Left,
            empty,
        );
        assert_eq!(
            action,
            ClickAction::Move {
                target: empty,
                strafe: true,
                demand_give_way: false
            }
        );
    }

    #[test]
    fn right_click_on_enemy_fires_in_turn_based_and_focuses_in_real_time() {
        let mut battle = MockBattle::turn_based();
        let a = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
        let alien = battle.spawn(2, MockBattle::ALIENS, HERE);
        battle.visible.insert((MockBattle::PLAYER, alien));

        let mut ctx = context(InteractionMode::Normal, Some(a));
        ctx.modifiers = ModifierKeys::LSHIFT;
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Right, HERE),
            ClickAction::FireAtUnit {
                target: alien,
                status: WeaponStatus::FiringBothHands,
                forced: true
            }
        );

        battle.mode = BattleMode::RealTime;
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Right, HERE),
            ClickAction::Focus(alien)
        );

        let ctx = context(InteractionMode::NormalAlt, Some(a));
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Right, HERE),
            ClickAction::Turn(HERE)
        );
    }

    #[test]
    fn ctrl_alt_click_on_empty_tile_demands_give_way() {
        let battle = MockBattle::turn_based();
        let action = resolve_click(
            &battle,
            &context(InteractionMode::NormalCtrlAlt, Some(UnitId(1))),
            MouseButton::Left,
            HERE,
        );
        assert_eq!(
            action,
            ClickAction::Move {
                target: HERE,
                strafe: false,
                demand_give_way: true
            }
        );
        let action = resolve_click(
            &battle,
            &context(InteractionMode::NormalCtrl, Some(UnitId(1))),
            MouseButton::Left,
            HERE,
        );
        assert_eq!(action, ClickAction::None);
    }

    #[test]
    fn fire_modes_cancel_on_right_click_except_fire_any() {
        let battle = MockBattle::turn_based();
        let front = Some(UnitId(1));
        assert_eq!(
            resolve_click(&battle, &context(InteractionMode::FireLeft, front), MouseButton::Right, HERE),
            ClickAction::CancelMode
        );
        assert_eq!(
            resolve_click(&battle, &context(InteractionMode::FireAny, front), MouseButton::Right, HERE),
            ClickAction::None
        );

        let mut ctx = context(InteractionMode::FireRight, front);
        ctx.modifiers = ModifierKeys::RALT;
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Left, HERE),
            ClickAction::FireAtTile {
                target: HERE,
                status: WeaponStatus::FiringRightHand,
                modified: true
            }
        );
    }

    #[test]
    fn psi_click_never_targets_the_caster() {
        let mut battle = MockBattle::turn_based();
        let caster = battle.spawn(1, MockBattle::PLAYER, HERE);
        let ctx = context(InteractionMode::PsiPanic, Some(caster));
        assert_eq!(resolve_click(&battle, &ctx, MouseButton::Left, HERE), ClickAction::None);
        assert_eq!(resolve_click(&battle, &ctx, MouseButton::Right, HERE), ClickAction::LeavePsi);

        let alien = battle.spawn(2, MockBattle::ALIENS, TilePos::new(4, 4, 0));
        battle.visible.insert((MockBattle::PLAYER, alien));
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Left, TilePos::new(4, 4, 0)),
            ClickAction::PsiAttack {
                target: alien,
                status: PsiStatus::Panic,
                hand: Hand::Right
            }
        );
    }

    #[test]
    fn middle_click_is_a_cheat_only_in_debug_mode() {
        let battle = MockBattle::turn_based();
        let mut ctx = context(InteractionMode::Normal, Some(UnitId(1)));
        assert_eq!(resolve_click(&battle, &ctx, MouseButton::Middle, HERE), ClickAction::None);
        ctx.debug_mode = true;
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Middle, HERE),
            ClickAction::CheatTeleport
        );
        ctx.strategy_map = true;
        assert_eq!(
            resolve_click(&battle, &ctx, MouseButton::Middle, HERE),
            ClickAction::CenterOn(HERE)
        );
    }
}
