//! Soldier order buttons: fire permission, aiming, stance, movement,
//! behaviour and turn-based reserves, plus the per-hand throw buttons.

use battle_core::{
    AimingMode, BehaviorMode, FirePermission, Hand, KneelingMode, MovementMode, ReserveShotMode,
    Simulation, UnitView,
};
use tracing::debug;

use crate::mode::InteractionMode;

/// Aggregated state of a toggle across the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TriState {
    #[default]
    Off,
    On,
    /// Some selected units have it set, some do not.
    Mixed,
}

impl TriState {
    fn from_flags(set: bool, unset: bool) -> Self {
        match (set, unset) {
            (true, true) => Self::Mixed,
            (true, false) => Self::On,
            _ => Self::Off,
        }
    }
}

/// Button states for the current selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoldierButtons {
    pub cease_fire: TriState,
    pub aimed: bool,
    pub snap: bool,
    pub auto: bool,
    pub kneel: TriState,
    pub prone: bool,
    pub walk: bool,
    pub run: bool,
    pub evasive: bool,
    pub normal: bool,
    pub aggressive: bool,
    pub reserve_aimed: TriState,
    pub reserve_snap: TriState,
    pub reserve_auto: TriState,
    pub reserve_kneel: TriState,
    pub throw_left: bool,
    pub throw_right: bool,
}

impl SoldierButtons {
    /// `units` in selection order; the first is the front unit.
    pub fn aggregate(units: &[UnitView], mode: InteractionMode, throws: &ThrowButtons) -> Self {
        let mut buttons = Self::default();
        let (mut cease, mut at_will) = (false, false);
        let (mut kneeling, mut standing) = (false, false);
        let (mut reserve_aimed, mut reserve_snap, mut reserve_auto, mut no_reserve) =
            (false, false, false, false);
        let (mut reserve_kneel, mut no_reserve_kneel) = (false, false);

        for unit in units {
            match unit.aiming {
                AimingMode::Aimed => buttons.aimed = true,
                AimingMode::Snap => buttons.snap = true,
                AimingMode::Auto => buttons.auto = true,
            }
            match unit.fire_permission {
                FirePermission::CeaseFire => cease = true,
                FirePermission::AtWill => at_will = true,
            }
            match unit.behavior {
                BehaviorMode::Evasive => buttons.evasive = true,
                BehaviorMode::Normal => buttons.normal = true,
                BehaviorMode::Aggressive => buttons.aggressive = true,
            }
            match unit.movement_mode {
                MovementMode::Prone => buttons.prone = true,
                MovementMode::Walking => buttons.walk = true,
                MovementMode::Running => buttons.run = true,
            }
            match unit.kneeling {
                KneelingMode::Kneeling => kneeling = true,
                KneelingMode::None => standing = true,
            }
            match unit.reserve_shot {
                ReserveShotMode::Aimed => reserve_aimed = true,
                ReserveShotMode::Snap => reserve_snap = true,
                ReserveShotMode::Auto => reserve_auto = true,
                ReserveShotMode::None => no_reserve = true,
            }
            match unit.reserve_kneel {
                KneelingMode::Kneeling => reserve_kneel = true,
                KneelingMode::None => no_reserve_kneel = true,
            }
        }

        buttons.cease_fire = TriState::from_flags(cease, at_will);
        buttons.kneel = TriState::from_flags(kneeling, standing);
        buttons.reserve_aimed = TriState::from_flags(reserve_aimed, no_reserve);
        buttons.reserve_snap = TriState::from_flags(reserve_snap, no_reserve);
        buttons.reserve_auto = TriState::from_flags(reserve_auto, no_reserve);
        buttons.reserve_kneel = TriState::from_flags(reserve_kneel, no_reserve_kneel);

        let throwing = units.first().is_some_and(|front| front.throwing);
        buttons.throw_left =
            mode == InteractionMode::ThrowLeft || throws.highlighted(Hand::Left) || throwing;
        buttons.throw_right =
            mode == InteractionMode::ThrowRight || throws.highlighted(Hand::Right) || throwing;
        buttons
    }
}

/// Standing-order change applied to every selected unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostureCommand {
    /// Cease fire if anyone fires at will, otherwise fire at will.
    ToggleCeaseFire,
    SetAiming(AimingMode),
    /// Kneel if anyone stands, otherwise stand up.
    ToggleKneel,
    SetMovement(MovementMode),
    SetBehavior(BehaviorMode),
    /// Clear the reserve if anyone reserves this mode, otherwise reserve it.
    ToggleReserveShot(ReserveShotMode),
    ToggleReserveKneel,
}

/// Applies `command` to `units`.
pub fn apply_posture<S>(sim: &mut S, units: &[UnitView], command: PostureCommand)
where
    S: Simulation + ?Sized,
{
    match command {
        PostureCommand::ToggleCeaseFire => {
            let at_will = units
                .iter()
                .any(|u| u.fire_permission == FirePermission::AtWill);
            let next = if at_will {
                FirePermission::CeaseFire
            } else {
                FirePermission::AtWill
            };
            for unit in units {
                sim.set_fire_permission(unit.id, next);
            }
        }
        PostureCommand::SetAiming(mode) => {
            for unit in units {
                sim.set_aiming(unit.id, mode);
            }
        }
        PostureCommand::ToggleKneel => {
            let standing = units.iter().any(|u| u.kneeling == KneelingMode::None);
            let next = if standing {
                KneelingMode::Kneeling
            } else {
                KneelingMode::None
            };
            for unit in units {
                sim.set_kneeling(unit.id, next);
            }
        }
        PostureCommand::SetMovement(mode) => {
            for unit in units {
                sim.set_movement_mode(unit.id, mode);
            }
        }
        PostureCommand::SetBehavior(mode) => {
            for unit in units {
                sim.set_behavior(unit.id, mode);
            }
        }
        PostureCommand::ToggleReserveShot(mode) => {
            let pushed = units.iter().any(|u| u.reserve_shot == mode);
            let next = if pushed { ReserveShotMode::None } else { mode };
            for unit in units {
                sim.set_reserve_shot(unit.id, next);
            }
        }
        PostureCommand::ToggleReserveKneel => {
            let pushed = units
                .iter()
                .any(|u| u.reserve_kneel == KneelingMode::Kneeling);
            let next = if pushed {
                KneelingMode::None
            } else {
                KneelingMode::Kneeling
            };
            for unit in units {
                sim.set_reserve_kneel(unit.id, next);
            }
        }
    }
    debug!(target: "orders", ?command, units = units.len(), "posture changed");
}

/// Per-hand throw buttons. A press without anything to throw lights the
/// button briefly instead of entering the throw mode.
#[derive(Clone, Copy, Debug)]
pub struct ThrowButtons {
    left: u32,
    right: u32,
    delay: u32,
}

impl ThrowButtons {
    pub fn new(delay: u32) -> Self {
        Self {
            left: 0,
            right: 0,
            delay,
        }
    }

    /// `front` is the front unit and whether it holds something in `hand`.
    pub fn press(&mut self, hand: Hand, front: Option<(&UnitView, bool)>) -> Option<InteractionMode> {
        match front {
            Some((unit, true)) if unit.has_inventory => Some(InteractionMode::throw(hand)),
            _ => {
                *self.slot(hand) = self.delay;
                None
            }
        }
    }

    pub fn highlighted(&self, hand: Hand) -> bool {
        match hand {
            Hand::Left => self.left > 0,
            Hand::Right => self.right > 0,
        }
    }

    /// Once per frame.
    pub fn tick(&mut self) {
        self.left = self.left.saturating_sub(1);
        self.right = self.right.saturating_sub(1);
    }

    fn slot(&mut self, hand: Hand) -> &mut u32 {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::mock::MockBattle;
    use battle_core::{TilePos, UnitOracle};

    fn two_soldiers() -> (MockBattle, Vec<UnitView>) {
        let mut battle = MockBattle::turn_based();
        let a = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 0, 0));
        let b = battle.spawn(2, MockBattle::PLAYER, TilePos::new(2, 0, 0));
        battle.unit_mut(b).unwrap().fire_permission = FirePermission::CeaseFire;
        let units = [a, b].iter().filter_map(|id| battle.unit(*id)).collect();
        (battle, units)
    }

    #[test]
    fn mixed_selection_shows_mixed_state() {
        let (_, units) = two_soldiers();
        let buttons = SoldierButtons::aggregate(&units, InteractionMode::Normal, &ThrowButtons::new(5));
        assert_eq!(buttons.cease_fire, TriState::Mixed);
        assert_eq!(buttons.kneel, TriState::Off);
        assert_eq!(buttons.reserve_aimed, TriState::Off);
        assert!(buttons.normal && buttons.walk && buttons.aimed);
        assert!(!buttons.run && !buttons.throw_left);

        let buttons = SoldierButtons::aggregate(&units[1..], InteractionMode::ThrowRight, &ThrowButtons::new(5));
        assert_eq!(buttons.cease_fire, TriState::On);
        assert!(buttons.throw_right);
    }

    #[test]
    fn toggles_flip_the_whole_selection() {
        let (mut battle, units) = two_soldiers();
        apply_posture(&mut battle, &units, PostureCommand::ToggleCeaseFire);
        assert!(
            units
                .iter()
                .all(|u| battle.unit(u.id).unwrap().fire_permission == FirePermission::CeaseFire)
        );

        let units: Vec<_> = units.iter().filter_map(|u| battle.unit(u.id)).collect();
        apply_posture(&mut battle, &units, PostureCommand::ToggleCeaseFire);
        assert!(
            units
                .iter()
                .all(|u| battle.unit(u.id).unwrap().fire_permission == FirePermission::AtWill)
        );
    }

    #[test]
    fn reserve_toggle_clears_when_anyone_reserves() {
        let (mut battle, units) = two_soldiers();
        battle.unit_mut(units[0].id).unwrap().reserve_shot = ReserveShotMode::Snap;
        let units: Vec<_> = units.iter().filter_map(|u| battle.unit(u.id)).collect();
        apply_posture(&mut battle, &units, PostureCommand::ToggleReserveShot(ReserveShotMode::Snap));
        assert!(
            units
                .iter()
                .all(|u| battle.unit(u.id).unwrap().reserve_shot == ReserveShotMode::None)
        );

        apply_posture(&mut battle, &units, PostureCommand::SetMovement(MovementMode::Running));
        apply_posture(&mut battle, &units, PostureCommand::ToggleKneel);
        let front = battle.unit(units[0].id).unwrap();
        assert_eq!(front.movement_mode, MovementMode::Running);
        assert_eq!(front.kneeling, KneelingMode::Kneeling);
    }

    #[test]
    fn throw_button_latches_without_an_item() {
        let (_, units) = two_soldiers();
        let mut throws = ThrowButtons::new(2);

        assert_eq!(throws.press(Hand::Left, None), None);
        assert!(throws.highlighted(Hand::Left));
        assert!(!throws.highlighted(Hand::Right));
        throws.tick();
        throws.tick();
        assert!(!throws.highlighted(Hand::Left));

        assert_eq!(throws.press(Hand::Right, Some((&units[0], false))), None);
        assert_eq!(
            throws.press(Hand::Right, Some((&units[0], true))),
            Some(InteractionMode::ThrowRight)
        );
    }
}
