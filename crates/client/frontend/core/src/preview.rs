//! Throttled move-cost and attack-cost previews for the hovered tile.
//!
//! Both previews are sentinel-coded integers. The presentation layer switches
//! on the exact values, so they are kept as plain `i32` newtypes rather than
//! folded into an error type.

use battle_core::{Hand, MovementMode, Simulation, TilePos, UnitView, WeaponStatus};
use tracing::{debug, error};

use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::mode::InteractionMode;

/// Time units left after moving to the hovered tile, or a sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathCost(i32);

impl PathCost {
    pub const UNCOMPUTED: Self = Self(-1);
    /// Not reachable within the unit's remaining time units.
    pub const TOO_FAR: Self = Self(-2);
    /// Impassable for the unit, or occupied by a known unit.
    pub const BLOCKED: Self = Self(-3);

    pub const fn remaining(time_units: i32) -> Self {
        Self(time_units)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    pub const fn is_computed(self) -> bool {
        self.0 != Self::UNCOMPUTED.0
    }

    /// Time units left on arrival, when reachable.
    pub const fn time_units_left(self) -> Option<i32> {
        if self.0 >= 0 { Some(self.0) } else { None }
    }
}

/// Time-unit cost of attacking the hovered tile, or a sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttackCost(i32);

impl AttackCost {
    pub const UNCOMPUTED: Self = Self(-1);
    /// No line of fire, or target out of range.
    pub const NO_LINE_OF_FIRE: Self = Self(-2);
    /// Only an arcing launcher could reach, and it cannot from here.
    pub const NEEDS_LAUNCHER: Self = Self(-3);
    pub const NO_WEAPON: Self = Self(-4);

    pub const fn cost(time_units: i32) -> Self {
        Self(time_units)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    pub const fn is_computed(self) -> bool {
        self.0 != Self::UNCOMPUTED.0
    }
}

/// Path preview result: sentinel-coded cost plus the tiles to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPreview {
    pub cost: PathCost,
    pub steps: Vec<TilePos>,
}

impl PathPreview {
    fn sentinel(cost: PathCost) -> Self {
        Self {
            cost,
            steps: Vec::new(),
        }
    }
}

/// Movement cost multiplier, doubled to stay integral.
fn cost_multiplier_x2(unit: &UnitView) -> i32 {
    match unit.movement_mode {
        MovementMode::Prone => 3,
        MovementMode::Running if unit.can_run => 1,
        _ => 2,
    }
}

/// Computes the move preview for `unit` towards `target`.
///
/// Returns `Ok(None)` when the unit cannot move at all.
pub fn compute_path_preview<S>(
    sim: &S,
    unit: &UnitView,
    target: TilePos,
) -> Result<Option<PathPreview>, PreviewError>
where
    S: Simulation + ?Sized,
{
    if !unit.can_move {
        return Ok(None);
    }
    let player = sim.current_player();

    // Walk down the column until the unit could stand or fly there.
    let mut tile = target;
    loop {
        let known_occupant = sim.units_occupying(tile).into_iter().next().filter(|id| {
            sim.unit(*id)
                .is_some_and(|u| u.owner == player || sim.is_visible_to(player, *id))
        });
        if known_occupant.is_some() || !sim.is_passable(tile, unit.large, unit.max_height) {
            return Ok(Some(PathPreview::sentinel(PathCost::BLOCKED)));
        }
        if unit.can_fly || sim.can_stand(tile, unit.large) {
            break;
        }
        if tile.z == 0 {
            return Err(PreviewError::NoGround(tile));
        }
        tile = tile.below();
    }

    let multiplier = cost_multiplier_x2(unit);
    let max_cost = (unit.time_units * 2) as f32 / multiplier as f32;
    let path = sim.find_path(unit.id, unit.goal, tile, max_cost);
    if path.steps.is_empty() {
        return Err(PreviewError::EmptyPath {
            unit: unit.id,
            target: tile,
        });
    }

    let reached = path.reaches(tile);
    let mut steps = path.steps;
    let cost = if !reached {
        PathCost::TOO_FAR
    } else {
        let spent = (path.cost * multiplier as f32 / 2.0).round() as i32;
        let left = unit.time_units - spent;
        if left < 0 {
            steps.pop();
            PathCost::TOO_FAR
        } else {
            PathCost::remaining(left)
        }
    };
    if steps.first() == Some(&unit.tile) {
        steps.remove(0);
    }

    Ok(Some(PathPreview { cost, steps }))
}

/// Computes the attack cost preview for the fire mode `mode`.
pub fn compute_attack_cost<S>(
    sim: &S,
    unit: &UnitView,
    mode: InteractionMode,
    target: TilePos,
) -> AttackCost
where
    S: Simulation + ?Sized,
{
    let hand = match mode.weapon_status() {
        WeaponStatus::FiringLeftHand => Hand::Left,
        WeaponStatus::FiringRightHand => Hand::Right,
        WeaponStatus::FiringBothHands => {
            let right_ready = sim
                .hand_item(unit.id, Hand::Right)
                .is_some_and(|item| item.can_fire);
            Hand::from_right(right_ready)
        }
        WeaponStatus::NotFiring => return AttackCost::UNCOMPUTED,
    };

    match sim.hand_item(unit.id, hand) {
        None => AttackCost::NO_WEAPON,
        Some(weapon) if !sim.can_fire_at(unit.id, hand, target) => {
            if weapon.launcher {
                AttackCost::NEEDS_LAUNCHER
            } else {
                AttackCost::NO_LINE_OF_FIRE
            }
        }
        Some(_) => AttackCost::cost(sim.attack_cost(unit.id, hand, target)),
    }
}

/// Idle-tick counter gating an expensive recomputation.
#[derive(Clone, Copy, Debug)]
struct Throttle {
    elapsed: u32,
    threshold: u32,
}

impl Throttle {
    const fn new(threshold: u32) -> Self {
        Self {
            elapsed: 0,
            threshold,
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0;
    }

    /// Counts one idle tick; true once the threshold is exceeded.
    fn advance(&mut self) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        self.elapsed > self.threshold
    }
}

/// Cached previews for the hovered tile and the front unit.
#[derive(Clone, Debug)]
pub struct PreviewCache {
    path: PathCost,
    path_steps: Vec<TilePos>,
    attack: AttackCost,
    path_throttle: Throttle,
    attack_throttle: Throttle,
}

impl PreviewCache {
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            path: PathCost::UNCOMPUTED,
            path_steps: Vec::new(),
            attack: AttackCost::UNCOMPUTED,
            path_throttle: Throttle::new(config.path_delay),
            attack_throttle: Throttle::new(config.attack_delay),
        }
    }

    pub fn path_cost(&self) -> PathCost {
        self.path
    }

    pub fn path_steps(&self) -> &[TilePos] {
        &self.path_steps
    }

    pub fn attack_cost(&self) -> AttackCost {
        self.attack
    }

    pub fn reset_path(&mut self) {
        self.path = PathCost::UNCOMPUTED;
        self.path_steps.clear();
        self.path_throttle.reset();
    }

    pub fn reset_attack(&mut self) {
        self.attack = AttackCost::UNCOMPUTED;
        self.attack_throttle.reset();
    }

    pub fn reset(&mut self) {
        self.reset_path();
        self.reset_attack();
    }

    /// Advances both throttles by one tick and recomputes what is due.
    pub fn tick<S>(
        &mut self,
        sim: &S,
        front: Option<&UnitView>,
        target: TilePos,
        mode: InteractionMode,
    ) where
        S: Simulation + ?Sized,
    {
        if !self.path.is_computed() && self.path_throttle.advance() {
            self.refresh_path(sim, front, target);
        }
        if !self.attack.is_computed() && mode.is_fire() && self.attack_throttle.advance() {
            match front {
                Some(unit) => {
                    self.attack = compute_attack_cost(sim, unit, mode, target);
                    debug!(target: "preview", unit = %unit.id, %target, cost = self.attack.value(), "attack cost computed");
                }
                None => {
                    error!(target: "preview", "attack cost requested with no unit selected");
                    self.attack_throttle.reset();
                }
            }
        }
    }

    fn refresh_path<S>(&mut self, sim: &S, front: Option<&UnitView>, target: TilePos)
    where
        S: Simulation + ?Sized,
    {
        let Some(unit) = front else {
            error!(target: "preview", "path preview requested with no unit selected");
            self.path_throttle.reset();
            return;
        };
        match compute_path_preview(sim, unit, target) {
            Ok(Some(preview)) => {
                debug!(target: "preview", unit = %unit.id, %target, cost = preview.cost.value(), "path preview computed");
                self.path = preview.cost;
                self.path_steps = preview.steps;
            }
            Ok(None) => self.path_throttle.reset(),
            Err(err) => {
                error!(target: "preview", %err, "path preview failed");
                self.path_throttle.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::mock::MockBattle;
    use battle_core::{ItemKind, ItemView, UnitId, UnitOracle};

    fn battle_with_soldier() -> (MockBattle, UnitId) {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::ORIGIN);
        (battle, unit)
    }

    fn rifle() -> ItemView {
        ItemView {
            kind: ItemKind::Weapon,
            can_fire: true,
            ..ItemView::default()
        }
    }

    fn preview(battle: &MockBattle, unit: UnitId, target: TilePos) -> PathPreview {
        let view = battle.unit(unit).unwrap();
        compute_path_preview(battle, &view, target).unwrap().unwrap()
    }

    #[test]
    fn reachable_tile_reports_remaining_time_units() {
        let (battle, unit) = battle_with_soldier();
        let result = preview(&battle, unit, TilePos::new(3, 0, 0));
        assert_eq!(result.cost, PathCost::remaining(40 - 12));
        assert_eq!(result.steps.len(), 3, "start tile is dropped");
    }

    #[test]
    fn exhausting_the_budget_exactly_leaves_zero() {
        let (battle, unit) = battle_with_soldier();
        let result = preview(&battle, unit, TilePos::new(10, 0, 0));
        assert_eq!(result.cost.time_units_left(), Some(0));
    }

    #[test]
    fn distant_tile_is_too_far_never_negative() {
        let (battle, unit) = battle_with_soldier();
        let result = preview(&battle, unit, TilePos::new(15, 0, 0));
        assert_eq!(result.cost, PathCost::TOO_FAR);
        assert_eq!(result.cost.time_units_left(), None);
    }

    #[test]
    fn running_halves_and_prone_raises_cost() {
        let (mut battle, unit) = battle_with_soldier();
        battle.unit_mut(unit).unwrap().movement_mode = MovementMode::Running;
        assert_eq!(
            preview(&battle, unit, TilePos::new(15, 0, 0)).cost,
            PathCost::remaining(40 - 30)
        );

        battle.unit_mut(unit).unwrap().movement_mode = MovementMode::Prone;
        assert_eq!(
            preview(&battle, unit, TilePos::new(4, 0, 0)).cost,
            PathCost::remaining(40 - 24)
        );
    }

    #[test]
    fn hovering_in_the_air_drops_to_the_ground() {
        let (battle, unit) = battle_with_soldier();
        let result = preview(&battle, unit, TilePos::new(2, 0, 3));
        assert_eq!(result.steps.last(), Some(&TilePos::new(2, 0, 0)));
    }

    #[test]
    fn column_without_ground_is_an_error() {
        let (mut battle, unit) = battle_with_soldier();
        battle.holes.insert(TilePos::new(4, 4, 0));
        let view = battle.unit(unit).unwrap();
        let err = compute_path_preview(&battle, &view, TilePos::new(4, 4, 2)).unwrap_err();
        assert_eq!(err, PreviewError::NoGround(TilePos::new(4, 4, 0)));
    }

    #[test]
    fn walls_and_known_units_block() {
        let (mut battle, unit) = battle_with_soldier();
        battle.walls.insert(TilePos::new(1, 1, 0));
        assert_eq!(preview(&battle, unit, TilePos::new(1, 1, 0)).cost, PathCost::BLOCKED);

        let alien = battle.spawn(9, MockBattle::ALIENS, TilePos::new(2, 2, 0));
        assert_ne!(
            preview(&battle, unit, TilePos::new(2, 2, 0)).cost,
            PathCost::BLOCKED,
            "unseen alien does not block the preview"
        );
        battle.visible.insert((MockBattle::PLAYER, alien));
        assert_eq!(preview(&battle, unit, TilePos::new(2, 2, 0)).cost, PathCost::BLOCKED);
    }

    #[test]
    fn immobile_unit_yields_nothing() {
        let (mut battle, unit) = battle_with_soldier();
        battle.unit_mut(unit).unwrap().can_move = false;
        let view = battle.unit(unit).unwrap();
        assert_eq!(compute_path_preview(&battle, &view, TilePos::new(1, 0, 0)), Ok(None));
    }

    #[test]
    fn attack_cost_sentinels() {
        let (mut battle, unit) = battle_with_soldier();
        let target = TilePos::new(5, 5, 0);
        let view = battle.unit(unit).unwrap();

        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireLeft, target),
            AttackCost::NO_WEAPON
        );

        battle.give(unit, Hand::Left, rifle());
        battle.out_of_reach.insert(target);
        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireLeft, target),
            AttackCost::NO_LINE_OF_FIRE
        );

        battle.give(unit, Hand::Left, ItemView { launcher: true, ..rifle() });
        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireLeft, target),
            AttackCost::NEEDS_LAUNCHER
        );

        battle.out_of_reach.clear();
        battle.attack_costs.insert((unit, Hand::Left), 18);
        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireLeft, target),
            AttackCost::cost(18)
        );
    }

    #[test]
    fn both_hands_prefer_a_ready_right_weapon() {
        let (mut battle, unit) = battle_with_soldier();
        let target = TilePos::new(5, 5, 0);
        battle.give(unit, Hand::Left, rifle());
        battle.attack_costs.insert((unit, Hand::Left), 10);
        battle.attack_costs.insert((unit, Hand::Right), 20);
        let view = battle.unit(unit).unwrap();

        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireAny, target),
            AttackCost::cost(10),
            "falls back to the left hand"
        );

        battle.give(unit, Hand::Right, rifle());
        assert_eq!(
            compute_attack_cost(&battle, &view, InteractionMode::FireAny, target),
            AttackCost::cost(20)
        );
    }

    #[test]
    fn cache_waits_for_the_idle_threshold() {
        let (battle, unit) = battle_with_soldier();
        let config = PreviewConfig {
            path_delay: 3,
            attack_delay: 1,
        };
        let mut cache = PreviewCache::new(&config);
        let view = battle.unit(unit).unwrap();
        let target = TilePos::new(2, 0, 0);

        for _ in 0..3 {
            cache.tick(&battle, Some(&view), target, InteractionMode::Normal);
            assert_eq!(cache.path_cost(), PathCost::UNCOMPUTED);
        }
        cache.tick(&battle, Some(&view), target, InteractionMode::Normal);
        assert_eq!(cache.path_cost(), PathCost::remaining(32));
        assert_eq!(cache.attack_cost(), AttackCost::UNCOMPUTED, "not a fire mode");

        cache.reset_path();
        assert!(cache.path_steps().is_empty());
        assert_eq!(cache.path_cost(), PathCost::UNCOMPUTED);
    }
}
