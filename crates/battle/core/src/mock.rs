//! Mock battle for testing the interaction layer without a simulation.
//!
//! Deterministic and in-memory. Ground is solid at `z == 0` unless a hole is
//! punched; paths are straight Chebyshev walks costing [`MockBattle::STEP_COST`]
//! per tile. Every command is appended to [`MockBattle::issued`] so tests can
//! assert on what the view dispatched.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::env::{
    CommandError, CommandSink, DebugCommands, KillScope, MapOracle, MoveOrder, PathResult,
    Priming, TurnOracle, UnitOracle,
};
use crate::state::{
    AimingMode, BattleMode, BehaviorMode, BodyPart, BodyState, FirePermission, FloorItemId,
    Hand, ItemTypeId, ItemView, KneelingMode, MapSize, MovementMode, OrgId, PsiStatus, Relation,
    ReserveShotMode, ScannerView, TilePos, UnitId, UnitView, ViewPersistence, WeaponStatus,
};

/// Command recorded by the mock, in dispatch order.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(OrderKind), derive(Hash))]
pub enum IssuedOrder {
    Move(UnitId, MoveOrder),
    GroupMove(Vec<UnitId>, MoveOrder),
    Turn(UnitId, TilePos),
    Throw(UnitId, Hand, TilePos),
    Teleport(UnitId, Hand, TilePos),
    AttackTile(UnitId, TilePos, WeaponStatus, bool),
    AttackUnit(UnitId, UnitId, WeaponStatus),
    Focus(UnitId, UnitId),
    Psi(UnitId, UnitId, PsiStatus, ItemTypeId),
    StopPsi(UnitId),
    RefreshVision(UnitId),
    Medikit(UnitId, BodyPart),
    Use(UnitId, Hand),
    Prime(UnitId, Hand, Priming),
    Drop(UnitId, Hand),
    SpendTimeUnits(UnitId, i32),
    PickUp(UnitId, FloorItemId, Hand),
    DropPendingStep(UnitId),
    NoLineOfFire(UnitId),
    Movement(UnitId, MovementMode),
    Kneeling(UnitId, KneelingMode),
    Aiming(UnitId, AimingMode),
    FirePermission(UnitId, FirePermission),
    Behavior(UnitId, BehaviorMode),
    ReserveShot(UnitId, ReserveShotMode),
    ReserveKneel(UnitId, KneelingMode),
    Debug(&'static str),
}

/// Scripted change applied while the battle ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scripted {
    /// `org` sees an action at the location.
    Sighting(OrgId, TilePos),
    /// The turn passes to `org`.
    TurnTo(OrgId),
}

pub struct MockBattle {
    pub mode: BattleMode,
    pub player: OrgId,
    pub active: OrgId,
    pub turn: u32,
    pub turn_end_allowed: bool,
    pub interrupts: bool,
    pub org_names: HashMap<OrgId, String>,

    pub units: Vec<UnitView>,
    pub hands: HashMap<(UnitId, Hand), ItemView>,
    pub scanners: HashMap<(UnitId, Hand), ScannerView>,
    pub attack_costs: HashMap<(UnitId, Hand), i32>,
    pub no_line_of_fire: HashSet<(UnitId, UnitId)>,
    pub out_of_reach: HashSet<TilePos>,
    pub visible: HashSet<(OrgId, UnitId)>,
    pub relations: HashMap<(OrgId, OrgId), Relation>,

    pub size: MapSize,
    pub holes: HashSet<TilePos>,
    pub platforms: HashSet<TilePos>,
    pub walls: HashSet<TilePos>,
    pub exits: HashSet<TilePos>,
    pub floor_items: BTreeMap<TilePos, Vec<FloorItemId>>,

    pub game_ticks: u64,
    pub ticks_without_action: u64,
    pub ticks_without_seen_action: HashMap<OrgId, u64>,
    pub last_seen_action: HashMap<OrgId, TilePos>,
    pub script: BTreeMap<u64, Vec<Scripted>>,

    pub saved_view: ViewPersistence,
    pub issued: Vec<IssuedOrder>,
    pub refused: HashMap<OrderKind, CommandError>,
}

impl MockBattle {
    /// Movement cost per tile before the mode multiplier.
    pub const STEP_COST: f32 = 4.0;

    pub const PLAYER: OrgId = OrgId(1);
    pub const ALIENS: OrgId = OrgId(2);

    pub fn new(mode: BattleMode) -> Self {
        let org_names = HashMap::from([
            (Self::PLAYER, "X-Com".to_owned()),
            (Self::ALIENS, "Aliens".to_owned()),
        ]);
        Self {
            mode,
            player: Self::PLAYER,
            active: Self::PLAYER,
            turn: 1,
            turn_end_allowed: false,
            interrupts: false,
            org_names,
            units: Vec::new(),
            hands: HashMap::new(),
            scanners: HashMap::new(),
            attack_costs: HashMap::new(),
            no_line_of_fire: HashSet::new(),
            out_of_reach: HashSet::new(),
            visible: HashSet::new(),
            relations: HashMap::new(),
            size: MapSize::new(20, 20, 4),
            holes: HashSet::new(),
            platforms: HashSet::new(),
            walls: HashSet::new(),
            exits: HashSet::new(),
            floor_items: BTreeMap::new(),
            game_ticks: 0,
            ticks_without_action: 0,
            ticks_without_seen_action: HashMap::new(),
            last_seen_action: HashMap::new(),
            script: BTreeMap::new(),
            saved_view: ViewPersistence::default(),
            issued: Vec::new(),
            refused: HashMap::new(),
        }
    }

    pub fn turn_based() -> Self {
        Self::new(BattleMode::TurnBased)
    }

    pub fn real_time() -> Self {
        Self::new(BattleMode::RealTime)
    }

    /// Adds a healthy unit of `owner` at `tile` with 40 time units.
    pub fn spawn(&mut self, id: u32, owner: OrgId, tile: TilePos) -> UnitId {
        let id = UnitId(id);
        self.units.push(UnitView {
            id,
            owner,
            alive: true,
            conscious: true,
            tile,
            goal: tile,
            time_units: 40,
            can_move: true,
            can_run: true,
            max_height: 39,
            has_inventory: true,
            ..UnitView::default()
        });
        id
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitView> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn give(&mut self, unit: UnitId, hand: Hand, item: ItemView) {
        self.hands.insert((unit, hand), item);
    }

    pub fn refuse(&mut self, kind: OrderKind, error: CommandError) {
        self.refused.insert(kind, error);
    }

    pub fn schedule(&mut self, after_ticks: u64, event: Scripted) {
        self.script
            .entry(self.game_ticks + after_ticks)
            .or_default()
            .push(event);
    }

    pub fn issued_of(&self, kind: OrderKind) -> Vec<&IssuedOrder> {
        self.issued
            .iter()
            .filter(|order| OrderKind::from(*order) == kind)
            .collect()
    }

    fn record(&mut self, order: IssuedOrder) -> Result<(), CommandError> {
        let kind = OrderKind::from(&order);
        if let Some(error) = self.refused.get(&kind) {
            return Err(error.clone());
        }
        self.issued.push(order);
        Ok(())
    }

    fn apply_script(&mut self, tick: u64) {
        let Some(events) = self.script.remove(&tick) else {
            return;
        };
        for event in events {
            match event {
                Scripted::Sighting(org, location) => {
                    self.ticks_without_seen_action.insert(org, 0);
                    self.last_seen_action.insert(org, location);
                }
                Scripted::TurnTo(org) => {
                    self.active = org;
                    self.turn_end_allowed = false;
                }
            }
        }
    }
}

impl Default for MockBattle {
    fn default() -> Self {
        Self::turn_based()
    }
}

impl UnitOracle for MockBattle {
    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.units.iter().find(|unit| unit.id == id).cloned()
    }

    fn unit_ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|unit| unit.id).collect()
    }

    fn hand_item(&self, unit: UnitId, hand: Hand) -> Option<ItemView> {
        self.hands.get(&(unit, hand)).cloned()
    }

    fn can_fire_at(&self, unit: UnitId, hand: Hand, target: TilePos) -> bool {
        self.hands
            .get(&(unit, hand))
            .is_some_and(|item| item.can_fire && !self.out_of_reach.contains(&target))
    }

    fn attack_cost(&self, unit: UnitId, hand: Hand, _target: TilePos) -> i32 {
        self.attack_costs.get(&(unit, hand)).copied().unwrap_or(12)
    }

    fn has_line_to_unit(&self, unit: UnitId, target: UnitId) -> bool {
        !self.no_line_of_fire.contains(&(unit, target))
    }

    fn is_visible_to(&self, observer: OrgId, unit: UnitId) -> bool {
        self.visible.contains(&(observer, unit))
            || self.unit(unit).is_some_and(|u| u.owner == observer)
    }

    fn relation(&self, from: OrgId, to: OrgId) -> Relation {
        if from == to {
            return Relation::Allied;
        }
        self.relations
            .get(&(from, to))
            .copied()
            .unwrap_or(Relation::Hostile)
    }

    fn scanner(&self, unit: UnitId, hand: Hand) -> Option<ScannerView> {
        self.scanners.get(&(unit, hand)).cloned()
    }
}

impl MapOracle for MockBattle {
    fn size(&self) -> MapSize {
        self.size
    }

    fn is_passable(&self, tile: TilePos, _large: bool, _max_height: i32) -> bool {
        self.contains(tile) && !self.walls.contains(&tile)
    }

    fn can_stand(&self, tile: TilePos, _large: bool) -> bool {
        if self.platforms.contains(&tile) {
            return true;
        }
        tile.z == 0 && self.contains(tile) && !self.holes.contains(&tile)
    }

    fn has_exit(&self, tile: TilePos) -> bool {
        self.exits.contains(&tile)
    }

    fn units_occupying(&self, tile: TilePos) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|unit| unit.alive && unit.tile == tile)
            .map(|unit| unit.id)
            .collect()
    }

    fn units_present(&self, tile: TilePos) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|unit| unit.tile == tile)
            .map(|unit| unit.id)
            .collect()
    }

    fn floor_items(&self, tile: TilePos) -> Vec<FloorItemId> {
        self.floor_items.get(&tile).cloned().unwrap_or_default()
    }

    fn find_path(&self, _unit: UnitId, from: TilePos, to: TilePos, max_cost: f32) -> PathResult {
        let mut steps = vec![from];
        let mut cost = 0.0;
        let mut current = from;
        while current != to {
            let next = TilePos::new(
                current.x + (to.x - current.x).signum(),
                current.y + (to.y - current.y).signum(),
                current.z + (to.z - current.z).signum(),
            );
            if self.walls.contains(&next) || cost + Self::STEP_COST > max_cost {
                break;
            }
            cost += Self::STEP_COST;
            steps.push(next);
            current = next;
        }
        PathResult { steps, cost }
    }
}

impl TurnOracle for MockBattle {
    fn mode(&self) -> BattleMode {
        self.mode
    }

    fn current_player(&self) -> OrgId {
        self.player
    }

    fn active_org(&self) -> OrgId {
        self.active
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn org_name(&self, org: OrgId) -> String {
        self.org_names
            .get(&org)
            .cloned()
            .unwrap_or_else(|| org.to_string())
    }

    fn turn_end_allowed(&self) -> bool {
        self.turn_end_allowed
    }

    fn set_turn_end_allowed(&mut self, allowed: bool) {
        self.turn_end_allowed = allowed;
    }

    fn interrupts_pending(&self) -> bool {
        self.interrupts
    }

    fn ticks_without_action(&self) -> u64 {
        self.ticks_without_action
    }

    fn ticks_without_seen_action(&self, org: OrgId) -> u64 {
        self.ticks_without_seen_action.get(&org).copied().unwrap_or(0)
    }

    fn last_seen_action_location(&self, org: OrgId) -> Option<TilePos> {
        self.last_seen_action.get(&org).copied()
    }

    fn notify_action(&mut self) {
        self.ticks_without_action = 0;
    }

    fn game_ticks(&self) -> u64 {
        self.game_ticks
    }

    fn step(&mut self) {
        self.game_ticks += 1;
        self.ticks_without_action += 1;
        for org in [Self::PLAYER, Self::ALIENS] {
            *self.ticks_without_seen_action.entry(org).or_insert(0) += 1;
        }
        self.apply_script(self.game_ticks);
    }

    fn saved_view(&self) -> ViewPersistence {
        self.saved_view
    }

    fn store_view(&mut self, view: ViewPersistence) {
        self.saved_view = view;
    }
}

impl CommandSink for MockBattle {
    fn move_to(&mut self, unit: UnitId, order: MoveOrder) -> Result<(), CommandError> {
        self.record(IssuedOrder::Move(unit, order))
    }

    fn group_move(&mut self, units: &[UnitId], order: MoveOrder) -> Result<(), CommandError> {
        self.record(IssuedOrder::GroupMove(units.to_vec(), order))
    }

    fn turn_to(&mut self, unit: UnitId, target: TilePos) -> Result<(), CommandError> {
        self.record(IssuedOrder::Turn(unit, target))
    }

    fn throw_item(
        &mut self,
        unit: UnitId,
        hand: Hand,
        target: TilePos,
    ) -> Result<(), CommandError> {
        self.record(IssuedOrder::Throw(unit, hand, target))
    }

    fn teleport(&mut self, unit: UnitId, hand: Hand, target: TilePos) -> Result<(), CommandError> {
        if !self.hands.contains_key(&(unit, hand)) {
            return Err(CommandError::NoItem);
        }
        self.record(IssuedOrder::Teleport(unit, hand, target))
    }

    fn attack_tile(
        &mut self,
        unit: UnitId,
        target: TilePos,
        status: WeaponStatus,
        modified: bool,
    ) -> Result<(), CommandError> {
        self.record(IssuedOrder::AttackTile(unit, target, status, modified))
    }

    fn attack_unit(
        &mut self,
        unit: UnitId,
        target: UnitId,
        status: WeaponStatus,
    ) -> Result<(), CommandError> {
        self.record(IssuedOrder::AttackUnit(unit, target, status))
    }

    fn set_focus(&mut self, unit: UnitId, target: UnitId) -> Result<(), CommandError> {
        self.record(IssuedOrder::Focus(unit, target))
    }

    fn psi_attack(
        &mut self,
        unit: UnitId,
        target: UnitId,
        status: PsiStatus,
        item: ItemTypeId,
    ) -> Result<(), CommandError> {
        self.record(IssuedOrder::Psi(unit, target, status, item))?;
        if let Some(view) = self.unit_mut(unit) {
            view.psi_status = status;
            view.psi_item = Some(item);
        }
        Ok(())
    }

    fn stop_psi(&mut self, unit: UnitId) {
        if let Some(view) = self.unit_mut(unit) {
            view.psi_status = PsiStatus::NotEngaged;
            view.psi_item = None;
        }
        let _ = self.record(IssuedOrder::StopPsi(unit));
    }

    fn refresh_vision(&mut self, unit: UnitId) {
        let _ = self.record(IssuedOrder::RefreshVision(unit));
    }

    fn use_medikit(&mut self, unit: UnitId, part: BodyPart) -> Result<(), CommandError> {
        self.record(IssuedOrder::Medikit(unit, part))
    }

    fn use_item(&mut self, unit: UnitId, hand: Hand) -> Result<(), CommandError> {
        self.record(IssuedOrder::Use(unit, hand))
    }

    fn prime_item(
        &mut self,
        unit: UnitId,
        hand: Hand,
        priming: Priming,
    ) -> Result<(), CommandError> {
        self.record(IssuedOrder::Prime(unit, hand, priming))?;
        if let Some(item) = self.hands.get_mut(&(unit, hand)) {
            item.primed = true;
        }
        Ok(())
    }

    fn drop_item(&mut self, unit: UnitId, hand: Hand) -> Result<(), CommandError> {
        self.record(IssuedOrder::Drop(unit, hand))
    }

    fn spend_time_units(&mut self, unit: UnitId, cost: i32) -> Result<(), CommandError> {
        let available = self.unit(unit).map(|u| u.time_units).unwrap_or(0);
        if available < cost {
            return Err(CommandError::InsufficientTimeUnits);
        }
        self.record(IssuedOrder::SpendTimeUnits(unit, cost))?;
        if let Some(view) = self.unit_mut(unit) {
            view.time_units -= cost;
        }
        Ok(())
    }

    fn pick_up(&mut self, unit: UnitId, item: FloorItemId, hand: Hand) -> Result<(), CommandError> {
        self.record(IssuedOrder::PickUp(unit, item, hand))?;
        for items in self.floor_items.values_mut() {
            items.retain(|candidate| *candidate != item);
        }
        self.hands.insert((unit, hand), ItemView::default());
        Ok(())
    }

    fn drop_pending_step(&mut self, unit: UnitId) {
        if let Some(view) = self.unit_mut(unit) {
            view.continuable_move = false;
        }
        let _ = self.record(IssuedOrder::DropPendingStep(unit));
    }

    fn notify_no_line_of_fire(&mut self, unit: UnitId) {
        let _ = self.record(IssuedOrder::NoLineOfFire(unit));
    }

    fn set_movement_mode(&mut self, unit: UnitId, mode: MovementMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.movement_mode = mode;
        }
        let _ = self.record(IssuedOrder::Movement(unit, mode));
    }

    fn set_kneeling(&mut self, unit: UnitId, mode: KneelingMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.kneeling = mode;
        }
        let _ = self.record(IssuedOrder::Kneeling(unit, mode));
    }

    fn set_aiming(&mut self, unit: UnitId, mode: AimingMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.aiming = mode;
        }
        let _ = self.record(IssuedOrder::Aiming(unit, mode));
    }

    fn set_fire_permission(&mut self, unit: UnitId, permission: FirePermission) {
        if let Some(view) = self.unit_mut(unit) {
            view.fire_permission = permission;
        }
        let _ = self.record(IssuedOrder::FirePermission(unit, permission));
    }

    fn set_behavior(&mut self, unit: UnitId, mode: BehaviorMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.behavior = mode;
        }
        let _ = self.record(IssuedOrder::Behavior(unit, mode));
    }

    fn set_reserve_shot(&mut self, unit: UnitId, mode: ReserveShotMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.reserve_shot = mode;
        }
        let _ = self.record(IssuedOrder::ReserveShot(unit, mode));
    }

    fn set_reserve_kneel(&mut self, unit: UnitId, mode: KneelingMode) {
        if let Some(view) = self.unit_mut(unit) {
            view.reserve_kneel = mode;
        }
        let _ = self.record(IssuedOrder::ReserveKneel(unit, mode));
    }
}

impl DebugCommands for MockBattle {
    fn force_end_turn(&mut self) {
        self.interrupts = false;
        self.turn_end_allowed = true;
        let _ = self.record(IssuedOrder::Debug("force_end_turn"));
    }

    fn collapse_tile(&mut self, _tile: TilePos) {
        let _ = self.record(IssuedOrder::Debug("collapse_tile"));
    }

    fn reveal_map(&mut self, _org: OrgId) {
        let _ = self.record(IssuedOrder::Debug("reveal_map"));
    }

    fn make_prone(&mut self, _tile: TilePos) {
        let _ = self.record(IssuedOrder::Debug("make_prone"));
    }

    fn kill(&mut self, target: UnitId, scope: KillScope) {
        let center = self.unit(target).map(|u| u.tile);
        for unit in &mut self.units {
            let hit = match scope {
                KillScope::Only => unit.id == target,
                KillScope::AllExcept => unit.id != target,
                KillScope::Radius(radius) => {
                    center.is_some_and(|c| unit.tile.flat_distance(c) <= radius)
                }
            };
            if hit {
                unit.alive = false;
                unit.conscious = false;
            }
        }
        let _ = self.record(IssuedOrder::Debug("kill"));
    }

    fn retreat(&mut self, unit: UnitId) {
        if let Some(view) = self.unit_mut(unit) {
            view.retreated = true;
        }
        let _ = self.record(IssuedOrder::Debug("retreat"));
    }

    fn amplify_psi(&mut self, _unit: UnitId) {
        let _ = self.record(IssuedOrder::Debug("amplify_psi"));
    }

    fn panic(&mut self, unit: UnitId) {
        if let Some(view) = self.unit_mut(unit) {
            view.morale = crate::state::MoraleState::Panicked;
        }
        let _ = self.record(IssuedOrder::Debug("panic"));
    }

    fn heal_all(&mut self, _org: OrgId) {
        let _ = self.record(IssuedOrder::Debug("heal_all"));
    }

    fn restore_time_units(&mut self, org: OrgId) {
        for unit in self.units.iter_mut().filter(|u| u.owner == org) {
            unit.time_units = 40;
        }
        let _ = self.record(IssuedOrder::Debug("restore_time_units"));
    }

    fn toggle_ai(&mut self, _org: OrgId) {
        let _ = self.record(IssuedOrder::Debug("toggle_ai"));
    }

    fn jump(&mut self, _unit: UnitId, _target: TilePos, _body: BodyState) {
        let _ = self.record(IssuedOrder::Debug("jump"));
    }

    fn grant_teleporter(&mut self, unit: UnitId, hand: Hand) {
        self.hands.entry((unit, hand)).or_insert_with(|| ItemView {
            kind: crate::state::ItemKind::Teleporter,
            ammo: 3,
            payload_max_ammo: 3,
            ..ItemView::default()
        });
        let _ = self.record(IssuedOrder::Debug("grant_teleporter"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_stop_at_the_budget() {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::ORIGIN);
        let path = battle.find_path(unit, TilePos::ORIGIN, TilePos::new(5, 0, 0), 8.0);
        assert_eq!(path.steps.len(), 3);
        assert_eq!(path.cost, 8.0);
        assert!(!path.reaches(TilePos::new(5, 0, 0)));
    }

    #[test]
    fn refused_orders_are_not_recorded() {
        let mut battle = MockBattle::turn_based();
        let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::ORIGIN);
        battle.refuse(OrderKind::Throw, CommandError::Blocked);
        assert_eq!(
            battle.throw_item(unit, Hand::Left, TilePos::ORIGIN),
            Err(CommandError::Blocked)
        );
        assert!(battle.issued.is_empty());
    }

    #[test]
    fn scripted_sighting_resets_the_counter_on_its_tick() {
        let mut battle = MockBattle::turn_based();
        battle.schedule(3, Scripted::Sighting(MockBattle::PLAYER, TilePos::new(4, 4, 0)));
        battle.step();
        battle.step();
        assert_eq!(battle.ticks_without_seen_action(MockBattle::PLAYER), 2);
        battle.step();
        assert_eq!(battle.ticks_without_seen_action(MockBattle::PLAYER), 0);
        assert_eq!(
            battle.last_seen_action_location(MockBattle::PLAYER),
            Some(TilePos::new(4, 4, 0))
        );
    }
}
