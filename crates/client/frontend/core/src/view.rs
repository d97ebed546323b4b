//! The battle view: one facade owning every piece of view-side state.
//!
//! The caller drives it once per frame with [`BattleView::update`] and
//! [`BattleView::render`], feeds it input through
//! [`BattleView::event_occurred`], and drains the [`ViewIntent`]s it cannot
//! carry out itself (dialogs, camera animation, notifications).

use std::sync::Arc;

use battle_core::{
    BodyState, Facing, Hand, ItemKind, PsiStatus, Simulation, TilePos, UnitId, UnitView,
};
use crossterm::event::MouseButton;
use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;
use tracing::{debug, error, info};

use crate::camera::{Camera, SpeedControl, UpdateSpeed};
use crate::click::{ClickAction, ClickContext, resolve_click};
use crate::config::ViewConfig;
use crate::controls::{ControlTable, ViewCommand};
use crate::error::ViewError;
use crate::input::{DebugKey, GameNotice, KeyAction, ModifierKeys, ShortcutMap, ViewEvent};
use crate::message::{MessageEntry, MessageLog};
use crate::mode::{CursorGlyph, InteractionMode, InteractionState, ModeEvent, ModeIntent};
use crate::orders::{OrderOutcome, Orders, refused};
use crate::overlay::{
    ItemOverlaySnapshot, MedikitSnapshot, MotionScannerSnapshot, OverlayCompositor, PsiBars,
    PsiInfoSnapshot,
};
use crate::posture::{SoldierButtons, ThrowButtons, apply_posture};
use crate::preview::{AttackCost, PathCost, PreviewCache};
use crate::priming::PrimingPanel;
use crate::selection::SelectionSet;
use crate::turn::{Cutaway, TurnPhase, TurnSignal, TurnSynchronizer};

/// Half period of the turn-based pause icon blink, in frames.
const PAUSE_BLINK_FRAMES: u32 = 30;

/// Side panel shown next to the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActivePanel {
    #[default]
    Main,
    Psi,
    Priming,
    NotMyTurn,
}

/// Side effect for the host application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewIntent {
    FocusCamera(TilePos),
    /// Ask whether the unit should carry on with its unfinished move.
    ContinuePrompt(UnitId),
    OpenOptions,
    OpenMessageLog,
    StrategyMap(bool),
    Notification(String),
}

/// Everything the presentation layer draws this frame.
#[derive(Clone, Debug)]
pub enum RenderPlan {
    /// Full-screen placeholder while the enemy moves out of sight.
    Cutaway(Cutaway),
    Battle(Box<BattleFrame>),
}

#[derive(Clone, Debug)]
pub struct BattleFrame {
    pub panel: ActivePanel,
    pub cursor: CursorGlyph,
    pub mode: InteractionMode,
    pub camera: Camera,
    pub speed: UpdateSpeed,
    pub pause_icon_lit: bool,
    pub left_hand: Option<Arc<RgbaImage>>,
    pub right_hand: Option<Arc<RgbaImage>>,
    pub psi: Option<Arc<PsiBars>>,
    pub scanner: Option<Arc<RgbaImage>>,
    pub medikit: Option<MedikitSnapshot>,
    pub priming: Option<PrimingPanel>,
    pub buttons: SoldierButtons,
    pub path_cost: PathCost,
    pub path_steps: Vec<TilePos>,
    pub attack_cost: AttackCost,
    pub ticker: Option<String>,
}

/// Front unit as seen last frame; previews depend on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tracked {
    unit: UnitId,
    tile: TilePos,
    facing: Facing,
}

pub struct BattleView {
    config: ViewConfig,
    modifiers: ModifierKeys,
    shortcuts: ShortcutMap,
    interaction: InteractionState,
    selection: SelectionSet,
    tracked: Option<Tracked>,
    previews: PreviewCache,
    overlays: OverlayCompositor,
    throws: ThrowButtons,
    priming: Option<PrimingPanel>,
    psi_hand: Hand,
    psi_choice: Option<PsiStatus>,
    panel: ActivePanel,
    speed: SpeedControl,
    camera: Camera,
    group_move: bool,
    hovered: TilePos,
    turns: TurnSynchronizer,
    controls: ControlTable,
    messages: MessageLog,
    pause_blink: u32,
    intents: Vec<ViewIntent>,
}

impl BattleView {
    pub fn new<S>(sim: &S, config: ViewConfig) -> Self
    where
        S: Simulation + ?Sized,
    {
        Self::with_rng(sim, config, StdRng::from_entropy())
    }

    /// Deterministic cut-away backgrounds.
    pub fn with_seed<S>(sim: &S, config: ViewConfig, seed: u64) -> Self
    where
        S: Simulation + ?Sized,
    {
        Self::with_rng(sim, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng<S>(sim: &S, config: ViewConfig, rng: StdRng) -> Self
    where
        S: Simulation + ?Sized,
    {
        let mode = sim.mode();
        let saved = sim.saved_view();
        Self {
            modifiers: ModifierKeys::empty(),
            shortcuts: ShortcutMap::new(config.debug_mode),
            interaction: InteractionState::new(config.delays.action_impossible),
            selection: SelectionSet::new(),
            tracked: None,
            previews: PreviewCache::new(&config.previews),
            overlays: OverlayCompositor::new(),
            throws: ThrowButtons::new(config.delays.throw_button),
            priming: None,
            psi_hand: Hand::Right,
            psi_choice: None,
            panel: ActivePanel::Main,
            speed: SpeedControl::for_mode(mode),
            camera: Camera::new(saved.screen_center, sim.size().z),
            group_move: saved.group_move,
            hovered: saved.screen_center,
            turns: TurnSynchronizer::new(config.turns.clone(), rng),
            controls: ControlTable::standard(mode),
            messages: MessageLog::new(config.messages.capacity),
            pause_blink: 0,
            intents: Vec::new(),
            config,
        }
    }

    /// View activation: restores the persisted centre and group-move choice.
    pub fn begin<S>(&mut self, sim: &S)
    where
        S: Simulation + ?Sized,
    {
        let saved = sim.saved_view();
        self.camera.zoom_at(saved.screen_center);
        self.group_move = saved.group_move;
        self.panel = if self.turns.is_my_turn() {
            ActivePanel::Main
        } else {
            ActivePanel::NotMyTurn
        };
        info!(
            target: "view",
            mode = %sim.mode(),
            center = %saved.screen_center,
            group_move = saved.group_move,
            "battle view activated"
        );
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn cursor(&self) -> CursorGlyph {
        self.interaction.cursor()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn panel(&self) -> ActivePanel {
        self.panel
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn speed(&self) -> UpdateSpeed {
        self.speed.current()
    }

    pub fn previews(&self) -> &PreviewCache {
        &self.previews
    }

    pub fn overlays(&self) -> &OverlayCompositor {
        &self.overlays
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn priming(&self) -> Option<&PrimingPanel> {
        self.priming.as_ref()
    }

    pub fn psi_choice(&self) -> Option<PsiStatus> {
        self.psi_choice
    }

    pub fn group_move(&self) -> bool {
        self.group_move
    }

    pub fn hovered(&self) -> TilePos {
        self.hovered
    }

    pub fn modifiers(&self) -> ModifierKeys {
        self.modifiers
    }

    pub fn turn_phase(&self) -> TurnPhase {
        self.turns.phase()
    }

    pub fn action_impossible(&self) -> bool {
        self.interaction.action_impossible()
    }

    /// Side effects queued since the last call.
    pub fn drain_intents(&mut self) -> Vec<ViewIntent> {
        std::mem::take(&mut self.intents)
    }

    /// One frame: turn bookkeeping and simulation ticks, selection upkeep,
    /// mode resolution, previews and camera.
    pub fn update<S>(&mut self, sim: &mut S)
    where
        S: Simulation + ?Sized,
    {
        let signals = self
            .turns
            .update(sim, &mut self.selection, self.speed.current());
        for signal in signals {
            self.on_turn_signal(sim, signal);
        }

        self.prune_selection(sim);
        self.transition(ModeEvent::Frame {
            modifiers: self.modifiers,
            selection_empty: self.selection.is_empty(),
        });
        self.throws.tick();

        let front = self.front_unit(sim);
        if sim.mode().is_turn_based() && self.panel != ActivePanel::NotMyTurn {
            if let Some(unit) = front.as_ref() {
                self.previews
                    .tick(sim, Some(unit), self.hovered, self.interaction.mode());
            }
        }

        if self.camera.follow_agent {
            if let Some(unit) = front.as_ref() {
                self.camera.center_on(unit.tile);
            }
        }
        sim.store_view(self.camera.persistence(self.group_move));
    }

    pub fn render<S>(&mut self, sim: &S) -> RenderPlan
    where
        S: Simulation + ?Sized,
    {
        if let Some(cutaway) = self.turns.cutaway(sim) {
            return RenderPlan::Cutaway(cutaway);
        }

        let pause_icon_lit = if sim.mode().is_turn_based() {
            self.pause_blink = (self.pause_blink + 1) % (PAUSE_BLINK_FRAMES * 2);
            self.speed.is_paused() && self.pause_blink > PAUSE_BLINK_FRAMES
        } else {
            false
        };

        let mode = self.interaction.mode();
        let units = self.selected_units(sim);
        let mut frame = BattleFrame {
            panel: self.panel,
            cursor: self.interaction.cursor(),
            mode,
            camera: self.camera,
            speed: self.speed.current(),
            pause_icon_lit,
            left_hand: None,
            right_hand: None,
            psi: None,
            scanner: None,
            medikit: None,
            priming: self.priming,
            buttons: SoldierButtons::aggregate(&units, mode, &self.throws),
            path_cost: self.previews.path_cost(),
            path_steps: self.previews.path_steps().to_vec(),
            attack_cost: self.previews.attack_cost(),
            ticker: self.messages.latest().map(|entry| entry.text.clone()),
        };

        if self.panel == ActivePanel::Psi {
            frame.psi = Some(self.overlays.psi_bars(PsiInfoSnapshot::capture(units.first())));
        }

        // Hand overlays only track the unit while the main panel is up.
        if self.panel != ActivePanel::Main {
            frame.left_hand = self.overlays.last_item(Hand::Left);
            frame.right_hand = self.overlays.last_item(Hand::Right);
            return RenderPlan::Battle(Box::new(frame));
        }
        let Some(front) = units.first() else {
            return RenderPlan::Battle(Box::new(frame));
        };
        for hand in Hand::iter() {
            let item = sim.hand_item(front.id, hand);
            let info = ItemOverlaySnapshot::capture(front, item.as_ref(), hand, mode);
            if info.is_empty() {
                continue;
            }
            let bitmap = Some(self.overlays.item(hand, info));
            match hand {
                Hand::Left => frame.left_hand = bitmap,
                Hand::Right => frame.right_hand = bitmap,
            }

            let Some(item) = item.filter(|item| info.selected && item.in_use) else {
                continue;
            };
            match item.kind {
                ItemKind::MotionScanner => frame.scanner = self.scanner_bitmap(sim, front, hand),
                ItemKind::MediKit => frame.medikit = Some(MedikitSnapshot::capture(front)),
                _ => {
                    let err = ViewError::NoPanelForItem(hand);
                    error!(target: "view", %err, kind = %item.kind, "unexpected in-use item");
                }
            }
        }
        RenderPlan::Battle(Box::new(frame))
    }

    fn scanner_bitmap<S>(&mut self, sim: &S, front: &UnitView, hand: Hand) -> Option<Arc<RgbaImage>>
    where
        S: Simulation + ?Sized,
    {
        if sim.mode().is_turn_based() {
            let info = MotionScannerSnapshot::sampled(front, sim.game_ticks());
            let everyone = || {
                sim.unit_ids()
                    .into_iter()
                    .filter_map(|id| sim.unit(id))
                    .collect::<Vec<_>>()
            };
            return Some(self.overlays.scanner_sampled(info, everyone));
        }
        let scanner = sim.scanner(front.id, hand)?;
        let info = MotionScannerSnapshot::live(front, &scanner);
        Some(
            self.overlays
                .scanner_live(info, &scanner, self.config.scanner_remain_lit_ticks),
        )
    }

    /// Dispatches one input event.
    pub fn event_occurred<S>(&mut self, sim: &mut S, event: ViewEvent)
    where
        S: Simulation + ?Sized,
    {
        match event {
            ViewEvent::KeyDown(code) => {
                if self.modifiers.apply(code, true) {
                    return;
                }
                let action = self.shortcuts.handle_key(code, self.modifiers);
                self.on_key(sim, action);
            }
            ViewEvent::KeyUp(code) => {
                self.modifiers.apply(code, false);
            }
            ViewEvent::PointerMoved { tile } => self.hover(tile),
            ViewEvent::PointerPressed { button, tile } => {
                self.hover(tile);
                self.on_click(sim, button, tile);
            }
            ViewEvent::Control { control, event } => {
                if let Ok(command) = self.controls.resolve(control, event) {
                    self.execute(sim, command);
                }
            }
            ViewEvent::Notice(notice) => self.on_notice(sim, notice),
        }
    }

    /// Carries out a command from a side-panel control.
    pub fn execute<S>(&mut self, sim: &mut S, command: ViewCommand)
    where
        S: Simulation + ?Sized,
    {
        debug!(target: "controls", ?command, "executing view command");
        match command {
            ViewCommand::SetSpeed(speed) => self.speed.set(speed),
            ViewCommand::EndTurn => {
                if sim.mode().is_turn_based() && self.turns.is_my_turn() {
                    self.turns.request_end_turn();
                }
            }
            ViewCommand::SetGroupMove(on) => self.group_move = on,
            ViewCommand::LayerUp => {
                self.camera.layer_up();
                self.follow_layer();
            }
            ViewCommand::LayerDown => {
                self.camera.layer_down();
                self.follow_layer();
            }
            ViewCommand::SetLayer(layer) => {
                self.camera.set_layer(layer);
                self.follow_layer();
            }
            ViewCommand::SetLayerDrawing(drawing) => self.camera.layer_drawing = drawing,
            ViewCommand::SetFollowAgent(on) => self.camera.follow_agent = on,
            ViewCommand::SetStrategyMap(on) => {
                self.camera.strategy_map = on;
                self.intents.push(ViewIntent::StrategyMap(on));
            }
            ViewCommand::ShowOptions => self.intents.push(ViewIntent::OpenOptions),
            ViewCommand::ShowLog => self.intents.push(ViewIntent::OpenMessageLog),
            ViewCommand::ZoomLastEvent => {
                if let Some(tile) = self.messages.last_location() {
                    self.focus_camera(tile);
                }
            }
            ViewCommand::UseItem { hand, automatic } => {
                let outcome = Orders::new(sim, &self.selection).use_item(hand, automatic);
                self.on_outcome(outcome);
            }
            ViewCommand::DropOrPickUp(hand) => {
                Orders::new(sim, &self.selection).drop_or_pick_up(hand, self.config.pickup_cost);
            }
            ViewCommand::Throw(hand) => {
                let front = self.front_unit(sim);
                let holding = front
                    .as_ref()
                    .map(|unit| (unit, sim.hand_item(unit.id, hand).is_some()));
                if let Some(mode) = self.throws.press(hand, holding) {
                    self.transition(ModeEvent::Enter(mode));
                }
            }
            ViewCommand::Confirm => self.confirm(sim),
            ViewCommand::Cancel => self.cancel_panel(),
            ViewCommand::SetPrimingDelay(delay) => {
                if let Some(panel) = self.priming.as_mut() {
                    panel.set_delay(delay);
                }
            }
            ViewCommand::SetPrimingRange(range) => {
                if let Some(panel) = self.priming.as_mut() {
                    panel.set_range(range);
                }
            }
            ViewCommand::PsiMode(status) => {
                Orders::new(sim, &self.selection).cancel_psi();
                let Some(mode) = InteractionMode::psi(status) else {
                    return;
                };
                self.psi_choice = Some(status);
                self.transition(ModeEvent::Enter(mode));
            }
            ViewCommand::Heal(part) => Orders::new(sim, &self.selection).heal(part),
            ViewCommand::Posture(command) => {
                let units = self.selected_units(sim);
                apply_posture(sim, &units, command);
            }
            ViewCommand::AnswerContinue(carry_on) => self.turns.answer(sim, carry_on),
        }
    }

    fn on_key<S>(&mut self, sim: &mut S, action: KeyAction)
    where
        S: Simulation + ?Sized,
    {
        match action {
            KeyAction::Cancel => {
                if self.interaction.mode().is_sticky() {
                    if self.interaction.mode().is_psi() {
                        self.psi_choice = None;
                    }
                    self.transition(ModeEvent::Cancel);
                    if self.panel != ActivePanel::NotMyTurn {
                        self.panel = ActivePanel::Main;
                    }
                } else if matches!(self.panel, ActivePanel::Psi | ActivePanel::Priming) {
                    self.cancel_panel();
                } else if self.panel != ActivePanel::NotMyTurn {
                    self.intents.push(ViewIntent::OpenOptions);
                }
            }
            KeyAction::LayerUp => self.execute(sim, ViewCommand::LayerUp),
            KeyAction::LayerDown => self.execute(sim, ViewCommand::LayerDown),
            KeyAction::ToggleStrategyMap => {
                let on = self.camera.toggle_strategy_map();
                self.intents.push(ViewIntent::StrategyMap(on));
            }
            KeyAction::TogglePause => self.speed.toggle_pause(),
            KeyAction::Debug(key) => self.on_debug_key(sim, key),
            KeyAction::None => {}
        }
    }

    fn on_debug_key<S>(&mut self, sim: &mut S, key: DebugKey)
    where
        S: Simulation + ?Sized,
    {
        let tile = self.hovered;
        let player = sim.current_player();
        let hovered_unit = unit_at(sim, tile);
        info!(target: "debug", ?key, %tile, unit = ?hovered_unit, "debug command");

        match key {
            DebugKey::ForceEndTurn => sim.force_end_turn(),
            DebugKey::CollapseTile => sim.collapse_tile(tile),
            DebugKey::RevealMap => sim.reveal_map(player),
            DebugKey::MakeProne => sim.make_prone(tile),
            DebugKey::Kill(scope) => {
                if let Some(unit) = hovered_unit {
                    sim.kill(unit, scope);
                }
            }
            DebugKey::Retreat => {
                if let Some(unit) = hovered_unit {
                    sim.retreat(unit);
                }
            }
            DebugKey::AmplifyPsi => {
                if let Some(unit) = hovered_unit {
                    sim.amplify_psi(unit);
                }
            }
            DebugKey::Panic => {
                if let Some(unit) = hovered_unit {
                    sim.panic(unit);
                }
            }
            DebugKey::HealAll => sim.heal_all(player),
            DebugKey::RestoreTimeUnits => sim.restore_time_units(player),
            DebugKey::ToggleAi => sim.toggle_ai(player),
            DebugKey::Jump => {
                if let Some(unit) = self.selection.front() {
                    sim.jump(unit, tile, BodyState::Standing);
                }
            }
        }
    }

    fn on_click<S>(&mut self, sim: &mut S, button: MouseButton, tile: TilePos)
    where
        S: Simulation + ?Sized,
    {
        if !self.turns.is_my_turn() {
            debug!(target: "controls", %tile, "click ignored outside the player's turn");
            return;
        }

        let context = ClickContext {
            mode: self.interaction.mode(),
            modifiers: self.modifiers,
            front: self.selection.front(),
            psi_hand: self.psi_hand,
            strategy_map: self.camera.strategy_map,
            debug_mode: self.config.debug_mode,
        };
        let action = resolve_click(sim, &context, button, tile);
        debug!(target: "controls", ?button, %tile, ?action, "map click");

        let outcome = match action {
            ClickAction::None => OrderOutcome::Done,
            ClickAction::Select { unit, flags } => {
                self.selection.select(unit, flags);
                OrderOutcome::Done
            }
            ClickAction::CancelMode => OrderOutcome::Completed,
            ClickAction::LeavePsi => {
                self.leave_psi();
                OrderOutcome::Done
            }
            ClickAction::CenterOn(target) => {
                self.camera.center_on(target);
                OrderOutcome::Done
            }
            ClickAction::CheatTeleport => OrderOutcome::Enter(InteractionMode::TeleportRight),
            order => self.dispatch(sim, order),
        };
        self.on_outcome(outcome);
    }

    /// Map clicks that become missions.
    fn dispatch<S>(&self, sim: &mut S, action: ClickAction) -> OrderOutcome
    where
        S: Simulation + ?Sized,
    {
        let mut orders = Orders::new(sim, &self.selection);
        match action {
            ClickAction::Move {
                target,
                strafe,
                demand_give_way,
            } => orders.move_to(target, strafe, demand_give_way, self.group_move),
            ClickAction::Turn(target) => orders.turn(target),
            ClickAction::FireAtUnit {
                target,
                status,
                forced,
            } => orders.fire_at_unit(target, status, forced),
            ClickAction::FireAtTile {
                target,
                status,
                modified,
            } => orders.fire_at_tile(target, status, modified),
            ClickAction::Focus(target) => orders.focus(target),
            ClickAction::Throw { target, hand } => return orders.throw(target, hand),
            ClickAction::Teleport { target, hand } => {
                return orders.teleport(target, hand, self.config.debug_mode);
            }
            ClickAction::PsiAttack {
                target,
                status,
                hand,
            } => return orders.psi_attack(target, status, hand),
            _ => {}
        }
        OrderOutcome::Done
    }

    fn on_outcome(&mut self, outcome: OrderOutcome) {
        match outcome {
            OrderOutcome::Done => {}
            OrderOutcome::Enter(mode) => {
                self.transition(ModeEvent::Enter(mode));
            }
            OrderOutcome::Completed => {
                if self.interaction.mode().is_psi() {
                    self.psi_choice = None;
                }
                self.transition(ModeEvent::Completed);
            }
            OrderOutcome::Refused => {
                self.transition(ModeEvent::Refused);
            }
            OrderOutcome::OpenPriming { hand, trigger } => {
                self.priming = Some(PrimingPanel::open(hand, trigger));
                self.panel = ActivePanel::Priming;
            }
            OrderOutcome::OpenPsi { hand } => {
                self.psi_hand = hand;
                self.psi_choice = None;
                self.panel = ActivePanel::Psi;
            }
        }
    }

    fn on_notice<S>(&mut self, sim: &S, notice: GameNotice)
    where
        S: Simulation + ?Sized,
    {
        if let Some(text) = notice.message {
            let entry = MessageEntry::new(text.clone(), Some(sim.game_ticks()))
                .at(notice.zoom_to);
            self.messages.push(entry);
            if !sim.mode().is_turn_based() {
                self.intents.push(ViewIntent::Notification(text));
            }
        }
        if let Some(tile) = notice.zoom_to {
            self.focus_camera(tile);
        }
    }

    fn on_turn_signal<S>(&mut self, sim: &S, signal: TurnSignal)
    where
        S: Simulation + ?Sized,
    {
        match signal {
            TurnSignal::Yielded => {
                self.panel = ActivePanel::NotMyTurn;
                self.priming = None;
                self.previews.reset();
            }
            TurnSignal::Regained => self.panel = ActivePanel::Main,
            TurnSignal::Prompt(unit) => {
                if let Some(view) = sim.unit(unit) {
                    self.camera.zoom_at(view.tile);
                }
                self.intents.push(ViewIntent::ContinuePrompt(unit));
            }
            TurnSignal::FocusCamera(tile) => self.focus_camera(tile),
        }
    }

    /// OK button of the open side panel.
    fn confirm<S>(&mut self, sim: &mut S)
    where
        S: Simulation + ?Sized,
    {
        if self.panel != ActivePanel::Priming {
            debug!(target: "controls", panel = %self.panel, "confirm without a panel to confirm");
            return;
        }
        if let (Some(panel), Some(unit)) = (self.priming.take(), self.selection.front()) {
            let priming = panel.priming(sim.mode());
            match sim.prime_item(unit, panel.hand(), priming) {
                Ok(()) => debug!(target: "orders", %unit, ?priming, "item primed"),
                Err(err) => refused(&err, Some(unit), "priming"),
            }
        }
        self.panel = ActivePanel::Main;
    }

    /// Cancel button of the open side panel.
    fn cancel_panel(&mut self) {
        match self.panel {
            ActivePanel::Priming => {
                self.priming = None;
                self.panel = ActivePanel::Main;
            }
            ActivePanel::Psi => {
                self.leave_psi();
                self.panel = ActivePanel::Main;
            }
            ActivePanel::Main | ActivePanel::NotMyTurn => {}
        }
    }

    fn leave_psi(&mut self) {
        if self.panel != ActivePanel::Psi {
            error!(target: "view", panel = %self.panel, "leaving psi targeting outside the psi panel");
        }
        self.psi_choice = None;
        self.transition(ModeEvent::Cancel);
    }

    /// Drops selected units the player lost control of and reacts to a
    /// change of the front unit.
    fn prune_selection<S>(&mut self, sim: &S)
    where
        S: Simulation + ?Sized,
    {
        if self.panel == ActivePanel::NotMyTurn {
            self.previews.reset();
            return;
        }

        let dropped = self
            .selection
            .retain(|unit| sim.controllable_unit(unit).is_some());
        if dropped > 0 {
            debug!(target: "view", dropped, remaining = self.selection.len(), "selection pruned");
        }

        let front = self.front_unit(sim);
        let previous = self.tracked.map(|tracked| tracked.unit);
        let current = front.as_ref().map(|unit| unit.id);

        match (front, self.tracked) {
            (Some(unit), Some(tracked)) if tracked.unit == unit.id => {
                if tracked.tile != unit.tile {
                    self.previews.reset();
                }
                if tracked.facing != unit.goal_facing {
                    self.previews.reset_attack();
                }
                self.tracked = Some(Tracked {
                    unit: unit.id,
                    tile: unit.tile,
                    facing: unit.goal_facing,
                });
            }
            (front, _) => {
                if previous != current && self.interaction.mode().is_throw() {
                    self.transition(ModeEvent::Cancel);
                }
                self.previews.reset();
                self.panel = ActivePanel::Main;
                self.priming = None;
                self.tracked = front.map(|unit| Tracked {
                    unit: unit.id,
                    tile: unit.tile,
                    facing: unit.goal_facing,
                });
            }
        }
    }

    fn transition(&mut self, event: ModeEvent) {
        let transition = self.interaction.apply(event);
        for intent in transition.intents {
            match intent {
                ModeIntent::ResetPathPreview => self.previews.reset_path(),
                ModeIntent::ResetAttackPreview => self.previews.reset_attack(),
                ModeIntent::SetCursor(_) => {}
            }
        }
    }

    fn hover(&mut self, tile: TilePos) {
        if tile != self.hovered {
            self.hovered = tile;
            self.previews.reset();
        }
    }

    /// Keeps the hovered tile on the visible layer.
    fn follow_layer(&mut self) {
        let z = self.camera.layer() - 1;
        self.hover(TilePos::new(self.hovered.x, self.hovered.y, z));
    }

    fn focus_camera(&mut self, tile: TilePos) {
        self.camera.zoom_at(tile);
        self.intents.push(ViewIntent::FocusCamera(tile));
    }

    fn front_unit<S>(&self, sim: &S) -> Option<UnitView>
    where
        S: Simulation + ?Sized,
    {
        self.selection.front().and_then(|unit| sim.unit(unit))
    }

    fn selected_units<S>(&self, sim: &S) -> Vec<UnitView>
    where
        S: Simulation + ?Sized,
    {
        self.selection.iter().filter_map(|unit| sim.unit(unit)).collect()
    }
}

fn unit_at<S>(sim: &S, tile: TilePos) -> Option<UnitId>
where
    S: Simulation + ?Sized,
{
    sim.units_occupying(tile)
        .first()
        .copied()
        .or_else(|| sim.units_present(tile).first().copied())
}
