//! Shared fixtures for driving a `BattleView` against the mock battle.
#![allow(dead_code)]

use battle_core::mock::MockBattle;
use battle_core::{ItemKind, ItemTypeId, ItemView, TilePos, UnitId};
use battle_frontend_core::{BattleView, ViewConfig, ViewEvent, ViewIntent};
use crossterm::event::{KeyCode, ModifierKeyCode, MouseButton};

pub const LSHIFT: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftShift);
pub const LALT: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftAlt);
pub const LCTRL: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftControl);
pub const RCTRL: KeyCode = KeyCode::Modifier(ModifierKeyCode::RightControl);

/// Previews without throttling and short turn thresholds.
pub fn config() -> ViewConfig {
    let mut config = ViewConfig::default();
    config.previews.path_delay = 0;
    config.previews.attack_delay = 0;
    config.turns.end_turn_idle_ticks = 3;
    config.turns.hide_display_ticks = 5;
    config
}

pub fn open(battle: &MockBattle, config: ViewConfig) -> BattleView {
    let mut view = BattleView::with_seed(battle, config, 42);
    view.begin(battle);
    view
}

pub fn key_down(view: &mut BattleView, battle: &mut MockBattle, code: KeyCode) {
    view.event_occurred(battle, ViewEvent::KeyDown(code));
}

pub fn key_up(view: &mut BattleView, battle: &mut MockBattle, code: KeyCode) {
    view.event_occurred(battle, ViewEvent::KeyUp(code));
}

pub fn click(view: &mut BattleView, battle: &mut MockBattle, button: MouseButton, tile: TilePos) {
    view.event_occurred(battle, ViewEvent::PointerPressed { button, tile });
}

pub fn hover(view: &mut BattleView, battle: &mut MockBattle, tile: TilePos) {
    view.event_occurred(battle, ViewEvent::PointerMoved { tile });
}

/// Left-clicks the unit and runs a frame so the selection settles.
pub fn select(view: &mut BattleView, battle: &mut MockBattle, unit: UnitId) {
    let tile = battle.units.iter().find(|u| u.id == unit).map(|u| u.tile).unwrap();
    click(view, battle, MouseButton::Left, tile);
    view.update(battle);
}

pub fn rifle() -> ItemView {
    ItemView {
        type_id: ItemTypeId(7),
        kind: ItemKind::Weapon,
        loaded: true,
        ammo: 10,
        payload_max_ammo: 20,
        accuracy: 60,
        can_fire: true,
        ..ItemView::default()
    }
}

pub fn intents_of(view: &mut BattleView, wanted: impl Fn(&ViewIntent) -> bool) -> Vec<ViewIntent> {
    view.drain_intents().into_iter().filter(|i| wanted(i)).collect()
}
