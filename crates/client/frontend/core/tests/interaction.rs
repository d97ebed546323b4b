//! Modifier-driven modes, sticky aiming modes and the selection set, driven
//! through the battle view.

mod common;

use battle_core::mock::{IssuedOrder, MockBattle, OrderKind};
use battle_core::{
    Hand, ItemKind, ItemTypeId, ItemView, MoraleState, PsiStatus, TilePos, UnitOracle,
    WeaponStatus,
};
use battle_frontend_core::{
    ActivePanel, ControlEvent, ControlId, CursorGlyph, InteractionMode, MAX_SELECTION, ViewCommand,
    ViewEvent, ViewIntent,
};
use common::*;
use crossterm::event::{KeyCode, MouseButton};

#[test]
fn modifiers_resolve_by_priority() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(2, 2, 0));
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);
    assert_eq!(view.mode(), InteractionMode::Normal);

    key_down(&mut view, &mut battle, LALT);
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::NormalAlt);

    key_down(&mut view, &mut battle, LSHIFT);
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::FireAny, "shift beats alt");
    assert_eq!(view.cursor(), CursorGlyph::Shoot);

    key_down(&mut view, &mut battle, RCTRL);
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::NormalCtrlAlt, "ctrl beats shift");
    assert_eq!(view.cursor(), CursorGlyph::Add);

    for code in [RCTRL, LSHIFT, LALT] {
        key_up(&mut view, &mut battle, code);
    }
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::Normal);
}

#[test]
fn empty_selection_only_knows_ctrl() {
    let mut battle = MockBattle::turn_based();
    let mut view = open(&battle, config());

    key_down(&mut view, &mut battle, LSHIFT);
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::Normal);

    key_down(&mut view, &mut battle, LCTRL);
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::NormalCtrl);
}

#[test]
fn sticky_fire_mode_ignores_modifiers_until_cancelled() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(2, 2, 0));
    battle.give(unit, Hand::Right, rifle());
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    view.execute(
        &mut battle,
        ViewCommand::UseItem {
            hand: Hand::Right,
            automatic: false,
        },
    );
    view.update(&mut battle);
    assert_eq!(view.mode(), InteractionMode::FireRight);

    for code in [LCTRL, LSHIFT, LALT] {
        key_down(&mut view, &mut battle, code);
        view.update(&mut battle);
        assert_eq!(view.mode(), InteractionMode::FireRight);
        key_up(&mut view, &mut battle, code);
        view.update(&mut battle);
        assert_eq!(view.mode(), InteractionMode::FireRight);
    }

    click(&mut view, &mut battle, MouseButton::Left, TilePos::new(9, 9, 0));
    assert_eq!(view.mode(), InteractionMode::FireRight, "firing keeps aiming");
    assert_eq!(
        battle.issued_of(OrderKind::AttackTile),
        vec![&IssuedOrder::AttackTile(
            unit,
            TilePos::new(9, 9, 0),
            WeaponStatus::FiringRightHand,
            false
        )]
    );

    click(&mut view, &mut battle, MouseButton::Right, TilePos::new(9, 9, 0));
    assert_eq!(view.mode(), InteractionMode::Normal);
}

#[test]
fn escape_cancels_aiming_before_opening_options() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(2, 2, 0));
    battle.give(unit, Hand::Left, rifle());
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);
    view.execute(
        &mut battle,
        ViewCommand::UseItem {
            hand: Hand::Left,
            automatic: false,
        },
    );
    assert_eq!(view.mode(), InteractionMode::FireLeft);

    key_down(&mut view, &mut battle, KeyCode::Esc);
    assert_eq!(view.mode(), InteractionMode::Normal);
    assert!(view.drain_intents().is_empty());

    key_down(&mut view, &mut battle, KeyCode::Esc);
    assert_eq!(view.drain_intents(), vec![ViewIntent::OpenOptions]);
}

#[test]
fn selection_caps_at_six_and_drops_lost_units() {
    let mut battle = MockBattle::turn_based();
    let units: Vec<_> = (1..=7)
        .map(|i| battle.spawn(i, MockBattle::PLAYER, TilePos::new(i as i32, 1, 0)))
        .collect();
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, units[0]);

    key_down(&mut view, &mut battle, LCTRL);
    view.update(&mut battle);
    for unit in &units[1..] {
        let tile = battle.unit(*unit).unwrap().tile;
        click(&mut view, &mut battle, MouseButton::Left, tile);
    }
    assert_eq!(view.selection().len(), MAX_SELECTION);
    assert!(!view.selection().contains(units[6]), "seventh add is ignored");
    assert_eq!(view.selection().front(), Some(units[5]));

    let tile = battle.unit(units[5]).unwrap().tile;
    click(&mut view, &mut battle, MouseButton::Right, tile);
    assert!(!view.selection().contains(units[5]));
    key_up(&mut view, &mut battle, LCTRL);

    battle.unit_mut(units[1]).unwrap().alive = false;
    battle.unit_mut(units[2]).unwrap().morale = MoraleState::Panicked;
    battle.unit_mut(units[3]).unwrap().retreated = true;
    view.update(&mut battle);

    assert_eq!(view.selection().as_slice(), &[units[4], units[0]]);
    for unit in view.selection().iter() {
        assert!(battle.unit(unit).unwrap().is_controllable_by(MockBattle::PLAYER));
    }
}

#[test]
fn group_move_button_is_persisted() {
    let mut battle = MockBattle::turn_based();
    let a = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    let b = battle.spawn(2, MockBattle::PLAYER, TilePos::new(2, 1, 0));
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, a);
    key_down(&mut view, &mut battle, LCTRL);
    view.update(&mut battle);
    click(&mut view, &mut battle, MouseButton::Left, TilePos::new(2, 1, 0));
    key_up(&mut view, &mut battle, LCTRL);

    view.event_occurred(
        &mut battle,
        ViewEvent::Control {
            control: ControlId::from_name("BUTTON_MOVE_GROUP").unwrap(),
            event: ControlEvent::ButtonClick,
        },
    );
    view.update(&mut battle);
    assert!(battle.saved_view.group_move);

    click(&mut view, &mut battle, MouseButton::Left, TilePos::new(8, 8, 0));
    let moves = battle.issued_of(OrderKind::GroupMove);
    assert_eq!(moves.len(), 1);
    assert!(matches!(moves[0], IssuedOrder::GroupMove(units, _) if units == &vec![b, a]));
}

#[test]
fn clicks_are_ignored_outside_the_players_turn() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(2, 2, 0));
    battle.active = MockBattle::ALIENS;
    let mut view = open(&battle, config());
    view.update(&mut battle);
    assert_eq!(view.panel(), ActivePanel::NotMyTurn);

    click(&mut view, &mut battle, MouseButton::Left, TilePos::new(2, 2, 0));
    assert!(view.selection().is_empty());
    assert!(!view.selection().contains(unit));

    key_down(&mut view, &mut battle, KeyCode::Esc);
    assert!(view.drain_intents().is_empty(), "no options from the not-my-turn panel");
}

#[test]
fn cheat_keys_need_debug_mode() {
    let mut battle = MockBattle::turn_based();
    let enemy = battle.spawn(9, MockBattle::ALIENS, TilePos::new(4, 4, 0));

    let mut view = open(&battle, config());
    hover(&mut view, &mut battle, TilePos::new(4, 4, 0));
    key_down(&mut view, &mut battle, KeyCode::Char('s'));
    assert!(battle.unit(enemy).unwrap().alive);

    let mut view = open(&battle, config().with_debug_mode(true));
    hover(&mut view, &mut battle, TilePos::new(4, 4, 0));
    key_down(&mut view, &mut battle, KeyCode::Char('s'));
    assert!(!battle.unit(enemy).unwrap().alive);

    key_down(&mut view, &mut battle, KeyCode::Char('h'));
    assert!(battle.issued.contains(&IssuedOrder::Debug("heal_all")));
}

#[test]
fn switching_psi_mode_stops_the_running_attack() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(2, 2, 0));
    let bender = ItemView {
        type_id: ItemTypeId(31),
        kind: ItemKind::MindBender,
        loaded: true,
        ..ItemView::default()
    };
    battle.give(unit, Hand::Right, bender);
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    view.execute(&mut battle, ViewCommand::UseItem { hand: Hand::Right, automatic: false });
    assert_eq!(view.panel(), ActivePanel::Psi);

    let attacker = battle.unit_mut(unit).unwrap();
    attacker.psi_status = PsiStatus::Control;
    attacker.psi_item = Some(ItemTypeId(31));

    view.execute(&mut battle, ViewCommand::PsiMode(PsiStatus::Panic));
    assert_eq!(battle.unit(unit).unwrap().psi_status, PsiStatus::NotEngaged);
    assert!(battle.issued.contains(&IssuedOrder::StopPsi(unit)));
    assert_eq!(Some(view.mode()), InteractionMode::psi(PsiStatus::Panic));
}
