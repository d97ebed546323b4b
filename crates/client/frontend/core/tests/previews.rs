//! Path and attack previews, and overlay memoization, through the battle view.

mod common;

use std::sync::Arc;

use battle_core::mock::MockBattle;
use battle_core::{
    BodyPart, Facing, Hand, ItemKind, ItemTypeId, ItemView, ScannerId, ScannerView, TilePos,
};
use battle_frontend_core::{ActivePanel, AttackCost, PathCost, RenderPlan, ViewCommand};
use common::*;

#[test]
fn path_preview_reports_remaining_time_units_or_too_far() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    hover(&mut view, &mut battle, TilePos::new(5, 1, 0));
    assert_eq!(view.previews().path_cost(), PathCost::UNCOMPUTED);
    view.update(&mut battle);
    assert_eq!(view.previews().path_cost(), PathCost::remaining(40 - 4 * 4));
    assert_eq!(view.previews().path_steps().len(), 4);

    hover(&mut view, &mut battle, TilePos::new(15, 1, 0));
    view.update(&mut battle);
    assert_eq!(view.previews().path_cost(), PathCost::TOO_FAR);
    assert_eq!(view.previews().path_cost().value(), -2);
}

#[test]
fn path_preview_over_a_bottomless_column_stays_uncomputed() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    battle.holes.insert(TilePos::new(5, 5, 0));
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    hover(&mut view, &mut battle, TilePos::new(5, 5, 1));
    for _ in 0..3 {
        view.update(&mut battle);
        assert_eq!(view.previews().path_cost(), PathCost::UNCOMPUTED);
    }
}

#[test]
fn attack_preview_sentinels() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);
    key_down(&mut view, &mut battle, LSHIFT);

    hover(&mut view, &mut battle, TilePos::new(6, 6, 0));
    view.update(&mut battle);
    assert_eq!(view.previews().attack_cost(), AttackCost::NO_WEAPON);
    assert_eq!(view.previews().attack_cost().value(), -4);

    battle.give(unit, Hand::Right, rifle());
    hover(&mut view, &mut battle, TilePos::new(6, 7, 0));
    view.update(&mut battle);
    assert_eq!(view.previews().attack_cost(), AttackCost::cost(12));

    battle.out_of_reach.insert(TilePos::new(6, 8, 0));
    hover(&mut view, &mut battle, TilePos::new(6, 8, 0));
    view.update(&mut battle);
    assert_eq!(view.previews().attack_cost().value(), -2);

    battle.give(
        unit,
        Hand::Right,
        ItemView {
            launcher: true,
            ..rifle()
        },
    );
    hover(&mut view, &mut battle, TilePos::new(6, 6, 0));
    hover(&mut view, &mut battle, TilePos::new(6, 8, 0));
    view.update(&mut battle);
    assert_eq!(view.previews().attack_cost().value(), -3);

    key_up(&mut view, &mut battle, LSHIFT);
    view.update(&mut battle);
    assert_eq!(
        view.previews().attack_cost(),
        AttackCost::UNCOMPUTED,
        "leaving fire mode drops the attack preview"
    );
}

#[test]
fn turning_resets_only_the_attack_preview() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    battle.give(unit, Hand::Right, rifle());
    let mut config = config();
    config.previews.attack_delay = 3;
    let mut view = open(&battle, config);
    select(&mut view, &mut battle, unit);

    // Path previews are dropped in fire modes, so compute the path first.
    hover(&mut view, &mut battle, TilePos::new(3, 1, 0));
    view.update(&mut battle);
    let path = view.previews().path_cost();
    assert!(path.is_computed());

    battle.unit_mut(unit).unwrap().goal_facing = Facing::new(1, 0);
    view.update(&mut battle);
    assert_eq!(view.previews().path_cost(), path);

    battle.unit_mut(unit).unwrap().tile = TilePos::new(2, 1, 0);
    battle.unit_mut(unit).unwrap().goal = TilePos::new(2, 1, 0);
    battle.unit_mut(unit).unwrap().goal_facing = Facing::new(0, 1);
    key_down(&mut view, &mut battle, LSHIFT);
    for _ in 0..4 {
        view.update(&mut battle);
    }
    assert_eq!(view.previews().attack_cost(), AttackCost::cost(12));

    battle.unit_mut(unit).unwrap().goal_facing = Facing::new(1, 1);
    view.update(&mut battle);
    assert_eq!(view.previews().attack_cost(), AttackCost::UNCOMPUTED);
}

fn right_hand(plan: RenderPlan) -> Arc<image::RgbaImage> {
    match plan {
        RenderPlan::Battle(frame) => frame.right_hand.unwrap(),
        RenderPlan::Cutaway(_) => panic!("unexpected cut-away"),
    }
}

#[test]
fn hand_overlay_is_redrawn_only_when_its_snapshot_changes() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    battle.give(unit, Hand::Right, rifle());
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    let first = right_hand(view.render(&battle));
    let drawn = view.overlays().redraws();
    let second = right_hand(view.render(&battle));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(view.overlays().redraws(), drawn);

    battle.hands.get_mut(&(unit, Hand::Right)).unwrap().ammo = 9;
    let third = right_hand(view.render(&battle));
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(view.overlays().redraws(), drawn + 1);
}

#[test]
fn hand_overlays_hold_still_behind_side_panels() {
    let mut battle = MockBattle::turn_based();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    battle.give(unit, Hand::Right, rifle());
    battle.give(
        unit,
        Hand::Left,
        ItemView {
            type_id: ItemTypeId(12),
            kind: ItemKind::Grenade,
            loaded: true,
            ..ItemView::default()
        },
    );
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);
    let first = right_hand(view.render(&battle));

    view.execute(&mut battle, ViewCommand::UseItem { hand: Hand::Left, automatic: false });
    assert_eq!(view.panel(), ActivePanel::Priming);
    battle.hands.get_mut(&(unit, Hand::Right)).unwrap().ammo = 9;
    let drawn = view.overlays().redraws();
    let behind_panel = right_hand(view.render(&battle));
    assert!(Arc::ptr_eq(&first, &behind_panel));
    assert_eq!(view.overlays().redraws(), drawn);

    view.execute(&mut battle, ViewCommand::Cancel);
    assert_eq!(view.panel(), ActivePanel::Main);
    let refreshed = right_hand(view.render(&battle));
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(view.overlays().redraws(), drawn + 1);
}

#[test]
fn in_use_items_open_their_panels() {
    let mut battle = MockBattle::real_time();
    let unit = battle.spawn(1, MockBattle::PLAYER, TilePos::new(1, 1, 0));
    battle.give(
        unit,
        Hand::Right,
        ItemView {
            type_id: ItemTypeId(30),
            kind: ItemKind::MotionScanner,
            loaded: true,
            in_use: true,
            ..ItemView::default()
        },
    );
    battle.scanners.insert(
        (unit, Hand::Right),
        ScannerView {
            id: ScannerId(1),
            version: 3,
            movement_ticks: vec![0; 16 * 16],
            width: 16,
            height: 16,
        },
    );
    battle.give(
        unit,
        Hand::Left,
        ItemView {
            type_id: ItemTypeId(31),
            kind: ItemKind::MediKit,
            loaded: true,
            in_use: true,
            ..ItemView::default()
        },
    );
    battle.unit_mut(unit).unwrap().fatal_wounds[BodyPart::Legs.index()] = 2;
    let mut view = open(&battle, config());
    select(&mut view, &mut battle, unit);

    let RenderPlan::Battle(frame) = view.render(&battle) else {
        panic!("unexpected cut-away");
    };
    assert!(frame.scanner.is_some());
    let medikit = frame.medikit.unwrap();
    assert_eq!(medikit.wounds, vec![(BodyPart::Legs, false)]);
    assert!(!frame.pause_icon_lit, "real time never blinks the pause icon");
}
