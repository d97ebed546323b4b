//! Per-pixel bitmap routines. No blending: every pixel is either set or left
//! transparent.

use battle_core::{Hand, ScannerView, UnitView};
use image::{Rgba, RgbaImage};

use super::palette;
use super::snapshot::ItemOverlaySnapshot;

pub const ITEM_OVERLAY_WIDTH: u32 = 50;
pub const ITEM_OVERLAY_HEIGHT: u32 = 95;

const ACCURACY_ROW: i32 = 93;
const AMMO_DISPLAY_SIZE: i32 = 90;

pub const PSI_BAR_WIDTH: u32 = 137;
pub const PSI_BAR_HEIGHT: u32 = 6;

/// Scanner grid in cells; the bitmap is upsampled 2x.
pub const SCANNER_CELLS_X: i32 = 16;
pub const SCANNER_CELLS_Y: i32 = 16;

fn set(image: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, colour);
    }
}

/// Accuracy bar along the bottom and the ammo column beside the item icon.
///
/// The right hand's bar grows from the left edge; the left hand's is mirrored.
pub fn item_overlay(info: &ItemOverlaySnapshot, hand: Hand) -> RgbaImage {
    let mut image = RgbaImage::new(ITEM_OVERLAY_WIDTH, ITEM_OVERLAY_HEIGHT);
    let width = ITEM_OVERLAY_WIDTH as i32;

    if info.accuracy / 2 > 0 {
        let accuracy = info.accuracy;
        let colours = palette::ACCURACY.len() as i32;
        for x in 0..accuracy {
            let colour = palette::ACCURACY[((x * colours / accuracy) as usize).min(palette::ACCURACY.len() - 1)];
            let column = if hand.is_right() { x } else { width - 1 - x };
            set(&mut image, column, ACCURACY_ROW, colour);
            set(&mut image, column, ACCURACY_ROW + 1, colour);
        }
    }

    if info.max_ammo > 0 && info.cur_ammo > 0 {
        let mut count = info.cur_ammo;
        let mut padding = 1;
        let mut size = AMMO_DISPLAY_SIZE / info.max_ammo - 1;
        let x = if hand.is_right() { 1 } else { 47 };
        if size <= 0 {
            // Too many rounds for discrete segments: one pixel row per share.
            size = 1;
            padding = 0;
            count = count * AMMO_DISPLAY_SIZE / info.max_ammo;
        }
        for i in 0..count {
            for j in 0..size {
                let y = AMMO_DISPLAY_SIZE - 1 - i * (size + padding) - j;
                set(&mut image, x, y, palette::AMMO);
                set(&mut image, x + 1, y, palette::AMMO);
            }
        }
    }

    image
}

/// Bordered two-tone bar: filled up to `cur`, outlined up to `max`, both in percent.
pub fn psi_bar(cur: i32, max: i32) -> RgbaImage {
    let width = PSI_BAR_WIDTH as i32;
    let height = PSI_BAR_HEIGHT as i32;
    let span = width - 3;
    let cur_width = (span * cur / 100).clamp(0, span) + 1;
    let max_width = (span * max / 100).clamp(0, span) + 2;

    let mut image = RgbaImage::new(PSI_BAR_WIDTH, PSI_BAR_HEIGHT);
    for x in 1..max_width {
        for y in 1..height - 1 {
            let colour = if x <= cur_width {
                palette::PSI_BAR
            } else {
                palette::BLACK
            };
            set(&mut image, x, y, colour);
        }
    }
    for y in 1..height - 1 {
        set(&mut image, 0, y, palette::PSI_BORDER);
        set(&mut image, max_width, y, palette::PSI_BORDER);
    }
    for x in 0..=max_width {
        set(&mut image, x, 0, palette::PSI_BORDER);
        set(&mut image, x, height - 1, palette::PSI_BORDER);
    }
    for x in max_width + 1..width {
        for y in 0..height {
            set(&mut image, x, y, palette::BLACK);
        }
    }
    image
}

fn scanner_canvas() -> RgbaImage {
    RgbaImage::new(SCANNER_CELLS_X as u32 * 2, SCANNER_CELLS_Y as u32 * 2)
}

fn fill_cell(image: &mut RgbaImage, x: i32, y: i32, level: u8) {
    let colour = palette::scanner_level(level);
    for i in 0..=1 {
        for j in 0..=1 {
            set(image, 2 * x + i, 2 * y + j, colour);
        }
    }
}

/// Real-time heat map straight from the scanner's per-cell movement ticks.
pub fn scanner_live(scanner: &ScannerView, remain_lit_ticks: u32) -> RgbaImage {
    let mut image = scanner_canvas();
    let remain_lit = u64::from(remain_lit_ticks.max(1));
    for x in 0..SCANNER_CELLS_X {
        for y in 0..SCANNER_CELLS_Y {
            let ticks = u64::from(scanner.ticks_at(x as usize, y as usize));
            let level = (ticks * 16 / remain_lit).min(15) as u8;
            fill_cell(&mut image, x, y, level);
        }
    }
    image
}

/// Turn-based heat map sampled from how far conscious units moved recently,
/// centred on `centre`.
pub fn scanner_sampled(units: &[UnitView], centre: (i32, i32)) -> RgbaImage {
    let mid = (SCANNER_CELLS_X / 2, SCANNER_CELLS_Y / 2);
    let mut heat = vec![0u32; (SCANNER_CELLS_X * SCANNER_CELLS_Y) as usize];

    for unit in units.iter().filter(|u| u.conscious && u.tiles_moved > 0) {
        let x = unit.tile.x - centre.0 + mid.0;
        let y = unit.tile.y - centre.1 + mid.1;
        if x < 0 || y < 0 || x >= SCANNER_CELLS_X || y >= SCANNER_CELLS_Y {
            continue;
        }
        let cell = &mut heat[(y * SCANNER_CELLS_X + x) as usize];
        *cell = (*cell).max(unit.tiles_moved);
    }

    let mut image = scanner_canvas();
    for x in 0..SCANNER_CELLS_X {
        for y in 0..SCANNER_CELLS_Y {
            let moved = heat[(y * SCANNER_CELLS_X + x) as usize];
            let level = if moved > 0 { 5 + moved * 2 / 3 } else { 0 };
            fill_cell(&mut image, x, y, level.min(15) as u8);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{TilePos, UnitId};

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn accuracy_bar_mirrors_for_left_hand() {
        let info = ItemOverlaySnapshot {
            accuracy: 10,
            ..ItemOverlaySnapshot::default()
        };
        let right = item_overlay(&info, Hand::Right);
        let left = item_overlay(&info, Hand::Left);

        assert_eq!(*right.get_pixel(0, 93), palette::ACCURACY[0]);
        assert_eq!(*right.get_pixel(9, 94), palette::ACCURACY[9]);
        assert_eq!(*right.get_pixel(10, 93), CLEAR);
        assert_eq!(*left.get_pixel(49, 93), palette::ACCURACY[0]);
        assert_eq!(*left.get_pixel(40, 93), palette::ACCURACY[9]);
        assert_eq!(*left.get_pixel(39, 93), CLEAR);
    }

    #[test]
    fn tiny_accuracy_draws_nothing() {
        let info = ItemOverlaySnapshot {
            accuracy: 1,
            ..ItemOverlaySnapshot::default()
        };
        let image = item_overlay(&info, Hand::Right);
        assert_eq!(*image.get_pixel(0, 93), CLEAR);
    }

    #[test]
    fn ammo_draws_discrete_segments() {
        // 90 / 9 - 1 = 9 pixel segments with one pixel of padding.
        let info = ItemOverlaySnapshot {
            cur_ammo: 2,
            max_ammo: 9,
            ..ItemOverlaySnapshot::default()
        };
        let image = item_overlay(&info, Hand::Right);
        assert_eq!(*image.get_pixel(1, 89), palette::AMMO);
        assert_eq!(*image.get_pixel(2, 81), palette::AMMO);
        assert_eq!(*image.get_pixel(1, 80), CLEAR, "padding row");
        assert_eq!(*image.get_pixel(1, 79), palette::AMMO);
        assert_eq!(*image.get_pixel(1, 70), CLEAR, "third segment not drawn");
    }

    #[test]
    fn large_magazines_degrade_to_proportional_fill() {
        let info = ItemOverlaySnapshot {
            cur_ammo: 50,
            max_ammo: 100,
            ..ItemOverlaySnapshot::default()
        };
        let image = item_overlay(&info, Hand::Left);
        let filled = (0..90).filter(|y| *image.get_pixel(47, *y) == palette::AMMO).count();
        assert_eq!(filled, 45);
        assert_eq!(*image.get_pixel(48, 89), palette::AMMO);
    }

    #[test]
    fn psi_bar_layers_fill_outline_and_remainder() {
        let image = psi_bar(50, 100);
        // cur width = 67 + 1, max width = 134 + 2
        assert_eq!(*image.get_pixel(0, 2), palette::PSI_BORDER);
        assert_eq!(*image.get_pixel(68, 2), palette::PSI_BAR);
        assert_eq!(*image.get_pixel(69, 2), palette::BLACK);
        assert_eq!(*image.get_pixel(136, 3), palette::PSI_BORDER);
        assert_eq!(*image.get_pixel(40, 0), palette::PSI_BORDER);
        assert_eq!(*image.get_pixel(40, 5), palette::PSI_BORDER);

        let short = psi_bar(10, 20);
        let max_width = 134 * 20 / 100 + 2;
        assert_eq!(*short.get_pixel(max_width as u32, 2), palette::PSI_BORDER);
        assert_eq!(*short.get_pixel(max_width as u32 + 1, 0), palette::BLACK);
    }

    #[test]
    fn live_scanner_quantises_ticks_into_sixteen_levels() {
        let mut ticks = vec![0; 256];
        ticks[0] = 240;
        ticks[1] = 30;
        let scanner = ScannerView {
            movement_ticks: ticks,
            width: 16,
            height: 16,
            ..ScannerView::default()
        };
        let image = scanner_live(&scanner, 240);
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(*image.get_pixel(1, 1), palette::scanner_level(15));
        assert_eq!(*image.get_pixel(2, 0), palette::scanner_level(2));
        assert_eq!(*image.get_pixel(4, 4), CLEAR);
    }

    #[test]
    fn sampled_scanner_centres_on_the_holder() {
        let mover = UnitView {
            id: UnitId(2),
            conscious: true,
            tiles_moved: 3,
            tile: TilePos::new(11, 10, 0),
            ..UnitView::default()
        };
        let sleeper = UnitView {
            tiles_moved: 9,
            tile: TilePos::new(10, 10, 0),
            ..UnitView::default()
        };
        let image = scanner_sampled(&[mover, sleeper], (10, 10));
        // (11,10) lands in cell (9,8); level = 5 + 3*2/3 = 7.
        assert_eq!(*image.get_pixel(18, 16), palette::scanner_level(7));
        assert_eq!(*image.get_pixel(16, 16), CLEAR, "unconscious units are ignored");
    }
}
