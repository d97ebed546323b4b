//! Fixed colours used by the overlay bitmaps.

use image::Rgba;

/// Accuracy meter gradient, worst to best.
pub const ACCURACY: [Rgba<u8>; 10] = [
    Rgba([176, 16, 16, 255]),
    Rgba([196, 44, 16, 255]),
    Rgba([212, 76, 16, 255]),
    Rgba([224, 112, 20, 255]),
    Rgba([232, 148, 24, 255]),
    Rgba([236, 184, 28, 255]),
    Rgba([212, 204, 32, 255]),
    Rgba([168, 204, 36, 255]),
    Rgba([120, 200, 40, 255]),
    Rgba([72, 192, 44, 255]),
];

pub const AMMO: Rgba<u8> = Rgba([152, 208, 96, 255]);

pub const PSI_BORDER: Rgba<u8> = Rgba([150, 70, 150, 255]);
pub const PSI_BAR: Rgba<u8> = Rgba([180, 120, 150, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Motion scanner gray level; level 0 is fully transparent.
pub const fn scanner_level(level: u8) -> Rgba<u8> {
    let level = if level > 15 { 15 } else { level };
    if level == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let gray = level * 16;
    Rgba([gray, gray, gray, 255])
}
