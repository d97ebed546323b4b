//! Hand-slot, psi and motion-scanner bitmaps.
//!
//! Each bitmap is memoized on its snapshot; an unchanged snapshot hands back
//! the previously drawn image without touching a pixel.

pub mod draw;
pub mod palette;
pub mod snapshot;

use std::sync::Arc;

use battle_core::{Hand, ScannerView, UnitView};
use image::RgbaImage;

pub use snapshot::{
    ItemOverlaySnapshot, MedikitSnapshot, MotionScannerSnapshot, PsiInfoSnapshot, ScannerSource,
};

/// Last snapshot and the value drawn from it.
#[derive(Debug)]
pub struct Memo<K, V> {
    cached: Option<(K, Arc<V>)>,
    redraws: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            cached: None,
            redraws: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn get_or_draw(&mut self, key: K, draw: impl FnOnce(&K) -> V) -> Arc<V> {
        if let Some((cached_key, value)) = &self.cached {
            if *cached_key == key {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(draw(&key));
        self.redraws += 1;
        self.cached = Some((key, Arc::clone(&value)));
        value
    }

    /// Last drawn value, whatever snapshot it came from.
    pub fn current(&self) -> Option<Arc<V>> {
        self.cached.as_ref().map(|(_, value)| Arc::clone(value))
    }

    /// Number of times a value has been drawn.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

/// Energy, attack and defense bars of the front unit.
#[derive(Clone, Debug)]
pub struct PsiBars {
    pub energy: RgbaImage,
    pub attack: RgbaImage,
    pub defense: RgbaImage,
}

impl PsiBars {
    fn draw(info: &PsiInfoSnapshot) -> Self {
        Self {
            energy: draw::psi_bar(info.current.energy, info.max.energy),
            attack: draw::psi_bar(info.current.attack, info.max.attack),
            defense: draw::psi_bar(info.current.defense, info.max.defense),
        }
    }
}

#[derive(Debug, Default)]
pub struct OverlayCompositor {
    left: Memo<ItemOverlaySnapshot, RgbaImage>,
    right: Memo<ItemOverlaySnapshot, RgbaImage>,
    psi: Memo<PsiInfoSnapshot, PsiBars>,
    scanner: Memo<MotionScannerSnapshot, RgbaImage>,
}

impl OverlayCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&mut self, hand: Hand, info: ItemOverlaySnapshot) -> Arc<RgbaImage> {
        let memo = match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        memo.get_or_draw(info, |info| draw::item_overlay(info, hand))
    }

    /// The hand overlay as last drawn, without refreshing it.
    pub fn last_item(&self, hand: Hand) -> Option<Arc<RgbaImage>> {
        match hand {
            Hand::Left => self.left.current(),
            Hand::Right => self.right.current(),
        }
    }

    pub fn psi_bars(&mut self, info: PsiInfoSnapshot) -> Arc<PsiBars> {
        self.psi.get_or_draw(info, PsiBars::draw)
    }

    pub fn scanner_live(
        &mut self,
        info: MotionScannerSnapshot,
        scanner: &ScannerView,
        remain_lit_ticks: u32,
    ) -> Arc<RgbaImage> {
        self.scanner
            .get_or_draw(info, |_| draw::scanner_live(scanner, remain_lit_ticks))
    }

    /// `units` is only consulted when the snapshot changed.
    pub fn scanner_sampled(
        &mut self,
        info: MotionScannerSnapshot,
        units: impl FnOnce() -> Vec<UnitView>,
    ) -> Arc<RgbaImage> {
        self.scanner
            .get_or_draw(info, |info| draw::scanner_sampled(&units(), info.position))
    }

    /// Total bitmaps drawn across all slots.
    pub fn redraws(&self) -> u64 {
        self.left.redraws() + self.right.redraws() + self.psi.redraws() + self.scanner.redraws()
    }

    pub fn invalidate(&mut self) {
        self.left.invalidate();
        self.right.invalidate();
        self.psi.invalidate();
        self.scanner.invalidate();
    }
}
