//! Input vocabulary of the battle view.
//!
//! The view only sees tile-space events: screen-to-tile projection belongs to
//! the map renderer. Keyboard events arrive as `crossterm` key codes so the
//! interaction core stays independent of any particular window toolkit.

use battle_core::TilePos;
use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, ModifierKeyCode, MouseButton};

use crate::controls::{ControlEvent, ControlId};

pub mod shortcuts;
pub use shortcuts::{DebugKey, KeyAction, ShortcutMap};

bitflags! {
    /// Held modifier keys, one flag per physical key.
    ///
    /// Set on key-down and cleared on key-up; never polled. Left and right
    /// variants are OR'd together when consulted.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierKeys: u8 {
        const LSHIFT = 0b0000_0001;
        const RSHIFT = 0b0000_0010;
        const LALT   = 0b0000_0100;
        const RALT   = 0b0000_1000;
        const LCTRL  = 0b0001_0000;
        const RCTRL  = 0b0010_0000;

        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const ALT   = Self::LALT.bits() | Self::RALT.bits();
        const CTRL  = Self::LCTRL.bits() | Self::RCTRL.bits();
    }
}

impl ModifierKeys {
    #[inline]
    pub fn shift(self) -> bool {
        self.intersects(Self::SHIFT)
    }

    #[inline]
    pub fn alt(self) -> bool {
        self.intersects(Self::ALT)
    }

    #[inline]
    pub fn ctrl(self) -> bool {
        self.intersects(Self::CTRL)
    }

    /// Flag tracked for a physical modifier key; other modifiers are ignored.
    pub fn flag_for(code: ModifierKeyCode) -> Option<Self> {
        match code {
            ModifierKeyCode::LeftShift => Some(Self::LSHIFT),
            ModifierKeyCode::RightShift => Some(Self::RSHIFT),
            ModifierKeyCode::LeftAlt => Some(Self::LALT),
            ModifierKeyCode::RightAlt => Some(Self::RALT),
            ModifierKeyCode::LeftControl => Some(Self::LCTRL),
            ModifierKeyCode::RightControl => Some(Self::RCTRL),
            _ => None,
        }
    }

    /// Applies a key transition. Returns false for keys that are not tracked.
    pub fn apply(&mut self, code: KeyCode, pressed: bool) -> bool {
        let KeyCode::Modifier(modifier) = code else {
            return false;
        };
        let Some(flag) = Self::flag_for(modifier) else {
            return false;
        };
        self.set(flag, pressed);
        true
    }
}

/// Notice raised by the simulation for the player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameNotice {
    pub message: Option<String>,
    /// Set for notices that ask the camera to jump to a location.
    pub zoom_to: Option<TilePos>,
}

/// Everything the battle view reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    PointerMoved { tile: TilePos },
    PointerPressed { button: MouseButton, tile: TilePos },
    Control { control: ControlId, event: ControlEvent },
    Notice(GameNotice),
}

impl ViewEvent {
    /// Converts a terminal key event. Repeats count as presses.
    pub fn from_key(key: KeyEvent) -> Self {
        match key.kind {
            KeyEventKind::Release => Self::KeyUp(key.code),
            KeyEventKind::Press | KeyEventKind::Repeat => Self::KeyDown(key.code),
        }
    }
}

impl From<KeyEvent> for ViewEvent {
    fn from(key: KeyEvent) -> Self {
        Self::from_key(key)
    }
}
