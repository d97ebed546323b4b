//! Keyboard shortcut map.

use battle_core::KillScope;
use crossterm::event::KeyCode;

use super::ModifierKeys;

/// Cheat shortcuts, only produced in debug mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugKey {
    ForceEndTurn,
    CollapseTile,
    RevealMap,
    MakeProne,
    Kill(KillScope),
    Retreat,
    AmplifyPsi,
    Panic,
    HealAll,
    RestoreTimeUnits,
    ToggleAi,
    Jump,
}

/// High-level outcome of a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Escape: leave the current aiming mode or open the options screen.
    Cancel,
    LayerUp,
    LayerDown,
    ToggleStrategyMap,
    TogglePause,
    Debug(DebugKey),
    None,
}

/// Translates key presses into view actions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortcutMap {
    debug_mode: bool,
}

impl ShortcutMap {
    pub const fn new(debug_mode: bool) -> Self {
        Self { debug_mode }
    }

    pub fn handle_key(&self, code: KeyCode, modifiers: ModifierKeys) -> KeyAction {
        match code {
            KeyCode::Esc => KeyAction::Cancel,
            KeyCode::PageUp => KeyAction::LayerUp,
            KeyCode::PageDown => KeyAction::LayerDown,
            KeyCode::Tab => KeyAction::ToggleStrategyMap,
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char(ch) if self.debug_mode => self
                .debug_key(ch.to_ascii_lowercase(), modifiers)
                .map_or(KeyAction::None, KeyAction::Debug),
            _ => KeyAction::None,
        }
    }

    fn debug_key(&self, ch: char, modifiers: ModifierKeys) -> Option<DebugKey> {
        let key = match ch {
            'e' => DebugKey::ForceEndTurn,
            'f' => DebugKey::CollapseTile,
            'r' => DebugKey::RevealMap,
            'q' => DebugKey::MakeProne,
            's' if modifiers.shift() => DebugKey::Kill(KillScope::AllExcept),
            's' if modifiers.ctrl() => DebugKey::Kill(KillScope::Radius(5)),
            's' => DebugKey::Kill(KillScope::Only),
            'k' => DebugKey::Retreat,
            'p' if modifiers.shift() => DebugKey::AmplifyPsi,
            'p' => DebugKey::Panic,
            'h' => DebugKey::HealAll,
            't' => DebugKey::RestoreTimeUnits,
            'a' => DebugKey::ToggleAi,
            'j' => DebugKey::Jump,
            _ => return None,
        };
        Some(key)
    }
}
