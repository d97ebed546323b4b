//! Battle view configuration structures and loaders.
//!
//! Tick thresholds are counted in simulation ticks
//! ([`battle_core::TICKS_PER_SECOND`] per in-game second).

use std::env;

/// Battle view configuration.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub previews: PreviewConfig,
    pub delays: DelayConfig,
    pub turns: TurnConfig,
    pub messages: MessageConfig,

    /// Time units spent picking an item up from the floor.
    pub pickup_cost: i32,
    /// Ticks a motion scanner cell stays lit after movement.
    pub scanner_remain_lit_ticks: u32,

    /// Enables cheat keys and the cheat teleport.
    pub debug_mode: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            previews: PreviewConfig::default(),
            delays: DelayConfig::default(),
            turns: TurnConfig::default(),
            messages: MessageConfig::default(),
            pickup_cost: 8,
            scanner_remain_lit_ticks: 240,
            debug_mode: false,
        }
    }
}

impl ViewConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_PATH_PREVIEW_TICKS` - Idle ticks before a path preview (default: 30)
    /// - `BATTLE_ATTACK_PREVIEW_TICKS` - Idle ticks before an attack cost preview (default: 5)
    /// - `BATTLE_ACTION_IMPOSSIBLE_TICKS` - Blocked cursor duration after a refused order (default: 40)
    /// - `BATTLE_THROW_BUTTON_TICKS` - Throw button highlight without a throwable (default: 5)
    /// - `BATTLE_END_TURN_IDLE_TICKS` - Idle ticks before offering unit continuation (default: 60)
    /// - `BATTLE_HIDE_DISPLAY_TICKS` - Unseen enemy ticks before the cut-away (default: 60)
    /// - `BATTLE_HIDDEN_CATCHUP_TICKS` - Ticks per frame during the cut-away (default: 16)
    /// - `BATTLE_PICKUP_COST` - Time units for picking up an item (default: 8)
    /// - `BATTLE_SCANNER_REMAIN_LIT_TICKS` - Motion scanner afterglow (default: 240)
    /// - `BATTLE_MESSAGE_CAPACITY` - News ticker capacity (default: 50)
    /// - `BATTLE_DEBUG` - Enable cheat keys (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("BATTLE_PATH_PREVIEW_TICKS") {
            config.previews.path_delay = ticks;
        }
        if let Some(ticks) = read_env::<u32>("BATTLE_ATTACK_PREVIEW_TICKS") {
            config.previews.attack_delay = ticks;
        }

        if let Some(ticks) = read_env::<u32>("BATTLE_ACTION_IMPOSSIBLE_TICKS") {
            config.delays.action_impossible = ticks;
        }
        if let Some(ticks) = read_env::<u32>("BATTLE_THROW_BUTTON_TICKS") {
            config.delays.throw_button = ticks;
        }

        if let Some(ticks) = read_env::<u64>("BATTLE_END_TURN_IDLE_TICKS") {
            config.turns.end_turn_idle_ticks = ticks;
        }
        if let Some(ticks) = read_env::<u64>("BATTLE_HIDE_DISPLAY_TICKS") {
            config.turns.hide_display_ticks = ticks;
        }
        if let Some(ticks) = read_env::<u32>("BATTLE_HIDDEN_CATCHUP_TICKS") {
            config.turns.hidden_catchup_ticks = ticks.max(1);
        }

        if let Some(cost) = read_env::<i32>("BATTLE_PICKUP_COST") {
            config.pickup_cost = cost.max(0);
        }
        if let Some(ticks) = read_env::<u32>("BATTLE_SCANNER_REMAIN_LIT_TICKS") {
            config.scanner_remain_lit_ticks = ticks.max(1);
        }
        if let Some(capacity) = read_env::<usize>("BATTLE_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }
        if let Some(debug) = read_env_bool("BATTLE_DEBUG") {
            config.debug_mode = debug;
        }

        config
    }

    #[must_use]
    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

/// Idle thresholds for the throttled previews.
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub path_delay: u32,
    pub attack_delay: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            path_delay: 30,
            attack_delay: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DelayConfig {
    pub action_impossible: u32,
    pub throw_button: u32,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            action_impossible: 40,
            throw_button: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TurnConfig {
    pub end_turn_idle_ticks: u64,
    pub hide_display_ticks: u64,
    pub hidden_catchup_ticks: u32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            end_turn_idle_ticks: battle_core::TICKS_PER_SECOND,
            hide_display_ticks: battle_core::TICKS_PER_SECOND,
            hidden_catchup_ticks: 16,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
