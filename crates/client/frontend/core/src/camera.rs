//! Simulation speed and camera state of the battle view.

use battle_core::{BattleMode, TilePos, ViewPersistence};
use tracing::debug;

/// Ticks the simulation advances per rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UpdateSpeed {
    #[default]
    Pause,
    Speed1,
    Speed2,
    Speed3,
}

impl UpdateSpeed {
    pub const fn ticks(self) -> u32 {
        match self {
            Self::Pause => 0,
            Self::Speed1 => 1,
            Self::Speed2 => 2,
            Self::Speed3 => 4,
        }
    }
}

/// Current speed plus the one the pause toggle returns to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedControl {
    current: UpdateSpeed,
    last: UpdateSpeed,
}

impl SpeedControl {
    /// Real-time battles open paused; turn-based ones run.
    pub fn for_mode(mode: BattleMode) -> Self {
        match mode {
            BattleMode::RealTime => Self {
                current: UpdateSpeed::Pause,
                last: UpdateSpeed::Speed1,
            },
            BattleMode::TurnBased => Self {
                current: UpdateSpeed::Speed2,
                last: UpdateSpeed::Pause,
            },
        }
    }

    pub fn current(&self) -> UpdateSpeed {
        self.current
    }

    pub fn is_paused(&self) -> bool {
        self.current == UpdateSpeed::Pause
    }

    pub fn set(&mut self, speed: UpdateSpeed) {
        if speed != self.current {
            self.last = self.current;
            self.current = speed;
            debug!(target: "view", speed = %speed, "update speed changed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.set(self.last);
        } else {
            self.set(UpdateSpeed::Pause);
        }
    }
}

/// Which z levels the map renderer draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LayerDrawing {
    #[default]
    UpToCurrentLevel,
    AllLevels,
    OnlyCurrentLevel,
}

impl LayerDrawing {
    /// Layering button state, 1 to 3.
    pub const fn from_button_state(state: u8) -> Option<Self> {
        match state {
            1 => Some(Self::UpToCurrentLevel),
            2 => Some(Self::AllLevels),
            3 => Some(Self::OnlyCurrentLevel),
            _ => None,
        }
    }
}

/// Where the view looks and which layer it cuts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    center: TilePos,
    /// Highest visible z level plus one.
    layer: i32,
    max_layer: i32,
    pub follow_agent: bool,
    pub strategy_map: bool,
    pub layer_drawing: LayerDrawing,
}

impl Camera {
    pub fn new(center: TilePos, max_layer: i32) -> Self {
        let max_layer = max_layer.max(1);
        Self {
            center,
            layer: (center.z + 1).clamp(1, max_layer),
            max_layer,
            follow_agent: false,
            strategy_map: false,
            layer_drawing: LayerDrawing::default(),
        }
    }

    pub fn center(&self) -> TilePos {
        self.center
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn max_layer(&self) -> i32 {
        self.max_layer
    }

    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer.clamp(1, self.max_layer);
    }

    pub fn layer_up(&mut self) {
        self.set_layer(self.layer + 1);
    }

    pub fn layer_down(&mut self) {
        self.set_layer(self.layer - 1);
    }

    pub fn center_on(&mut self, tile: TilePos) {
        self.center = tile;
    }

    /// Centres on `tile` and cuts the view just above it.
    pub fn zoom_at(&mut self, tile: TilePos) {
        self.center_on(tile);
        self.set_layer(tile.z + 1);
    }

    pub fn toggle_strategy_map(&mut self) -> bool {
        self.strategy_map = !self.strategy_map;
        self.strategy_map
    }

    pub fn persistence(&self, group_move: bool) -> ViewPersistence {
        ViewPersistence {
            screen_center: self.center,
            group_move,
        }
    }
}
