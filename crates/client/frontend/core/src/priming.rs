//! Priming panel for manually armed explosives.

use battle_core::{BattleMode, Hand, Priming, TICKS_PER_SECOND, TICKS_PER_TURN, TriggerKind};

/// Slider state while a grenade is being primed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimingPanel {
    hand: Hand,
    trigger: TriggerKind,
    delay: i32,
    range: i32,
}

impl PrimingPanel {
    pub fn open(hand: Hand, trigger: TriggerKind) -> Self {
        Self {
            hand,
            trigger,
            delay: 0,
            range: 0,
        }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    /// Proximity-style triggers also take a detection range.
    pub fn shows_range(&self) -> bool {
        self.trigger.has_range()
    }

    pub fn delay(&self) -> i32 {
        self.delay
    }

    pub fn range(&self) -> i32 {
        self.range
    }

    pub fn set_delay(&mut self, delay: i32) {
        self.delay = delay.max(0);
    }

    pub fn set_range(&mut self, range: i32) {
        self.range = range.max(0);
    }

    pub fn delay_text(&self, mode: BattleMode) -> String {
        match (self.delay, mode) {
            (0, _) => "Activates now.".to_owned(),
            (1, BattleMode::TurnBased) => "Activates at end of turn.".to_owned(),
            (delay, BattleMode::TurnBased) => format!("Turns before activation: {}", delay - 1),
            (delay, BattleMode::RealTime) => format!("Delay = {}", delay / 4),
        }
    }

    pub fn range_text(&self) -> String {
        format!("Range = {:.1}m.", (self.range + 1) as f32 * 1.5)
    }

    /// Fuse settings for the confirm button.
    pub fn priming(&self, mode: BattleMode) -> Priming {
        if self.delay == 0 {
            return Priming::Default;
        }
        let delay = self.delay as u64;
        let ticks = match mode {
            BattleMode::TurnBased => delay * TICKS_PER_TURN,
            BattleMode::RealTime => delay * TICKS_PER_SECOND / 4,
        };
        Priming::Delayed {
            ticks,
            range: (self.range + 1) * 6,
        }
    }
}
