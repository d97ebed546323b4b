//! Interaction mode state machine.
//!
//! One [`InteractionMode`] decides how every click is interpreted. All changes
//! go through [`InteractionState::apply`], which returns the side effects the
//! caller must carry out (preview resets, cursor glyph) instead of performing
//! them itself.

use battle_core::{Hand, PsiStatus, WeaponStatus};
use tracing::info;

use crate::input::ModifierKeys;

/// How the next map click is interpreted.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Normal,
    /// Move while keeping the current facing.
    NormalAlt,
    /// Add to or remove from the selection.
    NormalCtrl,
    NormalCtrlAlt,
    /// Fire with whichever hand can, while Shift is held.
    FireAny,
    FireLeft,
    FireRight,
    ThrowLeft,
    ThrowRight,
    TeleportLeft,
    TeleportRight,
    PsiControl,
    PsiPanic,
    PsiStun,
    PsiProbe,
}

impl InteractionMode {
    pub const fn fire(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::FireLeft,
            Hand::Right => Self::FireRight,
        }
    }

    pub const fn throw(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::ThrowLeft,
            Hand::Right => Self::ThrowRight,
        }
    }

    pub const fn teleport(hand: Hand) -> Self {
        match hand {
            Hand::Left => Self::TeleportLeft,
            Hand::Right => Self::TeleportRight,
        }
    }

    /// Psi mode for an attack kind; `NotEngaged` has none.
    pub const fn psi(status: PsiStatus) -> Option<Self> {
        match status {
            PsiStatus::Control => Some(Self::PsiControl),
            PsiStatus::Panic => Some(Self::PsiPanic),
            PsiStatus::Stun => Some(Self::PsiStun),
            PsiStatus::Probe => Some(Self::PsiProbe),
            PsiStatus::NotEngaged => None,
        }
    }

    /// Entered explicitly and immune to modifier keys until cancelled.
    ///
    /// `FireAny` is held by Shift, so it follows the modifiers like the
    /// `Normal*` modes do.
    pub const fn is_sticky(self) -> bool {
        matches!(self, Self::FireLeft | Self::FireRight)
            || self.is_throw()
            || self.is_teleport()
            || self.is_psi()
    }

    pub const fn is_fire(self) -> bool {
        matches!(self, Self::FireAny | Self::FireLeft | Self::FireRight)
    }

    pub const fn is_throw(self) -> bool {
        matches!(self, Self::ThrowLeft | Self::ThrowRight)
    }

    pub const fn is_teleport(self) -> bool {
        matches!(self, Self::TeleportLeft | Self::TeleportRight)
    }

    pub const fn is_psi(self) -> bool {
        matches!(
            self,
            Self::PsiControl | Self::PsiPanic | Self::PsiStun | Self::PsiProbe
        )
    }

    pub const fn is_ctrl(self) -> bool {
        matches!(self, Self::NormalCtrl | Self::NormalCtrlAlt)
    }

    /// Aiming modes in which a path preview is meaningless.
    pub const fn suppresses_path_preview(self) -> bool {
        self.is_fire() || self.is_throw() || self.is_teleport() || self.is_psi()
    }

    /// Hand bound to a single-hand mode.
    pub const fn hand(self) -> Option<Hand> {
        match self {
            Self::FireLeft | Self::ThrowLeft | Self::TeleportLeft => Some(Hand::Left),
            Self::FireRight | Self::ThrowRight | Self::TeleportRight => Some(Hand::Right),
            _ => None,
        }
    }

    pub const fn weapon_status(self) -> WeaponStatus {
        match self {
            Self::FireLeft => WeaponStatus::FiringLeftHand,
            Self::FireRight => WeaponStatus::FiringRightHand,
            Self::FireAny => WeaponStatus::FiringBothHands,
            _ => WeaponStatus::NotFiring,
        }
    }

    pub const fn psi_status(self) -> PsiStatus {
        match self {
            Self::PsiControl => PsiStatus::Control,
            Self::PsiPanic => PsiStatus::Panic,
            Self::PsiStun => PsiStatus::Stun,
            Self::PsiProbe => PsiStatus::Probe,
            _ => PsiStatus::NotEngaged,
        }
    }

    /// Mode derived from modifiers alone.
    pub fn from_modifiers(modifiers: ModifierKeys, selection_empty: bool) -> Self {
        if modifiers.ctrl() {
            return if modifiers.alt() {
                Self::NormalCtrlAlt
            } else {
                Self::NormalCtrl
            };
        }
        if selection_empty {
            return Self::Normal;
        }
        if modifiers.shift() {
            Self::FireAny
        } else if modifiers.alt() {
            Self::NormalAlt
        } else {
            Self::Normal
        }
    }
}

/// Map cursor shown by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CursorGlyph {
    #[default]
    Normal,
    Add,
    Shoot,
    ThrowTarget,
    NoTarget,
    PsiTarget,
    Teleport,
    NoTeleport,
}

/// Input to the mode transition function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
    /// Once per frame, before any other per-frame work.
    Frame {
        modifiers: ModifierKeys,
        selection_empty: bool,
    },
    /// Explicit entry into an aiming mode (item use, throw or psi button).
    Enter(InteractionMode),
    /// Right click, Escape or a cancel button.
    Cancel,
    /// The order the aiming mode existed for was accepted.
    Completed,
    /// The simulation refused a throw or teleport.
    Refused,
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeIntent {
    ResetPathPreview,
    ResetAttackPreview,
    SetCursor(CursorGlyph),
}

/// Result of one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: InteractionMode,
    pub to: InteractionMode,
    pub intents: Vec<ModeIntent>,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Current mode plus the action-impossible cooldown.
#[derive(Clone, Debug)]
pub struct InteractionState {
    mode: InteractionMode,
    cursor: CursorGlyph,
    impossible_ticks: u32,
    impossible_delay: u32,
}

impl InteractionState {
    pub fn new(impossible_delay: u32) -> Self {
        Self {
            mode: InteractionMode::Normal,
            cursor: CursorGlyph::Normal,
            impossible_ticks: 0,
            impossible_delay,
        }
    }

    #[inline]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[inline]
    pub fn cursor(&self) -> CursorGlyph {
        self.cursor
    }

    /// Whether a refused order still shows the blocked cursor.
    pub fn action_impossible(&self) -> bool {
        self.impossible_ticks > 0
    }

    pub fn apply(&mut self, event: ModeEvent) -> Transition {
        let from = self.mode;
        let to = match event {
            ModeEvent::Frame {
                modifiers,
                selection_empty,
            } => {
                if !selection_empty && from.is_sticky() {
                    from
                } else {
                    InteractionMode::from_modifiers(modifiers, selection_empty)
                }
            }
            ModeEvent::Enter(mode) => mode,
            ModeEvent::Cancel | ModeEvent::Completed => InteractionMode::Normal,
            ModeEvent::Refused => {
                self.impossible_ticks = self.impossible_delay;
                from
            }
        };
        self.mode = to;

        let mut intents = Vec::with_capacity(3);
        if to.suppresses_path_preview() {
            intents.push(ModeIntent::ResetPathPreview);
        }
        if !to.is_fire() {
            intents.push(ModeIntent::ResetAttackPreview);
        }
        self.cursor = self.glyph_for(to);
        intents.push(ModeIntent::SetCursor(self.cursor));

        if matches!(event, ModeEvent::Frame { .. }) {
            self.impossible_ticks = self.impossible_ticks.saturating_sub(1);
        }

        if from != to {
            info!(target: "controls", from = %from, to = %to, ?event, "interaction mode changed");
        }

        Transition { from, to, intents }
    }

    fn glyph_for(&self, mode: InteractionMode) -> CursorGlyph {
        let blocked = self.action_impossible();
        match mode {
            InteractionMode::Normal | InteractionMode::NormalAlt => CursorGlyph::Normal,
            InteractionMode::NormalCtrl | InteractionMode::NormalCtrlAlt => CursorGlyph::Add,
            InteractionMode::FireAny | InteractionMode::FireLeft | InteractionMode::FireRight => {
                CursorGlyph::Shoot
            }
            InteractionMode::ThrowLeft | InteractionMode::ThrowRight if blocked => {
                CursorGlyph::NoTarget
            }
            InteractionMode::ThrowLeft | InteractionMode::ThrowRight => CursorGlyph::ThrowTarget,
            InteractionMode::TeleportLeft | InteractionMode::TeleportRight if blocked => {
                CursorGlyph::NoTeleport
            }
            InteractionMode::TeleportLeft | InteractionMode::TeleportRight => CursorGlyph::Teleport,
            InteractionMode::PsiControl
            | InteractionMode::PsiPanic
            | InteractionMode::PsiStun
            | InteractionMode::PsiProbe => CursorGlyph::PsiTarget,
        }
    }
}
