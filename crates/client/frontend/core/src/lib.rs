//! Tactical battle view: player input, interaction modes and widget overlays.
//!
//! Houses the interaction state machine, order dispatch, preview throttling,
//! turn synchronisation and overlay compositing. Everything runs on the frame
//! loop of the host; the simulation is reached only through the
//! [`battle_core::Simulation`] traits.
pub mod camera;
pub mod click;
pub mod config;
pub mod controls;
pub mod error;
pub mod input;
pub mod message;
pub mod mode;
pub mod orders;
pub mod overlay;
pub mod posture;
pub mod preview;
pub mod priming;
pub mod selection;
pub mod turn;
pub mod view;

pub use camera::{Camera, LayerDrawing, SpeedControl, UpdateSpeed};
pub use click::{ClickAction, ClickContext, ClickTargets, resolve_click};
pub use config::{DelayConfig, MessageConfig, PreviewConfig, TurnConfig, ViewConfig};
pub use controls::{ControlEvent, ControlId, ControlTable, ViewCommand};
pub use error::{PreviewError, ViewError};
pub use input::{GameNotice, ModifierKeys, ViewEvent};
pub use message::{MessageEntry, MessageLog};
pub use mode::{CursorGlyph, InteractionMode, InteractionState, ModeEvent, ModeIntent, Transition};
pub use orders::{OrderOutcome, Orders};
pub use overlay::OverlayCompositor;
pub use posture::{PostureCommand, SoldierButtons, ThrowButtons, TriState};
pub use preview::{AttackCost, PathCost, PreviewCache};
pub use priming::PrimingPanel;
pub use selection::{MAX_SELECTION, SelectFlags, SelectionSet};
pub use turn::{Cutaway, TurnPhase, TurnSignal, TurnSynchronizer};
pub use view::{ActivePanel, BattleFrame, BattleView, RenderPlan, ViewIntent};
