//! Errors raised inside the interaction layer.
//!
//! None of these escape the per-frame loop: the view logs them and carries on
//! with the previous state.

use battle_core::{BattleError, ErrorSeverity, Hand, TilePos, UnitId};
use tracing::Level;

/// Failures while computing a path or attack preview.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("solid ground missing below {0}")]
    NoGround(TilePos),

    #[error("empty path returned for {unit} towards {target}")]
    EmptyPath { unit: UnitId, target: TilePos },

    #[error("unit {0} vanished from the simulation")]
    NoUnit(UnitId),
}

impl BattleError for PreviewError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoGround(_) => "PREVIEW_NO_GROUND",
            Self::EmptyPath { .. } => "PREVIEW_EMPTY_PATH",
            Self::NoUnit(_) => "PREVIEW_NO_UNIT",
        }
    }
}

/// Input the view could not interpret.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("no command bound to {control} on {event}")]
    UnhandledControl {
        control: &'static str,
        event: &'static str,
    },

    #[error("unknown control name: {0}")]
    UnknownControl(String),

    #[error("in-use item in {0} hand has no panel")]
    NoPanelForItem(Hand),
}

impl BattleError for ViewError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnhandledControl { .. } | Self::UnknownControl(_) => ErrorSeverity::Validation,
            Self::NoPanelForItem(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnhandledControl { .. } => "VIEW_UNHANDLED_CONTROL",
            Self::UnknownControl(_) => "VIEW_UNKNOWN_CONTROL",
            Self::NoPanelForItem(_) => "VIEW_NO_PANEL_FOR_ITEM",
        }
    }
}

/// Tracing level for a rejected order or failed lookup.
///
/// Infeasible orders are routine; malformed requests earn a warning and
/// view/simulation inconsistencies an error.
pub fn log_level(err: &impl BattleError) -> Level {
    match err.severity() {
        ErrorSeverity::Recoverable => Level::DEBUG,
        ErrorSeverity::Validation => Level::WARN,
        ErrorSeverity::Internal | ErrorSeverity::Fatal => Level::ERROR,
    }
}
