//! Common error infrastructure for battle-core.
//!
//! Errors crossing the simulation boundary are recoverable by construction: the
//! interaction layer runs inside a per-frame loop and degrades to a no-op rather
//! than failing. The severity classification tells callers how loudly to log.

/// Severity level of an error, used for categorization and logging priority.
///
/// - **Recoverable**: the order was infeasible right now (no TU, blocked tile)
/// - **Validation**: the request itself was malformed or targeted nothing
/// - **Internal**: an expected unit, item or tile was missing
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Order preconditions unmet; retrying later may succeed.
    ///
    /// Examples: insufficient time units, no line of fire
    Recoverable,

    /// Invalid request; should not be retried unchanged.
    ///
    /// Examples: unknown control, unit not owned by the player
    Validation,

    /// Unexpected inconsistency between view and simulation.
    ///
    /// Examples: empty path result, no solid ground below a column
    Internal,

    /// Simulation state is unusable.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle errors.
///
/// Implementors derive `thiserror::Error` for `Display` and classify each
/// variant by recoverability, not by impact.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_and_fatal_count_as_bugs() {
        assert!(!ErrorSeverity::Recoverable.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
