//! Common error infrastructure for chimera-core.
//!
//! Domain errors (`CreationError`, `LifecycleError`) live next to the operations
//! they validate. Each one implements [`GameError`] so that outer layers can
//! classify failures without matching on every variant.

/// Broad category of a rule violation.
///
/// Services map these onto their own error surfaces; a `NotFound` from the
/// core never depends on storage, it only means a referenced player, hybrid
/// or entity is absent from the aggregate being inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A referenced record does not exist.
    NotFound,

    /// The request is well-formed but the game is not in a state that allows it.
    ///
    /// Examples: actions already locked, hybrids already created
    StateConflict,

    /// Invalid input that should not be retried without changes.
    ///
    /// Examples: wrong entity count, entity reused across hybrids
    Validation,

    /// A collaborator (storage, generation) failed.
    Infrastructure,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::StateConflict => "state_conflict",
            Self::Validation => "validation",
            Self::Infrastructure => "infrastructure",
        }
    }

    /// Returns true when the caller may succeed by retrying unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure)
    }
}

/// Common trait for all chimera errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn kind(&self) -> ErrorKind;

    /// Stable machine-readable code, e.g. `"CREATION_ENTITY_REUSED"`.
    fn error_code(&self) -> &'static str;
}
