//! Common error infrastructure for arena-core.
//!
//! Domain errors live next to the code that raises them
//! (`CompileError` in [`crate::stats`], `ActionStateError` in [`crate::combat`],
//! effect diagnostics in [`crate::effects`]). This module only provides the shared
//! classification used by all of them.
//!
//! # Categories
//!
//! - **Missing definitions** are fatal to the call that needs them and surface to the caller.
//! - **Malformed effect specs** are recovered at content-load time and reported as diagnostics.
//! - **Invalid action states** are recovered inside the round loop by falling back to a basic attack.
//!
//! Nothing in the engine is retried: it is a deterministic simulation, not an I/O path.

/// How an engine error is handled.
///
/// - **Recoverable**: the engine substitutes a fallback and continues
/// - **Validation**: authored input is wrong; skip it and report
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: the requested operation cannot produce a result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - a fallback is applied in place.
    ///
    /// Examples: skill on cooldown, skill locked behind a level gate
    Recoverable,

    /// Validation error - invalid authored input, skipped without retry.
    ///
    /// Examples: unknown effect key, negative duration
    Validation,

    /// An invariant of the engine itself was broken.
    Internal,

    /// Fatal error - the call cannot complete.
    ///
    /// Examples: missing race definition
    Fatal,
}

impl ErrorSeverity {
    /// Lowercase label used in logs and reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// The caller can carry on after substituting or skipping.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    /// Something other than the authored input went wrong.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Classification shared by the engine's `thiserror` enums and the content
/// crate's diagnostics. Severity follows what the caller can do next.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable code for the variant, e.g. `COMPILE_MISSING_DEFINITION`.
    ///
    /// Falls back to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
