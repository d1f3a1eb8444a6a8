//! Error types for understudy-core.
//!
//! All errors are explicit and propagate to the caller's failure-reporting
//! channel; none are logged-and-ignored.

use crate::types::BindingKey;

/// Result type alias for double lifecycle operations.
pub type Result<T> = std::result::Result<T, DoubleError>;

/// Comprehensive error type for double lifecycle operations.
///
/// A call that matches no stub rule is *not* an error; that is a normal,
/// mode-dependent branch handled by the double itself.
#[derive(Debug, thiserror::Error)]
pub enum DoubleError {
    /// A previous session was never closed. Teardown was skipped, so global
    /// state may already be corrupted; the run must abort rather than
    /// continue.
    #[error("session already open: a previous session was not closed")]
    SessionAlreadyOpen,

    /// A session operation was attempted while no session is open.
    #[error("no session is open")]
    SessionNotOpen,

    /// The same target was substituted twice, incompatibly, in one session.
    #[error("duplicate double for binding {key}")]
    DuplicateDouble {
        /// The binding that was already doubled.
        key: BindingKey,
    },

    /// Restore was attempted for a binding that was never captured.
    /// Always a framework bug, not a user error.
    #[error("restore without capture for binding {key}")]
    RestoreWithoutCapture {
        /// The binding missing a capture.
        key: BindingKey,
    },

    /// A second capture observed that the installed implementation changed
    /// identity since the first capture. Should never trigger in correct
    /// usage.
    #[error("implementation for binding {key} changed identity after capture")]
    AlreadyCapturedMismatch {
        /// The binding whose implementation changed underfoot.
        key: BindingKey,
    },

    /// No surface is installed for the requested binding key.
    #[error("no surface installed for binding {key}")]
    UnknownBinding {
        /// The unresolvable binding.
        key: BindingKey,
    },

    /// A pass-through effect fired on a double whose binding has no
    /// capturable original.
    #[error("pass-through for `{selector}` on binding {key} has no captured original")]
    PassThroughWithoutOriginal {
        /// The binding the double stands in for.
        key: BindingKey,
        /// The selector that tried to pass through.
        selector: String,
    },

    /// A strict-mode double intercepted a call no rule matches. This is the
    /// expected failure mode tests use to assert a call surface, reported as
    /// an ordinary assertion failure rather than a framework crash.
    #[error("unstubbed call {signature} on strict double for binding {key}")]
    UnstubbedCall {
        /// The binding the double stands in for.
        key: BindingKey,
        /// Rendered signature of the offending call.
        signature: String,
    },

    /// One or more bindings could not be restored at session end. A leaked
    /// substitute is the exact defect this framework exists to prevent, so
    /// this must propagate even when the test body failed independently.
    #[error("teardown failed: {} binding(s) could not be restored", failures.len())]
    TeardownFailure {
        /// Every restoration failure collected during teardown.
        failures: Vec<DoubleError>,
    },

    /// Internal error (should not occur in production).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DoubleError {
    /// Creates a duplicate-double error.
    #[must_use]
    pub fn duplicate_double(key: BindingKey) -> Self {
        Self::DuplicateDouble { key }
    }

    /// Creates a restore-without-capture error.
    #[must_use]
    pub fn restore_without_capture(key: BindingKey) -> Self {
        Self::RestoreWithoutCapture { key }
    }

    /// Creates a capture-mismatch error.
    #[must_use]
    pub fn capture_mismatch(key: BindingKey) -> Self {
        Self::AlreadyCapturedMismatch { key }
    }

    /// Creates an unknown-binding error.
    #[must_use]
    pub fn unknown_binding(key: BindingKey) -> Self {
        Self::UnknownBinding { key }
    }

    /// Creates an unstubbed-call error.
    #[must_use]
    pub fn unstubbed_call(key: BindingKey, signature: impl Into<String>) -> Self {
        Self::UnstubbedCall {
            key,
            signature: signature.into(),
        }
    }

    /// Creates an aggregated teardown failure.
    #[must_use]
    pub fn teardown_failure(failures: Vec<DoubleError>) -> Self {
        Self::TeardownFailure { failures }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this error means global state may be corrupted and
    /// the remaining test run should abort.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SessionAlreadyOpen
                | Self::RestoreWithoutCapture { .. }
                | Self::AlreadyCapturedMismatch { .. }
                | Self::TeardownFailure { .. }
                | Self::Internal(_)
        )
    }

    /// Returns true if this error is an expected, test-visible failure mode
    /// rather than a framework defect.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::UnstubbedCall { .. })
    }
}
