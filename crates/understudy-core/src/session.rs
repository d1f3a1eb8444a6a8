//! Session lifecycle controller: scoped acquisition with guaranteed release.
//!
//! A session is the scope of one test's substitutions. The controller is a
//! `Closed -> Open -> Closed` state machine; `end` is the single explicit
//! release point, invoked by the runner's guaranteed-cleanup hook and
//! independent of any object's lifetime.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::binding::BindingTable;
use crate::builder::StubBuilder;
use crate::double::Double;
use crate::error::{DoubleError, Result};
use crate::registry::DoubleRegistry;
use crate::surface::Surface;
use crate::types::{BindingKey, DoubleMode};

/// Record of one completed teardown: the keys restored, in restore order
/// (reverse creation order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    restored: Vec<BindingKey>,
}

impl TeardownReport {
    /// Keys restored during teardown, in restore order.
    #[must_use]
    pub fn restored(&self) -> &[BindingKey] {
        &self.restored
    }

    /// Returns true if the teardown restored nothing (empty or already
    /// closed session).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty()
    }
}

enum SessionState {
    Closed,
    Open(Arc<DoubleRegistry>),
}

/// Owns the begin/end of a test's substitution scope.
///
/// Sessions are strictly serialized: one controller, one open session, one
/// test at a time. A parallel test runner needs one binding-table/controller
/// pair per worker; they must never be shared.
pub struct SessionController {
    bindings: Arc<BindingTable>,
    session: Mutex<SessionState>,
}

impl SessionController {
    /// Creates a controller over the given binding table.
    #[must_use]
    pub fn new(bindings: Arc<BindingTable>) -> Self {
        Self {
            bindings,
            session: Mutex::new(SessionState::Closed),
        }
    }

    /// Returns the binding table this controller tears down into.
    #[must_use]
    pub fn bindings(&self) -> &Arc<BindingTable> {
        &self.bindings
    }

    /// Returns true if a session is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(&*self.session.lock(), SessionState::Open(_))
    }

    /// Opens a fresh session with an empty registry.
    ///
    /// Fails with [`DoubleError::SessionAlreadyOpen`] if a prior session was
    /// never closed, the primary defect class this framework exists to
    /// prevent. That error is fatal to the remaining run.
    pub fn begin(&self) -> Result<()> {
        let mut session = self.session.lock();
        if matches!(&*session, SessionState::Open(_)) {
            return Err(DoubleError::SessionAlreadyOpen);
        }
        *session = SessionState::Open(Arc::new(DoubleRegistry::new(self.bindings.clone())));
        tracing::info!("session opened");
        Ok(())
    }

    /// Returns the open session's registry.
    pub fn registry(&self) -> Result<Arc<DoubleRegistry>> {
        match &*self.session.lock() {
            SessionState::Open(registry) => Ok(registry.clone()),
            SessionState::Closed => Err(DoubleError::SessionNotOpen),
        }
    }

    /// Obtains-or-creates the double for `key` in the open session.
    pub fn double(&self, key: impl Into<BindingKey>, mode: DoubleMode) -> Result<Arc<Double>> {
        self.registry()?.get_or_create(key, mode)
    }

    /// Replaces `key` with a caller-supplied surface for the open session.
    ///
    /// The replacement is session-tracked: the true original is captured
    /// first and `end()` restores it like any other double's binding.
    pub fn replace(
        &self,
        key: impl Into<BindingKey>,
        surface: Arc<dyn Surface>,
    ) -> Result<Arc<Double>> {
        self.registry()?.replace_with(key, surface)
    }

    /// Starts a fluent stub configuration for `key`.
    #[must_use]
    pub fn stub(&self, key: impl Into<BindingKey>) -> StubBuilder<'_> {
        StubBuilder::new(self, key.into())
    }

    /// Closes the session: restores every double's target binding in
    /// reverse creation order, collecting failures rather than stopping at
    /// the first, and leaves the registry empty.
    ///
    /// Idempotent: a second call observes a closed session and returns an
    /// empty report. If any restoration failed, the failures are aggregated
    /// into a single [`DoubleError::TeardownFailure`]; a leaked substitute
    /// on a process-wide global is fatal, so that error propagates even
    /// when the test body failed independently.
    pub fn end(&self) -> Result<TeardownReport> {
        let registry = {
            let mut session = self.session.lock();
            match std::mem::replace(&mut *session, SessionState::Closed) {
                SessionState::Closed => return Ok(TeardownReport::default()),
                SessionState::Open(registry) => registry,
            }
        };

        let doubles = registry.drain();
        let mut restored = Vec::with_capacity(doubles.len());
        let mut failures = Vec::new();

        for double in doubles.iter().rev() {
            match self.bindings.restore(double.key()) {
                Ok(()) => restored.push(double.key().clone()),
                Err(err) => {
                    tracing::warn!(key = %double.key(), error = %err, "restore failed during teardown");
                    failures.push(err);
                }
            }
        }

        if failures.is_empty() {
            tracing::info!(restored = restored.len(), "session closed");
            Ok(TeardownReport { restored })
        } else {
            Err(DoubleError::teardown_failure(failures))
        }
    }

    /// Runs `f` inside a session with guaranteed teardown.
    ///
    /// Begins a session, runs `f`, and always ends the session, including
    /// when `f` panics, in which case teardown runs first and the panic
    /// resumes afterwards (a teardown failure on that path is logged at
    /// error level before the resume, since only one failure can
    /// propagate).
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> Result<T> {
        self.begin()?;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
        let teardown = self.end();
        match outcome {
            Ok(value) => {
                teardown?;
                Ok(value)
            }
            Err(panic) => {
                if let Err(err) = teardown {
                    tracing::error!(error = %err, "teardown failed after panicking test body");
                }
                std::panic::resume_unwind(panic)
            }
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
