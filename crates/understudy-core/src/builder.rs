//! Fluent stub configuration.
//!
//! Every convenience helper in the wider workspace is sugar over this one
//! mechanism: obtain-or-create a double for a target, attach one rule per
//! intercepted method.

use std::sync::Arc;

use serde_json::Value;

use crate::double::Double;
use crate::error::Result;
use crate::rule::{ArgMatcher, Effect, StubRule};
use crate::session::SessionController;
use crate::types::{BindingKey, DoubleMode};

/// Fluent builder for stubbing one target binding.
///
/// Obtained from [`SessionController::stub`]. The double itself is created
/// lazily by the first terminal operation, so the mode can be set anywhere
/// before it.
pub struct StubBuilder<'a> {
    controller: &'a SessionController,
    key: BindingKey,
    mode: DoubleMode,
}

impl<'a> StubBuilder<'a> {
    pub(crate) fn new(controller: &'a SessionController, key: BindingKey) -> Self {
        Self {
            controller,
            key,
            mode: DoubleMode::default(),
        }
    }

    /// Sets the double's mode.
    pub fn mode(mut self, mode: DoubleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(DoubleMode::Nice)`.
    pub fn nice(self) -> Self {
        self.mode(DoubleMode::Nice)
    }

    /// Shorthand for `mode(DoubleMode::Partial)`.
    pub fn partial(self) -> Self {
        self.mode(DoubleMode::Partial)
    }

    /// Shorthand for `mode(DoubleMode::Strict)`.
    pub fn strict(self) -> Self {
        self.mode(DoubleMode::Strict)
    }

    /// Starts configuring a rule for one method selector.
    pub fn on(self, selector: impl Into<String>) -> MethodStub<'a> {
        MethodStub {
            owner: self,
            selector: selector.into(),
            matcher: ArgMatcher::Any,
        }
    }

    /// Obtains-or-creates the underlying double, e.g. for verification
    /// calls after the code under test ran.
    pub fn double(&self) -> Result<Arc<Double>> {
        self.controller.double(self.key.clone(), self.mode)
    }
}

/// Builder for one stub rule on one method.
#[must_use]
pub struct MethodStub<'a> {
    owner: StubBuilder<'a>,
    selector: String,
    matcher: ArgMatcher,
}

impl<'a> MethodStub<'a> {
    /// Matches only calls with exactly these argument values.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.matcher = ArgMatcher::Exact(args);
        self
    }

    /// Matches calls whose arguments satisfy the predicate.
    pub fn matching(mut self, f: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        self.matcher = ArgMatcher::predicate(f);
        self
    }

    /// Attaches a rule returning `value`, yielding the builder for further
    /// chaining.
    pub fn returns(self, value: Value) -> Result<StubBuilder<'a>> {
        self.attach(Effect::Return(value))
    }

    /// Attaches a rule invoking the call's completion with canned
    /// arguments.
    pub fn invokes_callback(self, args: Vec<Value>) -> Result<StubBuilder<'a>> {
        self.attach(Effect::InvokeCallback(args))
    }

    /// Attaches a pass-through rule (spy on the original rather than
    /// replace it).
    pub fn passes_through(self) -> Result<StubBuilder<'a>> {
        self.attach(Effect::PassThrough)
    }

    fn attach(self, effect: Effect) -> Result<StubBuilder<'a>> {
        let double = self.owner.double()?;
        double.attach(StubRule::new(self.selector, self.matcher, effect));
        Ok(self.owner)
    }
}
