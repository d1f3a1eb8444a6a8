//! The test double: a substitute surface bound to one target for one session.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::call::{Call, CallRecord};
use crate::error::{DoubleError, Result};
use crate::rule::{Effect, RuleHandle, RuleSet, StubRule};
use crate::surface::Surface;
use crate::types::{BindingKey, DoubleId, DoubleMode};

/// A substitute object standing in for one target binding.
///
/// Holds zero or more stub rules; behavior for unmatched calls is governed
/// by the double's [`DoubleMode`]. Every intercepted call lands in the call
/// log regardless of mode or match outcome, so tests can verify behavior
/// after the fact.
pub struct Double {
    id: DoubleId,
    key: BindingKey,
    mode: DoubleMode,
    seq: u64,
    original: Option<Arc<dyn Surface>>,
    state: Mutex<DoubleState>,
}

struct DoubleState {
    rules: RuleSet,
    calls: Vec<CallRecord>,
}

impl Double {
    /// Creates a double for `key` with the given mode, creation sequence
    /// number, and fall-through target (required for `Partial` fall-through
    /// and `PassThrough` effects). For a standard double the target is the
    /// captured original; for a replacement double it is the caller-supplied
    /// surface.
    #[must_use]
    pub fn new(
        key: BindingKey,
        mode: DoubleMode,
        seq: u64,
        original: Option<Arc<dyn Surface>>,
    ) -> Self {
        Self {
            id: DoubleId::new(),
            key,
            mode,
            seq,
            original,
            state: Mutex::new(DoubleState {
                rules: RuleSet::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Returns the double's unique ID.
    #[must_use]
    pub const fn id(&self) -> DoubleId {
        self.id
    }

    /// Returns the binding key this double stands in for.
    #[must_use]
    pub const fn key(&self) -> &BindingKey {
        &self.key
    }

    /// Returns the double's mode.
    #[must_use]
    pub const fn mode(&self) -> DoubleMode {
        self.mode
    }

    /// Returns the creation sequence number used for teardown ordering.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.seq
    }

    /// Returns the fall-through target, if any: the captured original for a
    /// standard double, the supplied surface for a replacement double.
    #[must_use]
    pub fn original(&self) -> Option<&Arc<dyn Surface>> {
        self.original.as_ref()
    }

    /// Attaches a stub rule, returning a handle for later removal.
    ///
    /// Later rules shadow earlier rules for overlapping matchers.
    pub fn attach(&self, rule: StubRule) -> RuleHandle {
        tracing::debug!(key = %self.key, selector = rule.selector(), "attached rule");
        self.state.lock().rules.attach(rule)
    }

    /// Removes a previously attached rule. Returns false if already gone.
    pub fn detach(&self, handle: RuleHandle) -> bool {
        self.state.lock().rules.detach(handle)
    }

    /// Returns the number of attached rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.state.lock().rules.len()
    }

    /// Intercepts one call: records it, matches it against the attached
    /// rules (most recent first), and applies the matched effect, or the
    /// mode default when nothing matches.
    pub fn intercept(&self, mut call: Call) -> Result<Value> {
        let record = call.record();

        // Match phase under the lock; effect production happens after
        // release so pass-through into the original cannot re-enter it.
        let matched = {
            let mut state = self.state.lock();
            state.calls.push(record.clone());
            match state.rules.match_call(&call) {
                Some(handle) => {
                    state.rules.mark_exercised(handle);
                    state.rules.effect_of(handle)
                }
                None => None,
            }
        };

        tracing::debug!(
            key = %self.key,
            call = %record,
            matched = matched.is_some(),
            "intercepted call"
        );

        match matched {
            Some(Effect::Return(value)) => Ok(value),
            Some(Effect::InvokeCallback(args)) => {
                if let Some(mut completion) = call.take_completion() {
                    completion.invoke(&args);
                }
                Ok(Value::Null)
            }
            Some(Effect::PassThrough) => self.forward(call),
            None => match self.mode {
                DoubleMode::Nice => Ok(Value::Null),
                DoubleMode::Partial => self.forward(call),
                DoubleMode::Strict => Err(DoubleError::unstubbed_call(
                    self.key.clone(),
                    record.signature(),
                )),
            },
        }
    }

    fn forward(&self, call: Call) -> Result<Value> {
        let selector = call.selector().to_string();
        match &self.original {
            Some(original) => original.handle(call),
            None => Err(DoubleError::PassThroughWithoutOriginal {
                key: self.key.clone(),
                selector,
            }),
        }
    }

    /// Returns every call intercepted so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.lock().calls.clone()
    }

    /// Returns how many intercepted calls used the given selector.
    #[must_use]
    pub fn calls_to(&self, selector: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|record| record.selector == selector)
            .count()
    }

    /// Returns true if at least one intercepted call used the selector.
    #[must_use]
    pub fn was_called(&self, selector: &str) -> bool {
        self.calls_to(selector) > 0
    }

    /// Selectors of attached rules that never matched a call.
    #[must_use]
    pub fn unused_rules(&self) -> Vec<String> {
        self.state.lock().rules.unused()
    }
}

impl Surface for Double {
    fn name(&self) -> &str {
        self.key.as_str()
    }

    fn handle(&self, call: Call) -> Result<Value> {
        self.intercept(call)
    }
}

impl std::fmt::Debug for Double {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Double")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("mode", &self.mode)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
