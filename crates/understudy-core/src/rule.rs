//! Stub rules: declarative matcher-to-effect mappings.
//!
//! Matching is pure and side-effect-free; producing an effect is a separate
//! step performed by the double, so diagnostics can distinguish "matched"
//! from "executed". Rules attached later shadow earlier rules for
//! overlapping matchers; re-stubbing attaches a fresh rule rather than
//! mutating the old one, preserving auditability.

use std::sync::Arc;

use serde_json::Value;

use crate::call::Call;

/// Argument matcher for one stub rule.
#[derive(Clone)]
pub enum ArgMatcher {
    /// Accepts any arguments.
    Any,
    /// Accepts exactly these argument values.
    Exact(Vec<Value>),
    /// Accepts arguments satisfying a predicate.
    Predicate(Arc<dyn Fn(&[Value]) -> bool + Send + Sync>),
}

impl ArgMatcher {
    /// Creates a predicate matcher.
    #[must_use]
    pub fn predicate(f: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Returns true if the matcher accepts the given arguments. Pure.
    #[must_use]
    pub fn accepts(&self, args: &[Value]) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected.as_slice() == args,
            Self::Predicate(pred) => pred(args),
        }
    }
}

impl std::fmt::Debug for ArgMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Exact(args) => f.debug_tuple("Exact").field(args).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Effect produced when a rule matches.
#[derive(Debug, Clone)]
pub enum Effect {
    /// The intercepted call returns this value synchronously.
    Return(Value),
    /// The call's supplied completion is invoked synchronously with these
    /// canned arguments; the call itself returns null. A call without a
    /// completion drops the canned arguments.
    InvokeCallback(Vec<Value>),
    /// The call delegates to the captured original implementation. Only
    /// legal on a double whose binding has a capturable original.
    PassThrough,
}

/// One intercepted-call description: selector, matcher, effect.
///
/// Immutable once attached to a double.
#[derive(Debug, Clone)]
pub struct StubRule {
    selector: String,
    matcher: ArgMatcher,
    effect: Effect,
}

impl StubRule {
    /// Creates a rule from its parts.
    #[must_use]
    pub fn new(selector: impl Into<String>, matcher: ArgMatcher, effect: Effect) -> Self {
        Self {
            selector: selector.into(),
            matcher,
            effect,
        }
    }

    /// Creates an any-arguments rule returning a fixed value.
    #[must_use]
    pub fn returning(selector: impl Into<String>, value: Value) -> Self {
        Self::new(selector, ArgMatcher::Any, Effect::Return(value))
    }

    /// Creates an any-arguments rule invoking the call's completion with
    /// canned arguments.
    #[must_use]
    pub fn invoking(selector: impl Into<String>, args: Vec<Value>) -> Self {
        Self::new(selector, ArgMatcher::Any, Effect::InvokeCallback(args))
    }

    /// Creates an any-arguments pass-through rule (spying, not replacing).
    #[must_use]
    pub fn pass_through(selector: impl Into<String>) -> Self {
        Self::new(selector, ArgMatcher::Any, Effect::PassThrough)
    }

    /// Replaces the rule's matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: ArgMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Returns the method selector this rule intercepts.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the rule's effect.
    #[must_use]
    pub const fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Returns true if this rule accepts the call. Pure.
    #[must_use]
    pub fn matches(&self, call: &Call) -> bool {
        self.selector == call.selector() && self.matcher.accepts(call.args())
    }
}

/// Handle to an attached rule, allowing later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleHandle(u64);

struct RuleEntry {
    handle: RuleHandle,
    rule: StubRule,
    exercised: bool,
}

/// Ordered collection of stub rules with last-registration-wins matching.
#[derive(Default)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
    next: u64,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, returning a handle for later removal.
    pub fn attach(&mut self, rule: StubRule) -> RuleHandle {
        let handle = RuleHandle(self.next);
        self.next += 1;
        self.entries.push(RuleEntry {
            handle,
            rule,
            exercised: false,
        });
        handle
    }

    /// Removes the rule behind `handle`. Returns false if already gone.
    pub fn detach(&mut self, handle: RuleHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Finds the most recently attached rule accepting the call.
    ///
    /// Pure: no usage flags change until
    /// [`mark_exercised`](Self::mark_exercised).
    #[must_use]
    pub fn match_call(&self, call: &Call) -> Option<RuleHandle> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.rule.matches(call))
            .map(|entry| entry.handle)
    }

    /// Returns the rule behind `handle`.
    #[must_use]
    pub fn rule(&self, handle: RuleHandle) -> Option<&StubRule> {
        self.entries
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| &entry.rule)
    }

    /// Returns a clone of the effect behind `handle`.
    #[must_use]
    pub fn effect_of(&self, handle: RuleHandle) -> Option<Effect> {
        self.rule(handle).map(|rule| rule.effect().clone())
    }

    /// Flags the rule behind `handle` as exercised.
    pub fn mark_exercised(&mut self, handle: RuleHandle) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.handle == handle) {
            entry.exercised = true;
        }
    }

    /// Selectors of rules that never matched a call. Strict-mode "unused
    /// stub" diagnostics.
    #[must_use]
    pub fn unused(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.exercised)
            .map(|entry| entry.rule.selector().to_string())
            .collect()
    }

    /// Returns the number of attached rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rules are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
