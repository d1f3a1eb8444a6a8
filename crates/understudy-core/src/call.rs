//! Intercepted-call representation.
//!
//! A [`Call`] is one invocation crossing a substitutable surface: a method
//! selector, its arguments as JSON values, and optionally the completion
//! callback the code under test supplied. [`CallRecord`] is the pure data
//! view kept in call logs; matching operates on it only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Completion callback supplied by code under test for methods that report
/// their result asynchronously in the real implementation. The framework
/// always invokes it synchronously within the intercepted call so a test
/// never has to wait for a scheduler.
pub struct Completion(Box<dyn FnMut(&[Value]) + Send>);

impl Completion {
    /// Wraps a completion closure.
    #[must_use]
    pub fn new(f: impl FnMut(&[Value]) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Invokes the completion with the given arguments.
    pub fn invoke(&mut self, args: &[Value]) {
        (self.0)(args);
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Completion")
    }
}

/// One intercepted invocation of a method on a substitutable surface.
#[derive(Debug)]
pub struct Call {
    selector: String,
    args: Vec<Value>,
    completion: Option<Completion>,
}

impl Call {
    /// Creates a call with no arguments.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            args: Vec::new(),
            completion: None,
        }
    }

    /// Sets the call arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Attaches a completion callback.
    #[must_use]
    pub fn with_completion(mut self, f: impl FnMut(&[Value]) + Send + 'static) -> Self {
        self.completion = Some(Completion::new(f));
        self
    }

    /// Returns the method selector.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the call arguments.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Returns true if the call carries a completion callback.
    #[must_use]
    pub const fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Takes the completion callback out of the call, if any.
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }

    /// Renders the call as `selector(arg, arg, ...)` for diagnostics.
    #[must_use]
    pub fn signature(&self) -> String {
        self.record().signature()
    }

    /// Returns the pure data view of this call.
    #[must_use]
    pub fn record(&self) -> CallRecord {
        CallRecord {
            selector: self.selector.clone(),
            args: self.args.clone(),
        }
    }
}

/// Pure data view of an intercepted call, kept in per-double call logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// The method selector.
    pub selector: String,
    /// The call arguments.
    pub args: Vec<Value>,
}

impl CallRecord {
    /// Renders the record as `selector(arg, arg, ...)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        format!("{}({})", self.selector, args.join(", "))
    }
}

impl std::fmt::Display for CallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_signature() {
        let call = Call::new("is_enabled");
        assert_eq!(call.signature(), "is_enabled()");

        let call = Call::new("set_flag").with_args(vec![json!("limit"), json!(3)]);
        assert_eq!(call.signature(), "set_flag(\"limit\", 3)");
    }

    #[test]
    fn test_call_record_roundtrip() {
        let call = Call::new("fetch").with_args(vec![json!({"id": 7})]);
        let record = call.record();
        assert_eq!(record.selector, "fetch");
        assert_eq!(record.args, vec![json!({"id": 7})]);
        assert_eq!(record.to_string(), call.signature());
    }

    #[test]
    fn test_completion_invoked_synchronously() {
        let cell = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = cell.clone();
        let mut call = Call::new("load").with_completion(move |args| {
            sink.lock().extend(args.to_vec());
        });
        assert!(call.has_completion());

        let mut taken = call.take_completion().expect("completion present");
        taken.invoke(&[json!("ok"), Value::Null]);
        assert_eq!(*cell.lock(), vec![json!("ok"), Value::Null]);
        assert!(!call.has_completion());
    }
}
