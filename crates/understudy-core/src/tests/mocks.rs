//! Recording surfaces for scenario tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::call::{Call, CallRecord};
use crate::error::Result;
use crate::surface::Surface;

/// A configurable "real" surface that records every call it handles.
///
/// Stands in for an SDK singleton implementation: canned responses per
/// selector, null for everything else, and a call log tests can inspect to
/// prove (or disprove) that calls reached the real implementation.
pub struct RecordingSurface {
    name: String,
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<CallRecord>>,
}

impl RecordingSurface {
    /// Creates a recording surface with no canned responses.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Cans a response for one selector.
    #[must_use]
    pub fn with_response(mut self, selector: impl Into<String>, value: Value) -> Self {
        self.responses.insert(selector.into(), value);
        self
    }

    /// Returns every call handled so far.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().clone()
    }

    /// Returns how many handled calls used the selector.
    pub fn calls_to(&self, selector: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|record| record.selector == selector)
            .count()
    }
}

impl Surface for RecordingSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, call: Call) -> Result<Value> {
        self.calls.lock().push(call.record());
        Ok(self
            .responses
            .get(call.selector())
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// Shared log of teardown-time restore observations, written by
/// [`ObservedSurface`] handlers and read by order-sensitive tests.
pub type RestoreLog = Arc<Mutex<Vec<String>>>;

/// A surface whose handled calls append to a shared log, used to observe
/// which implementation (real vs. double) is live at any point.
pub struct ObservedSurface {
    name: String,
    log: RestoreLog,
}

impl ObservedSurface {
    /// Creates an observed surface appending to `log`.
    #[must_use]
    pub fn new(name: impl Into<String>, log: RestoreLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

impl Surface for ObservedSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, call: Call) -> Result<Value> {
        self.log
            .lock()
            .push(format!("{}:{}", self.name, call.selector()));
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_surface_cans_and_records() {
        let surface = RecordingSurface::new("settings")
            .with_response("app_id", json!("a1"));

        assert_eq!(surface.handle(Call::new("app_id")).unwrap(), json!("a1"));
        assert_eq!(surface.handle(Call::new("other")).unwrap(), Value::Null);
        assert_eq!(surface.calls().len(), 2);
        assert_eq!(surface.calls_to("app_id"), 1);
    }

    #[test]
    fn test_observed_surface_appends() {
        let log: RestoreLog = Arc::new(Mutex::new(Vec::new()));
        let surface = ObservedSurface::new("real", log.clone());
        surface.handle(Call::new("ping")).unwrap();
        assert_eq!(*log.lock(), vec!["real:ping".to_string()]);
    }
}
