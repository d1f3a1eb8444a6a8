//! The capability interface every substitutable singleton satisfies.
//!
//! The real implementation and the test double both implement [`Surface`];
//! the binding table holds whichever is currently active and resolution goes
//! through ordinary trait-object dispatch. No dispatch tables are patched.

use serde_json::Value;

use crate::call::Call;
use crate::error::Result;

/// A substitutable singleton surface.
///
/// An SDK exposes one `Surface` per substitutable entry point (settings
/// accessor, event logger, request dispatcher, ...). The framework never
/// modifies a collaborator's internal logic; this dispatch seam is the one
/// hook it requires.
pub trait Surface: Send + Sync {
    /// Human-readable name of the surface, used in diagnostics.
    fn name(&self) -> &str;

    /// Handles one call on the surface.
    ///
    /// # Errors
    /// Implementation-defined; doubles surface mode-contract violations here.
    fn handle(&self, call: Call) -> Result<Value>;
}

/// A surface that answers every call with the same fixed value.
///
/// Useful as a stand-in real implementation in collaborator setup code and
/// tests; production SDK surfaces implement [`Surface`] directly.
#[derive(Debug, Clone)]
pub struct FixedSurface {
    name: String,
    value: Value,
}

impl FixedSurface {
    /// Creates a surface answering every call with `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a surface answering every call with null.
    #[must_use]
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }
}

impl Surface for FixedSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, _call: Call) -> Result<Value> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_surface() {
        let surface = FixedSurface::new("settings", json!({"app_id": "a1"}));
        assert_eq!(surface.name(), "settings");
        let out = surface.handle(Call::new("anything")).expect("fixed value");
        assert_eq!(out, json!({"app_id": "a1"}));
    }

    #[test]
    fn test_null_surface() {
        let surface = FixedSurface::null("noop");
        let out = surface.handle(Call::new("anything")).expect("null");
        assert_eq!(out, Value::Null);
    }
}
