//! The double registry: binding key to active double, one session's worth.
//!
//! The registry is where every other component asks "is this target already
//! substituted". It enforces at-most-one-active-double-per-target and keeps
//! creation order so the lifecycle controller can tear down in reverse.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::binding::BindingTable;
use crate::double::Double;
use crate::error::{DoubleError, Result};
use crate::surface::Surface;
use crate::types::{BindingKey, DoubleMode};

/// Mapping from binding key to the active double for one session.
pub struct DoubleRegistry {
    bindings: Arc<BindingTable>,
    entries: Mutex<Vec<Arc<Double>>>,
}

impl DoubleRegistry {
    /// Creates an empty registry over the given binding table.
    #[must_use]
    pub fn new(bindings: Arc<BindingTable>) -> Self {
        Self {
            bindings,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Returns the existing double for `key` when its mode matches, or
    /// creates one: captures the target's original, substitutes the new
    /// double in, and records it.
    ///
    /// A second creation attempt with a different mode for the same key is
    /// the signal that test setup is internally inconsistent and fails with
    /// [`DoubleError::DuplicateDouble`].
    pub fn get_or_create(
        &self,
        key: impl Into<BindingKey>,
        mode: DoubleMode,
    ) -> Result<Arc<Double>> {
        let key = key.into();
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.iter().find(|double| double.key() == &key) {
            if existing.mode() == mode {
                return Ok(existing.clone());
            }
            return Err(DoubleError::duplicate_double(key));
        }

        let original = self.bindings.capture(&key)?;
        let seq = entries.len() as u64;
        let double = Arc::new(Double::new(key.clone(), mode, seq, Some(original)));
        self.bindings.substitute(&key, double.clone())?;
        entries.push(double.clone());

        tracing::info!(key = %key, mode = ?mode, seq = seq, "registered double");
        Ok(double)
    }

    /// Substitutes `key` with a caller-supplied replacement surface for the
    /// rest of the session.
    ///
    /// For replacing a singleton with a whole test object rather than
    /// stubbing individual methods. The replacement is tracked like any
    /// double: the true original is captured first and teardown restores
    /// it. Under the hood this is a partial double whose fall-through
    /// target is the replacement, so stub rules can still be layered on
    /// top. A prior double or replacement for `key` fails with
    /// [`DoubleError::DuplicateDouble`].
    pub fn replace_with(
        &self,
        key: impl Into<BindingKey>,
        surface: Arc<dyn Surface>,
    ) -> Result<Arc<Double>> {
        let key = key.into();
        let mut entries = self.entries.lock();

        if entries.iter().any(|double| double.key() == &key) {
            return Err(DoubleError::duplicate_double(key));
        }

        self.bindings.capture(&key)?;
        let seq = entries.len() as u64;
        let double = Arc::new(Double::new(
            key.clone(),
            DoubleMode::Partial,
            seq,
            Some(surface),
        ));
        self.bindings.substitute(&key, double.clone())?;
        entries.push(double.clone());

        tracing::info!(key = %key, seq = seq, "registered replacement surface");
        Ok(double)
    }

    /// Returns the active double for `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &BindingKey) -> Option<Arc<Double>> {
        self.entries
            .lock()
            .iter()
            .find(|double| double.key() == key)
            .cloned()
    }

    /// Returns true if `key` is substituted in this session.
    #[must_use]
    pub fn is_substituted(&self, key: &BindingKey) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns every active double in creation order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<Double>> {
        self.entries.lock().clone()
    }

    /// Takes every active double out of the registry in creation order,
    /// leaving it empty. Used by the lifecycle controller for teardown.
    pub fn drain(&self) -> Vec<Arc<Double>> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Returns the number of active doubles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no doubles are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for DoubleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Call;
    use crate::surface::FixedSurface;
    use serde_json::json;

    fn registry_with(keys: &[&str]) -> DoubleRegistry {
        let table = Arc::new(BindingTable::new());
        for key in keys {
            table.install(*key, Arc::new(FixedSurface::new(*key, json!("real"))));
        }
        DoubleRegistry::new(table)
    }

    #[test]
    fn test_get_or_create_substitutes_binding() {
        let registry = registry_with(&["sdk.Settings"]);
        let key = BindingKey::new("sdk.Settings");

        let double = registry.get_or_create("sdk.Settings", DoubleMode::Nice).unwrap();
        assert_eq!(double.key(), &key);
        assert!(registry.is_substituted(&key));

        // Resolution through the table now lands on the double.
        let resolved = registry.bindings.resolve(&key).unwrap();
        assert_eq!(
            resolved.handle(Call::new("anything")).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_get_or_create_is_idempotent_for_same_mode() {
        let registry = registry_with(&["sdk.Settings"]);

        let first = registry.get_or_create("sdk.Settings", DoubleMode::Nice).unwrap();
        let second = registry.get_or_create("sdk.Settings", DoubleMode::Nice).unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mode_conflict_is_duplicate_double() {
        let registry = registry_with(&["sdk.Settings"]);

        registry.get_or_create("sdk.Settings", DoubleMode::Nice).unwrap();
        let err = registry
            .get_or_create("sdk.Settings", DoubleMode::Strict)
            .unwrap_err();
        assert!(matches!(err, DoubleError::DuplicateDouble { .. }));
    }

    #[test]
    fn test_unknown_binding_rejected() {
        let registry = registry_with(&[]);
        let err = registry
            .get_or_create("sdk.Missing", DoubleMode::Nice)
            .unwrap_err();
        assert!(matches!(err, DoubleError::UnknownBinding { .. }));
    }

    #[test]
    fn test_all_preserves_creation_order() {
        let registry = registry_with(&["a", "b", "c"]);

        registry.get_or_create("b", DoubleMode::Nice).unwrap();
        registry.get_or_create("a", DoubleMode::Nice).unwrap();
        registry.get_or_create("c", DoubleMode::Nice).unwrap();

        let keys: Vec<String> = registry
            .all()
            .iter()
            .map(|double| double.key().to_string())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);

        let seqs: Vec<u64> = registry.all().iter().map(|d| d.sequence()).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_drain_empties_registry() {
        let registry = registry_with(&["a", "b"]);
        registry.get_or_create("a", DoubleMode::Nice).unwrap();
        registry.get_or_create("b", DoubleMode::Nice).unwrap();

        let drained = registry.drain();
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.lookup(&BindingKey::new("a")).is_none());
    }

    #[test]
    fn test_replace_with_routes_every_call_to_replacement() {
        let registry = registry_with(&["sdk.IdentifierProvider"]);
        let key = BindingKey::new("sdk.IdentifierProvider");
        let replacement = Arc::new(FixedSurface::new("test-provider", json!("uuid-42")));

        registry
            .replace_with("sdk.IdentifierProvider", replacement)
            .unwrap();

        let resolved = registry.bindings.resolve(&key).unwrap();
        assert_eq!(
            resolved.handle(Call::new("advertising_identifier")).unwrap(),
            json!("uuid-42")
        );
        assert_eq!(resolved.handle(Call::new("anything_else")).unwrap(), json!("uuid-42"));
    }

    #[test]
    fn test_replace_with_is_session_tracked() {
        let registry = registry_with(&["sdk.IdentifierProvider"]);
        let key = BindingKey::new("sdk.IdentifierProvider");
        let original = registry.bindings.resolve(&key).unwrap();

        let double = registry
            .replace_with("sdk.IdentifierProvider", Arc::new(FixedSurface::null("sub")))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(&key).unwrap().id(), double.id());

        // Teardown path: drain then restore, exactly what the controller does.
        for entry in registry.drain().iter().rev() {
            registry.bindings.restore(entry.key()).unwrap();
        }
        let resolved = registry.bindings.resolve(&key).unwrap();
        assert!(Arc::ptr_eq(&resolved, &original));
    }

    #[test]
    fn test_replace_with_conflicts_with_existing_double() {
        let registry = registry_with(&["sdk.IdentifierProvider"]);

        registry
            .get_or_create("sdk.IdentifierProvider", DoubleMode::Nice)
            .unwrap();
        let err = registry
            .replace_with("sdk.IdentifierProvider", Arc::new(FixedSurface::null("sub")))
            .unwrap_err();
        assert!(matches!(err, DoubleError::DuplicateDouble { .. }));
    }

    #[test]
    fn test_rules_layer_on_top_of_replacement() {
        let registry = registry_with(&["sdk.IdentifierProvider"]);
        let double = registry
            .replace_with(
                "sdk.IdentifierProvider",
                Arc::new(FixedSurface::new("sub", json!("from-replacement"))),
            )
            .unwrap();

        double.attach(crate::rule::StubRule::returning("stubbed", json!("from-rule")));
        assert_eq!(
            double.intercept(Call::new("stubbed")).unwrap(),
            json!("from-rule")
        );
        assert_eq!(
            double.intercept(Call::new("unstubbed")).unwrap(),
            json!("from-replacement")
        );
    }

    #[test]
    fn test_partial_double_keeps_original_reachable() {
        let registry = registry_with(&["sdk.Dispatcher"]);
        let double = registry
            .get_or_create("sdk.Dispatcher", DoubleMode::Partial)
            .unwrap();

        // Unstubbed call falls through to the real implementation.
        let out = double.intercept(Call::new("dispatch")).unwrap();
        assert_eq!(out, json!("real"));
    }
}
