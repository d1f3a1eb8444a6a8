//! Target bindings: the process-wide table of substitutable entry points.
//!
//! Each slot pairs the installed real implementation with an explicit,
//! typed capture of the pre-substitution original: the "original value" is
//! data, not an implicit runtime fact. The substitute pointer is only ever
//! mutated by the currently open session.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DoubleError, Result};
use crate::surface::Surface;
use crate::types::BindingKey;

/// One substitutable entry point.
struct BindingSlot {
    /// The implementation the SDK installed.
    real: Arc<dyn Surface>,
    /// Pre-substitution original, captured exactly once per session.
    original: Option<Arc<dyn Surface>>,
    /// Active substitute, if any.
    substitute: Option<Arc<dyn Surface>>,
}

/// Table of target bindings keyed by [`BindingKey`].
///
/// Singleton accessors resolve through this table, so a substitution is
/// visible process-wide the moment it lands. Create one table per test
/// worker; never share a table across concurrently running tests.
pub struct BindingTable {
    slots: RwLock<HashMap<BindingKey, BindingSlot>>,
}

impl BindingTable {
    /// Creates an empty binding table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Installs the real implementation for `key`.
    ///
    /// This is the one hook each substitutable collaborator provides.
    /// Re-installing replaces the real implementation but leaves any capture
    /// state in place, which is what lets [`capture`](Self::capture) detect
    /// out-of-band swaps.
    pub fn install(&self, key: impl Into<BindingKey>, imp: Arc<dyn Surface>) {
        let key = key.into();
        tracing::debug!(key = %key, surface = imp.name(), "installed surface");
        let mut slots = self.slots.write();
        match slots.get_mut(&key) {
            Some(slot) => slot.real = imp,
            None => {
                slots.insert(
                    key,
                    BindingSlot {
                        real: imp,
                        original: None,
                        substitute: None,
                    },
                );
            }
        }
    }

    /// Resolves `key` to the active implementation: the substitute if one is
    /// in place, the real implementation otherwise.
    pub fn resolve(&self, key: &BindingKey) -> Result<Arc<dyn Surface>> {
        let slots = self.slots.read();
        let slot = slots
            .get(key)
            .ok_or_else(|| DoubleError::unknown_binding(key.clone()))?;
        Ok(slot
            .substitute
            .as_ref()
            .unwrap_or(&slot.real)
            .clone())
    }

    /// Captures the implementation in effect before any substitution.
    ///
    /// Idempotent per session: the first call records the current real
    /// implementation, later calls return the recorded one. Fails with
    /// [`DoubleError::AlreadyCapturedMismatch`] if a later call observes
    /// that the installed implementation changed identity since the first
    /// capture.
    pub fn capture(&self, key: &BindingKey) -> Result<Arc<dyn Surface>> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(key)
            .ok_or_else(|| DoubleError::unknown_binding(key.clone()))?;
        match &slot.original {
            None => {
                let original = slot.real.clone();
                slot.original = Some(original.clone());
                tracing::debug!(key = %key, "captured original");
                Ok(original)
            }
            Some(original) => {
                if Arc::ptr_eq(original, &slot.real) {
                    Ok(original.clone())
                } else {
                    Err(DoubleError::capture_mismatch(key.clone()))
                }
            }
        }
    }

    /// Redirects all future resolution of `key` to `imp`.
    ///
    /// The original must have been captured first; the registry guarantees
    /// that ordering, so a violation here is a framework bug.
    pub fn substitute(&self, key: &BindingKey, imp: Arc<dyn Surface>) -> Result<()> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(key)
            .ok_or_else(|| DoubleError::unknown_binding(key.clone()))?;
        if slot.original.is_none() {
            return Err(DoubleError::internal(format!(
                "substitute before capture for binding {key}"
            )));
        }
        slot.substitute = Some(imp);
        tracing::debug!(key = %key, "substituted");
        Ok(())
    }

    /// Resets resolution of `key` to the captured original and clears the
    /// capture, re-arming the once-per-session invariant for the next
    /// session.
    pub fn restore(&self, key: &BindingKey) -> Result<()> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(key)
            .ok_or_else(|| DoubleError::unknown_binding(key.clone()))?;
        let original = slot
            .original
            .take()
            .ok_or_else(|| DoubleError::restore_without_capture(key.clone()))?;
        slot.real = original;
        slot.substitute = None;
        tracing::debug!(key = %key, "restored original");
        Ok(())
    }

    /// Returns true if `key` currently resolves to a substitute.
    #[must_use]
    pub fn is_substituted(&self, key: &BindingKey) -> bool {
        self.slots
            .read()
            .get(key)
            .is_some_and(|slot| slot.substitute.is_some())
    }

    /// Returns true if a surface is installed for `key`.
    #[must_use]
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.slots.read().contains_key(key)
    }

    /// Returns the number of installed bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true if no bindings are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}
