//! Core identity types for the double lifecycle.
//!
//! Binding keys are stable string identities; double IDs are UUIDs so a
//! double's identity survives independent of registry ordering.

use serde::{Deserialize, Serialize};

/// Stable identity of one substitutable global entry point, e.g. the
/// qualified name of a singleton accessor (`"sdk.Settings"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingKey(String);

impl BindingKey {
    /// Creates a binding key from a qualified surface name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BindingKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BindingKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a double instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoubleId(uuid::Uuid);

impl DoubleId {
    /// Creates a new random double ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a double ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for DoubleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DoubleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behavior of a double for calls no stub rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DoubleMode {
    /// Unmatched calls return a harmless null result; never an error.
    #[default]
    Nice,
    /// Unmatched calls fall through to the captured original implementation.
    Partial,
    /// Unmatched calls fail immediately, naming the call.
    Strict,
}

impl DoubleMode {
    /// Returns true if unmatched calls delegate to the original.
    #[must_use]
    pub const fn falls_through(&self) -> bool {
        matches!(self, Self::Partial)
    }

    /// Returns true if unmatched calls are an error.
    #[must_use]
    pub const fn fails_unmatched(&self) -> bool {
        matches!(self, Self::Strict)
    }
}
