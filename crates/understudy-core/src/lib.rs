// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # understudy-core
//!
//! Double registry and session lifecycle primitives for the Understudy
//! test-double framework.
//!
//! This crate provides the mechanism for replacing process-wide
//! singleton-style surfaces with controlled stand-ins for the duration of
//! one test, and for guaranteeing every stand-in is removed afterwards:
//!
//! - [`Surface`]: the capability interface real singletons and doubles
//!   both satisfy
//! - [`BindingTable`]: target bindings with explicit
//!   capture/substitute/restore
//! - [`StubRule`]: declarative matcher-to-effect call descriptions
//! - [`Double`]: a substitute surface with `Nice`/`Partial`/`Strict`
//!   unmatched-call behavior
//! - [`DoubleRegistry`]: at most one active double per target per session
//! - [`SessionController`]: begin/end with guaranteed reverse-order
//!   teardown
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use understudy_core::{
//!     BindingTable, Call, FixedSurface, SessionController, Surface,
//! };
//!
//! # fn main() -> understudy_core::Result<()> {
//! let bindings = Arc::new(BindingTable::new());
//! bindings.install("sdk.Settings", Arc::new(FixedSurface::null("settings")));
//!
//! let controller = SessionController::new(bindings.clone());
//! controller.begin()?;
//!
//! controller
//!     .stub("sdk.Settings")
//!     .on("app_id")
//!     .returns(json!("a1"))?;
//!
//! // Code under test resolves the singleton through the binding table.
//! let settings = bindings.resolve(&"sdk.Settings".into())?;
//! assert_eq!(settings.handle(Call::new("app_id"))?, json!("a1"));
//!
//! controller.end()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod binding;
pub mod builder;
pub mod call;
pub mod double;
pub mod error;
pub mod registry;
pub mod rule;
pub mod session;
pub mod surface;
#[cfg(test)]
pub mod tests;
pub mod types;

pub use binding::BindingTable;
pub use builder::{MethodStub, StubBuilder};
pub use call::{Call, CallRecord, Completion};
pub use double::Double;
pub use error::{DoubleError, Result};
pub use registry::DoubleRegistry;
pub use rule::{ArgMatcher, Effect, RuleHandle, RuleSet, StubRule};
pub use session::{SessionController, TeardownReport};
pub use surface::{FixedSurface, Surface};
pub use types::{BindingKey, DoubleId, DoubleMode};

pub use serde_json::Value;
