// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # understudy-stubs
//!
//! Convenience stub helpers for the SDK singleton surfaces Understudy
//! doubles.
//!
//! This crate names the SDK's substitutable entry points ([`keys`]) and
//! provides [`StubKit`], a set of one-call helpers for the stubs tests
//! reach for constantly: canned settings flags, cached configurations,
//! faked network completions, feature and gatekeeper overrides. Each helper
//! is a thin composition of the core primitives (get-or-create a double,
//! attach one rule), so anything not covered composes the same way through
//! [`understudy_core::SessionController::stub`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use understudy_core::{BindingTable, FixedSurface, SessionController};
//! use understudy_stubs::{StubKit, keys};
//!
//! # fn main() -> understudy_stubs::Result<()> {
//! let bindings = Arc::new(BindingTable::new());
//! for key in keys::ALL {
//!     bindings.install(*key, Arc::new(FixedSurface::null(*key)));
//! }
//!
//! let controller = SessionController::new(bindings);
//! controller.begin().map_err(understudy_stubs::StubError::from)?;
//!
//! StubKit::new(&controller)
//!     .app_id(Some("app-123"))?
//!     .auto_log_events_enabled(false)?
//!     .default_server_configuration()?;
//!
//! controller.end().map_err(understudy_stubs::StubError::from)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod kit;

pub use error::{Result, StubError};
pub use kit::{StubKit, TrackingStatus};
