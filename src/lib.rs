//! Understudy: a test-double lifecycle framework for singleton-heavy SDKs.
//!
//! Replace any process-wide singleton surface with a controlled stand-in
//! for the duration of one test, and guarantee the original is restored
//! afterwards, even when the test body fails.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use understudy::prelude::*;
//!
//! # fn main() -> understudy::core::Result<()> {
//! let bindings = Arc::new(BindingTable::new());
//! bindings.install("sdk.Settings", Arc::new(FixedSurface::null("settings")));
//!
//! let controller = SessionController::new(bindings);
//! controller.run(|| {
//!     // stub, exercise code under test, verify
//! })?;
//! # Ok(())
//! # }
//! ```

pub use understudy_core as core;
pub use understudy_stubs as stubs;

/// Prelude module for common imports.
pub mod prelude {
    pub use understudy_core::{
        ArgMatcher, BindingKey, BindingTable, Call, CallRecord, Double, DoubleError, DoubleMode,
        Effect, FixedSurface, SessionController, StubRule, Surface, TeardownReport, Value,
    };
    pub use understudy_stubs::{StubKit, TrackingStatus, keys};
}
