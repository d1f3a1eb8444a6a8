//! One-call stub helpers for the SDK's singleton surfaces.
//!
//! Every helper is sugar over the same mechanism: obtain-or-create a double
//! for a well-known target, attach one rule matching one method with one
//! effect. Anything not covered here composes directly on
//! [`SessionController::stub`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use understudy_core::{Double, DoubleMode, SessionController, StubBuilder, Surface};

use crate::error::Result;
use crate::keys;

/// Advertising tracking consent as reported by the settings accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Tracking allowed by the user.
    Allowed,
    /// Tracking denied by the user.
    Disallowed,
    /// Consent not determined yet.
    Unspecified,
}

fn opt_str(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| json!(v))
}

fn opt_error(message: Option<&str>) -> Value {
    message.map_or(Value::Null, |m| json!({ "message": m }))
}

/// Convenience stub helpers over one session controller.
///
/// Helpers return `&Self` so setup reads as a chain:
///
/// ```rust,ignore
/// StubKit::new(&controller)
///     .app_id(Some("app-123"))?
///     .auto_log_events_enabled(false)?
///     .default_server_configuration()?;
/// ```
pub struct StubKit<'a> {
    controller: &'a SessionController,
}

impl<'a> StubKit<'a> {
    /// Creates a kit over the controller's open session.
    #[must_use]
    pub const fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    /// Returns the underlying controller.
    #[must_use]
    pub const fn controller(&self) -> &'a SessionController {
        self.controller
    }

    fn stub(&self, key: &str) -> StubBuilder<'a> {
        self.controller.stub(key)
    }

    // ------------------------------------------------------------------
    // Settings accessor
    // ------------------------------------------------------------------

    /// Stubs the settings app id.
    pub fn app_id(&self, id: Option<&str>) -> Result<&Self> {
        self.stub(keys::SETTINGS).on("app_id").returns(opt_str(id))?;
        Ok(self)
    }

    /// Stubs whether automatic event logging is enabled.
    pub fn auto_log_events_enabled(&self, enabled: bool) -> Result<&Self> {
        self.stub(keys::SETTINGS)
            .on("is_auto_log_events_enabled")
            .returns(json!(enabled))?;
        Ok(self)
    }

    /// Stubs whether advertiser tracking is enabled.
    pub fn advertiser_tracking_enabled(&self, enabled: bool) -> Result<&Self> {
        self.stub(keys::SETTINGS)
            .on("is_advertiser_tracking_enabled")
            .returns(json!(enabled))?;
        Ok(self)
    }

    /// Stubs whether advertiser-id collection is enabled.
    pub fn advertiser_id_collection_enabled(&self, enabled: bool) -> Result<&Self> {
        self.stub(keys::SETTINGS)
            .on("is_advertiser_id_collection_enabled")
            .returns(json!(enabled))?;
        Ok(self)
    }

    /// Stubs the advertising tracking consent status.
    pub fn advertising_tracking_status(&self, status: TrackingStatus) -> Result<&Self> {
        self.stub(keys::SETTINGS)
            .on("advertising_tracking_status")
            .returns(serde_json::to_value(status)?)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Server configuration manager
    // ------------------------------------------------------------------

    /// Stubs the cached server configuration with a harmless default.
    ///
    /// Use when the test does not care what the configuration is and only
    /// needs to avoid a network fetch.
    pub fn default_server_configuration(&self) -> Result<&Self> {
        self.stub(keys::SERVER_CONFIGURATION)
            .on("cached_configuration")
            .returns(default_configuration())?;
        Ok(self)
    }

    /// Stubs the cached server configuration with a specific payload.
    pub fn cached_server_configuration(&self, config: &impl Serialize) -> Result<&Self> {
        self.stub(keys::SERVER_CONFIGURATION)
            .on("cached_configuration")
            .returns(serde_json::to_value(config)?)?;
        Ok(self)
    }

    /// Stubs the server configuration fetch to complete synchronously with
    /// the given configuration and error instead of performing real work.
    pub fn server_configuration_fetch(
        &self,
        config: Option<Value>,
        error: Option<&str>,
    ) -> Result<&Self> {
        self.stub(keys::SERVER_CONFIGURATION)
            .on("load_configuration")
            .invokes_callback(vec![config.unwrap_or(Value::Null), opt_error(error)])?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Events configuration manager
    // ------------------------------------------------------------------

    /// Stubs the cached events configuration.
    pub fn cached_events_configuration(&self, config: &impl Serialize) -> Result<&Self> {
        self.stub(keys::EVENTS_CONFIGURATION)
            .on("cached_configuration")
            .returns(serde_json::to_value(config)?)?;
        Ok(self)
    }

    /// Makes events-configuration loading a no-op: the completion is
    /// dropped and nothing is fetched.
    pub fn events_configuration_loading(&self) -> Result<&Self> {
        self.stub(keys::EVENTS_CONFIGURATION)
            .on("load_configuration")
            .returns(Value::Null)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Profile store
    // ------------------------------------------------------------------

    /// Stubs the cached profile fetch.
    pub fn cached_profile(&self, profile: Option<Value>) -> Result<&Self> {
        self.stub(keys::PROFILE_STORE)
            .on("fetch_cached_profile")
            .returns(profile.unwrap_or(Value::Null))?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Events utility
    // ------------------------------------------------------------------

    /// Stubs the should-drop-event decision.
    pub fn should_drop_event(&self, drop: bool) -> Result<&Self> {
        self.stub(keys::EVENTS_UTILITY)
            .on("should_drop_event")
            .returns(json!(drop))?;
        Ok(self)
    }

    /// Stubs the advertiser identifier.
    pub fn advertiser_id(&self, id: Option<&str>) -> Result<&Self> {
        self.stub(keys::EVENTS_UTILITY)
            .on("advertiser_id")
            .returns(opt_str(id))?;
        Ok(self)
    }

    /// Stubs the token string used for requests.
    pub fn token_string(&self, token: &str) -> Result<&Self> {
        self.stub(keys::EVENTS_UTILITY)
            .on("token_string_to_use")
            .returns(json!(token))?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Graph requests
    // ------------------------------------------------------------------

    /// Stubs graph request starts to complete synchronously with the given
    /// result and error instead of hitting the network.
    pub fn graph_request_result(&self, result: Value, error: Option<&str>) -> Result<&Self> {
        self.stub(keys::GRAPH_REQUEST)
            .on("start")
            .invokes_callback(vec![result, opt_error(error)])?;
        Ok(self)
    }

    /// Disables creation of graph request connections entirely: any call on
    /// the connection factory fails, naming the call.
    ///
    /// This is the nuclear option, a stopgap to keep tests off the network
    /// while proper stubs are written; prefer stubbing the specific request.
    pub fn disable_graph_connections(&self) -> Result<&Self> {
        tracing::debug!("disabling graph connection factory");
        self.controller
            .double(keys::GRAPH_CONNECTION_FACTORY, DoubleMode::Strict)?;
        Ok(self)
    }

    /// Stubs the piggyback manager's last token-refresh attempt timestamp.
    pub fn piggyback_last_refresh(&self, epoch_seconds: u64) -> Result<&Self> {
        self.stub(keys::PIGGYBACK_MANAGER)
            .on("last_refresh_try")
            .returns(json!(epoch_seconds))?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // App launcher
    // ------------------------------------------------------------------

    /// Stubs the simple open-url result.
    pub fn open_url_result(&self, success: bool) -> Result<&Self> {
        self.stub(keys::APP_LAUNCHER)
            .on("open_url")
            .returns(json!(success))?;
        Ok(self)
    }

    /// Stubs the open-url-with-options call. When `perform` is true the
    /// supplied completion is invoked synchronously with `success`;
    /// otherwise the completion is dropped.
    pub fn open_url_completion(&self, perform: bool, success: bool) -> Result<&Self> {
        let stub = self.stub(keys::APP_LAUNCHER).on("open_url_with_options");
        if perform {
            stub.invokes_callback(vec![json!(success)])?;
        } else {
            stub.returns(Value::Null)?;
        }
        Ok(self)
    }

    /// Stubs the app's URL scheme.
    pub fn app_url_scheme(&self, scheme: Option<&str>) -> Result<&Self> {
        self.stub(keys::APP_LAUNCHER)
            .on("app_url_scheme")
            .returns(opt_str(scheme))?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Features and gatekeepers
    // ------------------------------------------------------------------

    /// Stubs the rollout check for one named feature, leaving other
    /// features on the double's default behavior.
    pub fn feature_enabled(&self, feature: &str, enabled: bool) -> Result<&Self> {
        let expected = json!(feature);
        self.stub(keys::FEATURE_MANAGER)
            .on("is_feature_enabled")
            .matching(move |args| args.first() == Some(&expected))
            .returns(json!(enabled))?;
        Ok(self)
    }

    /// Stubs the value of one named gatekeeper.
    pub fn gatekeeper_value(&self, gate: &str, value: bool) -> Result<&Self> {
        let expected = json!(gate);
        self.stub(keys::GATEKEEPER_MANAGER)
            .on("gate_value")
            .matching(move |args| args.first() == Some(&expected))
            .returns(json!(value))?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Ad network reporter
    // ------------------------------------------------------------------

    /// Makes ad-network configuration loading a no-op.
    pub fn ad_network_configuration_loading(&self) -> Result<&Self> {
        self.stub(keys::AD_NETWORK_REPORTER)
            .on("load_configuration")
            .returns(Value::Null)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Identifier provider
    // ------------------------------------------------------------------

    /// Stubs the advertising identifier.
    pub fn advertising_identifier(&self, uuid: &str) -> Result<&Self> {
        self.stub(keys::IDENTIFIER_PROVIDER)
            .on("advertising_identifier")
            .returns(json!(uuid))?;
        Ok(self)
    }

    /// Replaces the shared identifier provider with a caller-supplied test
    /// surface for the session. The original provider is captured and
    /// restored at teardown like any other double.
    pub fn identifier_provider(&self, provider: Arc<dyn Surface>) -> Result<&Self> {
        self.controller.replace(keys::IDENTIFIER_PROVIDER, provider)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Broad-surface doubles
    // ------------------------------------------------------------------

    /// Replaces an entire surface with a nice double: every call becomes a
    /// harmless no-op. For when a test only needs a singleton out of the
    /// way.
    pub fn silence(&self, key: &str) -> Result<&Self> {
        tracing::debug!(key = key, "silencing surface");
        self.controller.double(key, DoubleMode::Nice)?;
        Ok(self)
    }

    /// Doubles the event logger, partial or nice per the test's needs, and
    /// returns the double for later verification of logged events.
    pub fn event_logger(&self, partial: bool) -> Result<Arc<Double>> {
        let mode = if partial {
            DoubleMode::Partial
        } else {
            DoubleMode::Nice
        };
        Ok(self.controller.double(keys::EVENT_LOGGER, mode)?)
    }
}

/// A harmless default server configuration: everything off, nothing cached
/// from the network.
fn default_configuration() -> Value {
    json!({
        "app_id": null,
        "app_name": null,
        "advertising_id_enabled": false,
        "implicit_logging_enabled": false,
        "implicit_purchase_logging_enabled": false,
        "codeless_events_enabled": false,
        "uninstall_tracking_enabled": false,
        "session_timeout_seconds": 60,
        "logging_token": null,
        "smart_login_options": 0,
    })
}
