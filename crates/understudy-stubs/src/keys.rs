//! Well-known binding keys for the SDK's substitutable singleton surfaces.
//!
//! One key per process-wide accessor the SDK exposes. Collaborator setup
//! installs a real surface under each key; tests double them through the
//! [`StubKit`](crate::StubKit).

/// Process-wide settings accessor (app id, logging flags, tracking flags).
pub const SETTINGS: &str = "sdk.Settings";

/// Event logger singleton.
pub const EVENT_LOGGER: &str = "sdk.EventLogger";

/// Persisted event-state store.
pub const EVENT_STATE: &str = "sdk.EventState";

/// Event utility helpers (drop decisions, advertiser id, token selection).
pub const EVENTS_UTILITY: &str = "sdk.EventsUtility";

/// Server configuration manager (cached + fetched remote configuration).
pub const SERVER_CONFIGURATION: &str = "sdk.ServerConfigurationManager";

/// Events configuration manager.
pub const EVENTS_CONFIGURATION: &str = "sdk.EventsConfigurationManager";

/// Profile cache/store.
pub const PROFILE_STORE: &str = "sdk.ProfileStore";

/// Graph request dispatcher.
pub const GRAPH_REQUEST: &str = "sdk.GraphRequestDispatcher";

/// Factory for graph request connections.
pub const GRAPH_CONNECTION_FACTORY: &str = "sdk.GraphConnectionFactory";

/// Graph request piggyback manager.
pub const PIGGYBACK_MANAGER: &str = "sdk.GraphPiggybackManager";

/// Feature manager (remote feature rollout checks).
pub const FEATURE_MANAGER: &str = "sdk.FeatureManager";

/// Gatekeeper manager (remote kill switches).
pub const GATEKEEPER_MANAGER: &str = "sdk.GatekeeperManager";

/// Ad-network conversion reporter.
pub const AD_NETWORK_REPORTER: &str = "sdk.AdNetworkReporter";

/// Measurement event listener.
pub const MEASUREMENT_LISTENER: &str = "sdk.MeasurementEventListener";

/// Time-spent-in-app tracker.
pub const TIME_SPENT_TRACKER: &str = "sdk.TimeSpentTracker";

/// Crash shield.
pub const CRASH_SHIELD: &str = "sdk.CrashShield";

/// URL opener / app launcher.
pub const APP_LAUNCHER: &str = "sdk.AppLauncher";

/// Advertising identifier provider.
pub const IDENTIFIER_PROVIDER: &str = "sdk.IdentifierProvider";

/// Every well-known key, for bulk collaborator setup.
pub const ALL: &[&str] = &[
    SETTINGS,
    EVENT_LOGGER,
    EVENT_STATE,
    EVENTS_UTILITY,
    SERVER_CONFIGURATION,
    EVENTS_CONFIGURATION,
    PROFILE_STORE,
    GRAPH_REQUEST,
    GRAPH_CONNECTION_FACTORY,
    PIGGYBACK_MANAGER,
    FEATURE_MANAGER,
    GATEKEEPER_MANAGER,
    AD_NETWORK_REPORTER,
    MEASUREMENT_LISTENER,
    TIME_SPENT_TRACKER,
    CRASH_SHIELD,
    APP_LAUNCHER,
    IDENTIFIER_PROVIDER,
];
