//! Session isolation tests.
//!
//! Each test models one "test suite" integrating the framework: install the
//! SDK's surfaces once, then run sessions against them and prove no
//! substitution survives its session.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use understudy_core::{
    BindingKey, BindingTable, Call, DoubleError, FixedSurface, SessionController, Surface,
};
use understudy_stubs::{StubKit, keys};

fn sdk_bindings() -> Arc<BindingTable> {
    let table = Arc::new(BindingTable::new());
    for key in keys::ALL {
        table.install(*key, Arc::new(FixedSurface::new(*key, json!({"real": key}))));
    }
    table
}

fn resolve(table: &BindingTable, key: &str) -> Arc<dyn Surface> {
    table.resolve(&BindingKey::new(key)).unwrap()
}

/// A full kit setup leaves no trace once the session ends: every surface
/// resolves to its pre-test implementation again.
#[test]
fn full_setup_leaves_no_trace() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    let originals: Vec<(BindingKey, Arc<dyn Surface>)> = keys::ALL
        .iter()
        .map(|key| {
            let key = BindingKey::new(*key);
            let imp = bindings.resolve(&key).unwrap();
            (key, imp)
        })
        .collect();

    controller.begin().unwrap();
    StubKit::new(&controller)
        .app_id(Some("isolation-app"))
        .unwrap()
        .auto_log_events_enabled(false)
        .unwrap()
        .default_server_configuration()
        .unwrap()
        .cached_profile(Some(json!({"name": "pat"})))
        .unwrap()
        .should_drop_event(true)
        .unwrap()
        .graph_request_result(json!({"id": "me"}), None)
        .unwrap()
        .disable_graph_connections()
        .unwrap()
        .feature_enabled("codeless_events", true)
        .unwrap()
        .silence(keys::CRASH_SHIELD)
        .unwrap();
    controller.end().unwrap();

    for (key, original) in originals {
        let resolved = bindings.resolve(&key).unwrap();
        assert!(
            Arc::ptr_eq(&resolved, &original),
            "binding {key} leaked a substitute"
        );
    }
}

/// A stub configured in one session is invisible to the next.
#[test]
fn sessions_do_not_leak_into_each_other() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    controller.begin().unwrap();
    StubKit::new(&controller).app_id(Some("first")).unwrap();
    assert_eq!(
        resolve(&bindings, keys::SETTINGS)
            .handle(Call::new("app_id"))
            .unwrap(),
        json!("first")
    );
    controller.end().unwrap();

    controller.begin().unwrap();
    // Unstubbed in the new session: the real surface answers.
    assert_eq!(
        resolve(&bindings, keys::SETTINGS)
            .handle(Call::new("app_id"))
            .unwrap(),
        json!({"real": keys::SETTINGS})
    );
    controller.end().unwrap();
}

/// Teardown runs even when the test body panics, so the next session starts
/// from clean state instead of aborting with SessionAlreadyOpen.
#[test]
fn panicking_test_body_does_not_poison_the_next_session() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        controller
            .run(|| {
                StubKit::new(&controller)
                    .disable_graph_connections()
                    .unwrap();
                panic!("assertion failed inside the test body");
            })
            .unwrap();
    }));
    assert!(outcome.is_err());

    // The strict double is gone and the next session opens cleanly.
    assert!(
        !bindings.is_substituted(&BindingKey::new(keys::GRAPH_CONNECTION_FACTORY))
    );
    controller.begin().unwrap();
    controller.end().unwrap();
}

/// The strict connection-factory double turns any network-bound call into
/// an immediate, named failure.
#[test]
fn disabled_connections_fail_by_name() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    controller.begin().unwrap();
    StubKit::new(&controller).disable_graph_connections().unwrap();

    let err = resolve(&bindings, keys::GRAPH_CONNECTION_FACTORY)
        .handle(Call::new("create_connection").with_args(vec![json!("/me")]))
        .unwrap_err();
    match err {
        DoubleError::UnstubbedCall { signature, .. } => {
            assert_eq!(signature, "create_connection(\"/me\")");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    controller.end().unwrap();
}

/// Kit helpers and raw builder calls compose on the same double.
#[test]
fn kit_and_builder_compose() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    controller.begin().unwrap();
    StubKit::new(&controller).app_id(Some("composed")).unwrap();
    controller
        .stub(keys::SETTINGS)
        .on("client_token")
        .returns(json!("token-1"))
        .unwrap();

    let settings = resolve(&bindings, keys::SETTINGS);
    assert_eq!(settings.handle(Call::new("app_id")).unwrap(), json!("composed"));
    assert_eq!(
        settings.handle(Call::new("client_token")).unwrap(),
        json!("token-1")
    );

    // One double per target: both rules landed on the same registry entry.
    let registry = controller.registry().unwrap();
    assert_eq!(registry.len(), 1);

    controller.end().unwrap();
}

/// Completion-style stubs deliver before the intercepted call returns.
#[test]
fn completions_are_synchronous_end_to_end() {
    let bindings = sdk_bindings();
    let controller = SessionController::new(bindings.clone());

    controller.begin().unwrap();
    StubKit::new(&controller)
        .server_configuration_fetch(Some(json!({"session_timeout_seconds": 5})), None)
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
    let sink = seen.clone();
    resolve(&bindings, keys::SERVER_CONFIGURATION)
        .handle(
            Call::new("load_configuration").with_completion(move |args| {
                sink.lock().extend(args.to_vec());
            }),
        )
        .unwrap();

    assert_eq!(seen.lock().len(), 2);
    assert_eq!(seen.lock()[0], json!({"session_timeout_seconds": 5}));

    controller.end().unwrap();
}
