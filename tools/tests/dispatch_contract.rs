//! Registry/dispatch contract: lockstep binding, default filling, and
//! argument validation.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};

use macops_tools::{builtin_registry, DispatchError, Dispatcher};
use support::{test_ctx, FakeRunner};

const PS_SAMPLE: &str = "\
    1  0.0  0.4 Ss /sbin/launchd
  412 12.5  8.2 S  /Applications/Safari.app/Contents/MacOS/Safari
   99  1.0  0.5 I  WindowServer
";

#[test]
fn test_every_registered_tool_has_exactly_one_handler() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();

    let registered: HashSet<&str> = registry.list_tools().iter().map(|t| t.name).collect();
    let bound: HashSet<&str> = dispatcher.handler_names().into_iter().collect();

    assert_eq!(registered, bound);
}

#[tokio::test]
async fn test_unknown_tool_is_a_protocol_error() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();
    let ctx = test_ctx(home.path(), Arc::new(FakeRunner::new()));

    let result = dispatcher
        .dispatch(&registry, &ctx, "does_not_exist", Value::Null)
        .await;

    assert!(matches!(result, Err(DispatchError::UnknownTool(_))));
}

#[tokio::test]
async fn test_enum_rejection_happens_before_handler_execution() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();
    let runner = Arc::new(FakeRunner::new());
    let ctx = test_ctx(home.path(), runner.clone());

    let result = dispatcher
        .dispatch(
            &registry,
            &ctx,
            "cleanup_caches",
            json!({ "targets": ["bogus"] }),
        )
        .await;

    assert!(matches!(result, Err(DispatchError::InvalidArgument(_))));
    assert!(runner.calls().is_empty(), "handler must not have run");
}

#[tokio::test]
async fn test_string_enum_rejection() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();
    let ctx = test_ctx(home.path(), Arc::new(FakeRunner::new()));

    let result = dispatcher
        .dispatch(&registry, &ctx, "process_list", json!({ "sortBy": "pid" }))
        .await;

    assert!(matches!(result, Err(DispatchError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_type_mismatch_is_a_protocol_error() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();
    let ctx = test_ctx(home.path(), Arc::new(FakeRunner::new()));

    let result = dispatcher
        .dispatch(&registry, &ctx, "disk_usage", json!({ "depth": "one" }))
        .await;

    assert!(matches!(result, Err(DispatchError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_non_object_arguments_are_rejected() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();
    let ctx = test_ctx(home.path(), Arc::new(FakeRunner::new()));

    let result = dispatcher
        .dispatch(&registry, &ctx, "process_list", json!([1, 2, 3]))
        .await;

    assert!(matches!(result, Err(DispatchError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_no_arguments_equals_explicit_defaults() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();

    let runner = Arc::new(FakeRunner::new());
    runner.ok("ps -Ao pid=,%cpu=,%mem=,state=,comm=", PS_SAMPLE);
    let ctx = test_ctx(home.path(), runner);

    let implicit = dispatcher
        .dispatch(&registry, &ctx, "process_list", Value::Null)
        .await
        .unwrap();

    let explicit = dispatcher
        .dispatch(
            &registry,
            &ctx,
            "process_list",
            json!({ "sortBy": "cpu", "limit": 20 }),
        )
        .await
        .unwrap();

    assert_eq!(implicit, explicit);
    assert_eq!(implicit["count"], 3);
}

#[tokio::test]
async fn test_handler_failure_is_reported_in_band() {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    let home = tempfile::tempdir().unwrap();

    // Nothing scripted: every external command looks uninstalled.
    let ctx = test_ctx(home.path(), Arc::new(FakeRunner::new()));

    let result = dispatcher
        .dispatch(&registry, &ctx, "memory_status", Value::Null)
        .await
        .unwrap();

    assert!(result.get("error").is_some(), "expected in-band error");
}
