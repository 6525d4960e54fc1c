//! full_cleanup_workflow: fixed ordering, dry-run safety, partial
//! failure isolation, and best-effort disk capture.

mod support;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use macops_tools::{builtin_registry, Dispatcher};
use support::{test_ctx, FakeRunner, DF_SAMPLE, DOCKER_DF_SAMPLE};

const BASE_STEPS: [&str; 7] = [
    "trash",
    "go cache",
    "homebrew cache",
    "chrome cache",
    "spotify cache",
    "npm cache",
    "pip cache",
];

/// Fake home with one file in the trash so the trash step has work.
fn fake_home() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    let trash = home.path().join(".Trash");
    fs::create_dir_all(&trash).unwrap();
    fs::write(trash.join("old-download.dmg"), b"junk").unwrap();
    home
}

/// Script every command the workflow can issue.
fn scripted_runner(home: &Path) -> Arc<FakeRunner> {
    let runner = Arc::new(FakeRunner::new());
    runner.ok("df -k /", DF_SAMPLE);
    runner.ok("du -sh", "2.0G\t/some/cache\n");
    runner.ok(
        "go env GOCACHE",
        &format!("{}/Library/Caches/go-build\n", home.display()),
    );
    runner.ok("go clean -cache", "");
    runner.ok("brew cleanup -s --prune=all", "Removing: ...\n");
    runner.ok("npm cache clean --force", "");
    runner.ok("pip3 cache purge", "Files removed: 212\n");
    runner.ok("rm -rf", "");
    runner.ok("docker system df", DOCKER_DF_SAMPLE);
    runner.ok("docker system prune -f --volumes", "Total reclaimed space: 10.3GB\n");
    runner.ok("docker system prune -f", "Total reclaimed space: 4.2GB\n");
    runner
}

async fn run_workflow(ctx: &Arc<macops_tools::ToolCtx>, args: Value) -> Value {
    let registry = builtin_registry();
    let dispatcher = Dispatcher::new();
    dispatcher
        .dispatch(&registry, ctx, "full_cleanup_workflow", args)
        .await
        .unwrap()
}

fn step_names(result: &Value) -> Vec<String> {
    result["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

fn step_statuses(result: &Value) -> Vec<String> {
    result["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_step_order_without_docker() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner);

    let result = run_workflow(&ctx, json!({ "dryRun": true })).await;

    assert_eq!(step_names(&result), BASE_STEPS.to_vec());
}

#[tokio::test]
async fn test_docker_step_comes_last_when_requested() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner);

    let result = run_workflow(&ctx, json!({ "dryRun": true, "includeDocker": true })).await;

    let mut expected: Vec<&str> = BASE_STEPS.to_vec();
    expected.push("docker");
    assert_eq!(step_names(&result), expected);
}

#[tokio::test]
async fn test_dry_run_is_non_destructive_and_labelled() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner.clone());

    let result = run_workflow(
        &ctx,
        json!({ "dryRun": true, "includeDocker": true, "includeDockerVolumes": true }),
    )
    .await;

    assert!(
        runner.destructive_calls().is_empty(),
        "dry run issued destructive commands: {:?}",
        runner.destructive_calls()
    );
    for status in step_statuses(&result) {
        assert_eq!(status, "would clean");
    }
}

#[tokio::test]
async fn test_real_run_cleans_in_identical_order() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner.clone());

    let dry = run_workflow(&ctx, json!({ "dryRun": true, "includeDocker": true })).await;

    let real = run_workflow(&ctx, json!({ "includeDocker": true })).await;

    assert_eq!(step_names(&dry), step_names(&real));
    for status in step_statuses(&real) {
        assert_eq!(status, "cleaned");
    }
    assert!(!runner.destructive_calls().is_empty());
}

#[tokio::test]
async fn test_docker_volumes_need_their_own_flag() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner.clone());

    run_workflow(&ctx, json!({ "includeDocker": true })).await;

    let prunes: Vec<String> = runner
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("docker system prune"))
        .collect();
    assert_eq!(prunes, vec!["docker system prune -f"]);

    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner.clone());
    run_workflow(
        &ctx,
        json!({ "includeDocker": true, "includeDockerVolumes": true }),
    )
    .await;

    let prunes: Vec<String> = runner
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("docker system prune"))
        .collect();
    assert_eq!(prunes, vec!["docker system prune -f --volumes"]);
}

#[tokio::test]
async fn test_one_failing_step_does_not_stop_the_rest() {
    let home = fake_home();

    // Homebrew purge fails; everything else must still run.
    let runner = Arc::new(FakeRunner::new());
    runner.ok("df -k /", DF_SAMPLE);
    runner.ok("du -sh", "2.0G\t/some/cache\n");
    runner.ok("go env GOCACHE", "/Users/tester/Library/Caches/go-build\n");
    runner.ok("go clean -cache", "");
    runner.fail("brew cleanup -s --prune=all", "Error: broken Cellar");
    runner.ok("npm cache clean --force", "");
    runner.ok("pip3 cache purge", "");
    runner.ok("rm -rf", "");
    let ctx = test_ctx(home.path(), runner);

    let result = run_workflow(&ctx, json!({})).await;

    assert_eq!(step_names(&result), BASE_STEPS.to_vec());
    let steps = result["steps"].as_array().unwrap();
    assert_eq!(steps[2]["status"], "skipped");
    assert!(steps[2]["error"].as_str().unwrap().contains("broken Cellar"));
    for (i, step) in steps.iter().enumerate() {
        if i != 2 {
            assert_eq!(step["status"], "cleaned", "step {i} should have cleaned");
        }
    }
}

#[tokio::test]
async fn test_space_recovered_unavailable_when_capture_fails() {
    let home = fake_home();
    let runner = Arc::new(FakeRunner::new());
    runner.fail("df -k /", "df: cannot stat /");
    runner.ok("du -sh", "2.0G\t/some/cache\n");
    runner.ok("go env GOCACHE", "/Users/tester/Library/Caches/go-build\n");
    let ctx = test_ctx(home.path(), runner);

    let result = run_workflow(&ctx, json!({ "dryRun": true })).await;

    assert!(result["space_recovered"].is_null());
    assert!(result["disk_before"].is_null());
    assert!(result["note"]
        .as_str()
        .unwrap()
        .contains("space recovered not computed"));
}

#[tokio::test]
async fn test_space_recovered_present_when_captures_succeed() {
    let home = fake_home();
    let runner = scripted_runner(home.path());
    let ctx = test_ctx(home.path(), runner);

    let result = run_workflow(&ctx, json!({ "dryRun": true })).await;

    // Same df sample before and after: zero recovered, but never null.
    assert_eq!(result["space_recovered"], "0B");
    assert!(result.get("note").is_none());
}
