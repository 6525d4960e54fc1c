//! full_cleanup_workflow — every cleanup step in fixed order
//!
//! Order is a contract: trash, Go, Homebrew, Chrome, Spotify, npm, pip,
//! then Docker (only when requested) immediately before the after-state
//! capture. One step's failure never stops the next.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::cleanup::caches::{self, Target};
use crate::cleanup::{docker, trash, Step};
use crate::context::ToolCtx;
use crate::disk::usage::root_stat;
use crate::units;

/// Cache targets in workflow order.
const WORKFLOW_TARGETS: [Target; 6] = [
    Target::Go,
    Target::Brew,
    Target::Chrome,
    Target::Spotify,
    Target::Npm,
    Target::Pip,
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    include_docker: bool,
    include_docker_volumes: bool,
    dry_run: bool,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input =
        serde_json::from_value(input).context("full_cleanup_workflow: invalid input")?;
    let dry_run = input.dry_run;

    let before = root_stat(&ctx).await.ok();

    let mut steps: Vec<Step> = Vec::new();
    steps.push(trash::run_step(&ctx, dry_run).await);
    for target in WORKFLOW_TARGETS {
        steps.push(caches::run_target(&ctx, target, dry_run).await);
    }
    if input.include_docker {
        steps.push(docker::run_step(&ctx, input.include_docker_volumes, dry_run).await);
    }

    let after = root_stat(&ctx).await.ok();

    // Naive before/after subtraction; skewed by anything else touching
    // the disk, so it is reported as unavailable rather than guessed.
    let (recovered, note) = match (&before, &after) {
        (Some(b), Some(a)) => {
            let kb = a.available_kb.saturating_sub(b.available_kb);
            (Some(units::human_size(kb * 1024)), None)
        }
        _ => (
            None,
            Some("disk capture unavailable; space recovered not computed"),
        ),
    };

    let mut result = json!({
        "dry_run": dry_run,
        "steps": steps,
        "disk_before": before.map(|s| s.to_json()),
        "disk_after": after.map(|s| s.to_json()),
        "space_recovered": recovered,
    });
    if let Some(note) = note {
        result["note"] = json!(note);
    }
    Ok(result)
}
