//! empty_trash — report or purge the trash directory

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::cleanup::Step;
use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    dry_run: bool,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("empty_trash: invalid input")?;
    let step = run_step(&ctx, input.dry_run).await;
    Ok(serde_json::to_value(step)?)
}

/// Measure then (unless dry) remove every top-level trash entry.
/// Shared with the full cleanup workflow.
pub(crate) async fn run_step(ctx: &ToolCtx, dry_run: bool) -> Step {
    let trash = ctx.trash_dir();

    let entries: Vec<std::path::PathBuf> = match std::fs::read_dir(&trash) {
        Ok(dir) => dir.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            return Step::skipped("trash", format!("cannot read {}: {e}", trash.display()))
        }
    };

    if entries.is_empty() {
        let step = if dry_run {
            Step::would_clean("trash", Some("0B".to_string()))
        } else {
            Step::cleaned("trash", Some("0B".to_string()))
        };
        return step.with_detail("trash is already empty".to_string());
    }

    let size = ctx.dir_size(&trash).await.ok();
    let detail = format!("{} item(s)", entries.len());

    if dry_run {
        return Step::would_clean("trash", size).with_detail(detail);
    }

    let mut failed = 0usize;
    for entry in &entries {
        let path = entry.to_string_lossy().into_owned();
        if ctx.capture("rm", &["-rf", &path]).await.is_err() {
            failed += 1;
        }
    }

    let step = Step::cleaned("trash", size);
    if failed > 0 {
        step.with_detail(format!(
            "{} item(s), {failed} could not be removed",
            entries.len()
        ))
    } else {
        step.with_detail(detail)
    }
}
