//! cleanup_caches — per-target cache reporting and purging

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cleanup::{go_cache, Step};
use crate::context::ToolCtx;

/// One purgeable cache with a known owner tool or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Go,
    Brew,
    Npm,
    Pip,
    Chrome,
    Spotify,
}

impl Target {
    pub(crate) const ALL: [Target; 6] = [
        Target::Go,
        Target::Brew,
        Target::Npm,
        Target::Pip,
        Target::Chrome,
        Target::Spotify,
    ];

    fn from_name(name: &str) -> Option<Target> {
        match name {
            "go" => Some(Target::Go),
            "brew" => Some(Target::Brew),
            "npm" => Some(Target::Npm),
            "pip" => Some(Target::Pip),
            "chrome" => Some(Target::Chrome),
            "spotify" => Some(Target::Spotify),
            _ => None,
        }
    }

    /// Step-record name, also used by the full workflow.
    pub(crate) fn step_name(self) -> &'static str {
        match self {
            Target::Go => "go cache",
            Target::Brew => "homebrew cache",
            Target::Npm => "npm cache",
            Target::Pip => "pip cache",
            Target::Chrome => "chrome cache",
            Target::Spotify => "spotify cache",
        }
    }

    fn missing_note(self) -> &'static str {
        match self {
            Target::Go => "Go toolchain may not be installed",
            Target::Brew => "Homebrew may not be installed",
            Target::Npm => "npm may not be installed",
            Target::Pip => "pip may not be installed",
            Target::Chrome => "Chrome cache not found",
            Target::Spotify => "Spotify cache not found",
        }
    }

    /// Cache directory for targets that are plain directories; Go's is
    /// resolved through the toolchain.
    fn cache_dir(self, ctx: &ToolCtx) -> Option<PathBuf> {
        match self {
            Target::Go => None,
            Target::Brew => Some(ctx.home.join("Library/Caches/Homebrew")),
            Target::Npm => Some(ctx.home.join(".npm")),
            Target::Pip => Some(ctx.home.join("Library/Caches/pip")),
            Target::Chrome => Some(ctx.home.join("Library/Caches/Google/Chrome")),
            Target::Spotify => Some(ctx.home.join("Library/Caches/com.spotify.client")),
        }
    }
}

/// Measure then (unless dry) purge one cache target. Never fails: every
/// fault becomes a `skipped` record so other targets keep going.
pub(crate) async fn run_target(ctx: &ToolCtx, target: Target, dry_run: bool) -> Step {
    let name = target.step_name();

    let size = match measure(ctx, target).await {
        Ok(size) => size,
        Err(e) => {
            return Step::skipped(name, e.to_string())
                .with_detail(target.missing_note().to_string())
        }
    };

    if dry_run {
        return Step::would_clean(name, Some(size));
    }

    match purge(ctx, target).await {
        Ok(()) => Step::cleaned(name, Some(size)),
        Err(e) => {
            Step::skipped(name, e.to_string()).with_detail(target.missing_note().to_string())
        }
    }
}

async fn measure(ctx: &ToolCtx, target: Target) -> Result<String> {
    let dir = match target.cache_dir(ctx) {
        Some(dir) => dir,
        None => PathBuf::from(go_cache::cache_path(ctx).await?),
    };
    ctx.dir_size(&dir).await
}

async fn purge(ctx: &ToolCtx, target: Target) -> Result<()> {
    match target {
        Target::Go => {
            ctx.capture("go", &["clean", "-cache"]).await?;
        }
        Target::Brew => {
            ctx.capture("brew", &["cleanup", "-s", "--prune=all"]).await?;
        }
        Target::Npm => {
            ctx.capture("npm", &["cache", "clean", "--force"]).await?;
        }
        Target::Pip => {
            ctx.capture("pip3", &["cache", "purge"]).await?;
        }
        Target::Chrome | Target::Spotify => {
            // cache_dir is always Some for directory-backed targets
            if let Some(dir) = target.cache_dir(ctx) {
                let dir = dir.to_string_lossy().into_owned();
                ctx.capture("rm", &["-rf", &dir]).await?;
            }
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    targets: Vec<String>,
    dry_run: bool,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("cleanup_caches: invalid input")?;

    let targets: Vec<Target> = if input.targets.iter().any(|t| t == "all") {
        Target::ALL.to_vec()
    } else {
        input
            .targets
            .iter()
            .filter_map(|t| Target::from_name(t))
            .collect()
    };

    // Strictly sequential so destructive actions never race measurement.
    let mut results: Vec<Step> = Vec::with_capacity(targets.len());
    for target in targets {
        results.push(run_target(&ctx, target, input.dry_run).await);
    }

    Ok(json!({
        "dry_run": input.dry_run,
        "targets": results,
    }))
}
