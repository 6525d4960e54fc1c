//! cleanup_docker — Docker disk usage reporting and pruning

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::cleanup::Step;
use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    include_volumes: bool,
    dry_run: bool,
}

/// One row of `docker system df` output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct UsageRow {
    pub kind: String,
    pub total: u64,
    pub active: u64,
    pub size: String,
    pub reclaimable: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("cleanup_docker: invalid input")?;

    let df = match ctx.capture("docker", &["system", "df"]).await {
        Ok(out) => out,
        Err(e) => {
            return Ok(json!({
                "error": e.to_string(),
                "note": "Docker may not be installed or running",
            }))
        }
    };

    let usage = parse_system_df(&df);
    let reclaimable = reclaimable_gb(&usage);

    if input.dry_run {
        return Ok(json!({
            "dry_run": true,
            "usage": usage,
            "reclaimable_gb": reclaimable,
        }));
    }

    let mut args = vec!["system", "prune", "-f"];
    if input.include_volumes {
        args.push("--volumes");
    }

    match ctx.capture("docker", &args).await {
        Ok(out) => {
            // Last non-empty line is docker's "Total reclaimed space: X"
            let summary = out
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("")
                .trim()
                .to_string();
            Ok(json!({
                "status": "cleaned",
                "usage_before": usage,
                "detail": summary,
            }))
        }
        Err(e) => Ok(json!({ "error": e.to_string() })),
    }
}

/// Docker step for the full workflow. Only ever invoked when the caller
/// asked for Docker; volumes stay untouched unless separately requested.
pub(crate) async fn run_step(ctx: &ToolCtx, include_volumes: bool, dry_run: bool) -> Step {
    let df = match ctx.capture("docker", &["system", "df"]).await {
        Ok(out) => out,
        Err(e) => {
            return Step::skipped("docker", e.to_string())
                .with_detail("Docker may not be installed or running".to_string())
        }
    };

    let reclaimable = reclaimable_gb(&parse_system_df(&df));
    let size = Some(format!("{reclaimable:.1}G"));

    if dry_run {
        return Step::would_clean("docker", size);
    }

    let mut args = vec!["system", "prune", "-f"];
    if include_volumes {
        args.push("--volumes");
    }

    match ctx.capture("docker", &args).await {
        Ok(_) => Step::cleaned("docker", size),
        Err(e) => Step::skipped("docker", e.to_string()),
    }
}

/// Parse the `docker system df` table. Row labels can be two words
/// ("Local Volumes", "Build Cache"), so match on known prefixes.
pub(crate) fn parse_system_df(text: &str) -> Vec<UsageRow> {
    const KINDS: &[&str] = &["Images", "Containers", "Local Volumes", "Build Cache"];

    let mut rows = Vec::new();
    for line in text.lines() {
        let Some(kind) = KINDS.iter().find(|k| line.starts_with(**k)) else {
            continue;
        };
        let rest = line[kind.len()..].trim();
        let parts: Vec<&str> = rest.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        rows.push(UsageRow {
            kind: kind.to_string(),
            total: parts[0].parse().unwrap_or(0),
            active: parts[1].parse().unwrap_or(0),
            size: parts[2].to_string(),
            reclaimable: parts[3].to_string(),
        });
    }
    rows
}

/// Sum of the reclaimable column, in gigabytes. Docker prints decimal
/// units ("4.2GB", "500MB", "1.5kB").
pub(crate) fn reclaimable_gb(rows: &[UsageRow]) -> f64 {
    rows.iter()
        .filter_map(|r| docker_size_gb(&r.reclaimable))
        .sum()
}

fn docker_size_gb(token: &str) -> Option<f64> {
    let token = token.trim();
    let split = token
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    let (value, unit) = token.split_at(split);
    let value: f64 = value.parse().ok()?;

    let bytes = match unit.to_ascii_uppercase().as_str() {
        "B" | "" => value,
        "KB" => value * 1e3,
        "MB" => value * 1e6,
        "GB" => value * 1e9,
        "TB" => value * 1e12,
        _ => return None,
    };
    Some(bytes / 1e9)
}
