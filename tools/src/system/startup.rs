//! startup_items — launch agents, daemons, and what launchd has loaded

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    show_disabled: bool,
}

#[derive(Serialize)]
struct LoadedAgent {
    pid: Option<i64>,
    status: i64,
    label: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("startup_items: invalid input")?;

    let user_agents = plists_in(&ctx.home.join("Library/LaunchAgents"));
    let system_agents = plists_in(Path::new("/Library/LaunchAgents"));
    let system_daemons = plists_in(Path::new("/Library/LaunchDaemons"));

    let loaded_out = ctx.capture("launchctl", &["list"]).await?;
    let loaded = parse_launchctl_list(&loaded_out);

    let mut result = json!({
        "user_agents": user_agents,
        "system_agents": system_agents,
        "system_daemons": system_daemons,
        "loaded": loaded,
    });

    if input.show_disabled {
        match disabled_items(&ctx).await {
            Ok(disabled) => result["disabled"] = json!(disabled),
            Err(e) => result["disabled_note"] = json!(format!("could not list disabled items: {e}")),
        }
    }

    Ok(result)
}

/// Sorted plist filenames in a launch item directory; a missing
/// directory is an empty list, not an error.
fn plists_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".plist"))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Parse `launchctl list`: "PID\tStatus\tLabel" with "-" for no pid.
fn parse_launchctl_list(text: &str) -> Vec<LoadedAgent> {
    let mut agents = Vec::new();
    for line in text.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        agents.push(LoadedAgent {
            pid: parts[0].parse().ok(),
            status: parts[1].parse().unwrap_or(0),
            label: parts[2..].join(" "),
        });
    }
    agents
}

/// Labels disabled for the current GUI session, via launchctl.
async fn disabled_items(ctx: &ToolCtx) -> Result<Vec<String>> {
    let uid = ctx.capture("id", &["-u"]).await?.trim().to_string();
    let domain = format!("gui/{uid}");
    let out = ctx.capture("launchctl", &["print-disabled", &domain]).await?;
    Ok(parse_disabled(&out))
}

/// Parse `launchctl print-disabled` lines: `"com.example.tool" => disabled`.
fn parse_disabled(text: &str) -> Vec<String> {
    let mut labels = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if !line.ends_with("=> disabled") && !line.ends_with("=> true") {
            continue;
        }
        if let Some(label) = line.split('"').nth(1) {
            labels.push(label.to_string());
        }
    }
    labels
}
