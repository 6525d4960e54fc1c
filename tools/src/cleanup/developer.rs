//! developer_cleanup — node_modules, Xcode, and pyenv leftovers
//!
//! Defaults to dry run: discovery and sizing only, nothing deleted
//! unless both the per-kind flag and dryRun=false are set.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::context::ToolCtx;

/// Cap on how many node_modules directories get sized; find can return
/// far more than anyone wants to read.
const MAX_NODE_MODULES: usize = 25;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    clean_node_modules: bool,
    clean_xcode: bool,
    clean_pyenv_old_versions: bool,
    dry_run: bool,
}

#[derive(Serialize)]
struct Artifact {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_days: Option<i64>,
    removed: bool,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("developer_cleanup: invalid input")?;

    let node_modules = node_modules_section(&ctx, &input).await;
    let xcode = xcode_section(&ctx, &input).await;
    let pyenv = pyenv_section(&ctx, &input).await;

    Ok(json!({
        "dry_run": input.dry_run,
        "node_modules": node_modules,
        "xcode": xcode,
        "pyenv": pyenv,
    }))
}

async fn node_modules_section(ctx: &ToolCtx, input: &Input) -> Value {
    let home = ctx.home.to_string_lossy().into_owned();
    // find exits non-zero on unreadable directories but still prints hits
    let out = match ctx
        .run(
            "find",
            &[
                &home,
                "-maxdepth",
                "4",
                "-type",
                "d",
                "-name",
                "node_modules",
                "-prune",
            ],
        )
        .await
    {
        Ok(out) => out,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    let mut found: Vec<String> = out
        .stdout
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    found.sort();
    let truncated = found.len() > MAX_NODE_MODULES;
    found.truncate(MAX_NODE_MODULES);

    let remove = input.clean_node_modules && !input.dry_run;
    let mut entries = Vec::with_capacity(found.len());
    for path in found {
        entries.push(artifact(ctx, Path::new(&path), remove).await);
    }

    let mut section = json!({ "entries": entries });
    if truncated {
        section["note"] = json!(format!("showing first {MAX_NODE_MODULES} directories"));
    }
    section
}

async fn xcode_section(ctx: &ToolCtx, input: &Input) -> Value {
    let candidates = [
        ctx.home.join("Library/Developer/Xcode/DerivedData"),
        ctx.home.join("Library/Developer/Xcode/Archives"),
    ];

    let remove = input.clean_xcode && !input.dry_run;
    let mut entries = Vec::new();
    for dir in candidates {
        if dir.is_dir() {
            entries.push(artifact(ctx, &dir, remove).await);
        }
    }

    if entries.is_empty() {
        json!({ "entries": entries, "note": "no Xcode build artifacts found" })
    } else {
        json!({ "entries": entries })
    }
}

async fn pyenv_section(ctx: &ToolCtx, input: &Input) -> Value {
    let versions_dir = ctx.home.join(".pyenv/versions");
    let mut versions: Vec<String> = match std::fs::read_dir(&versions_dir) {
        Ok(dir) => dir
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => {
            return json!({
                "versions": [],
                "note": "pyenv not found",
            })
        }
    };
    versions.sort();

    // Everything but the newest version counts as removable.
    let old: Vec<String> = if versions.len() > 1 {
        versions[..versions.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    let mut removed = Vec::new();
    if input.clean_pyenv_old_versions && !input.dry_run {
        for version in &old {
            if ctx
                .capture("pyenv", &["uninstall", "-f", version])
                .await
                .is_ok()
            {
                removed.push(version.clone());
            }
        }
    }

    json!({
        "versions": versions,
        "old_versions": old,
        "removed": removed,
    })
}

/// Size + age record for one directory, optionally removing it.
async fn artifact(ctx: &ToolCtx, path: &Path, remove: bool) -> Artifact {
    let size = ctx.dir_size(path).await.ok();
    let age_days = age_days(path);

    let removed = if remove {
        let path_str = path.to_string_lossy().into_owned();
        ctx.capture("rm", &["-rf", &path_str]).await.is_ok()
    } else {
        false
    };

    Artifact {
        path: path.to_string_lossy().into_owned(),
        size,
        age_days,
        removed,
    }
}

fn age_days(path: &Path) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let modified: DateTime<Local> = modified.into();
    Some((Local::now() - modified).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_days_of_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let age = age_days(dir.path()).unwrap();
        assert_eq!(age, 0);
    }
}
