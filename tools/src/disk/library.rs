//! analyze_library — size breakdown of the usual ~/Library suspects

use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::ToolCtx;
use crate::disk::usage::parse_du;

/// Fixed subdirectories reported in the breakdown.
const LIBRARY_SUBDIRS: &[&str] = &[
    "Caches",
    "Application Support",
    "Developer",
    "Containers",
    "Group Containers",
    "Logs",
    "Mobile Documents",
];

/// Caches that routinely grow to multiple gigabytes.
const KNOWN_HEAVY_CACHES: &[&str] = &[
    "Library/Caches/Homebrew",
    "Library/Caches/pip",
    "Library/Caches/Google",
    "Library/Caches/com.spotify.client",
    "Library/Caches/com.apple.dt.Xcode",
    "Library/Developer/Xcode/DerivedData",
    "Library/Developer/Xcode/Archives",
    "Library/Developer/CoreSimulator/Caches",
];

const TOP_CACHE_FOLDERS: usize = 20;

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let library = ctx.home.join("Library");
    if !library.is_dir() {
        return Ok(json!({
            "error": format!("{} does not exist", library.display()),
        }));
    }

    let subdirs: Vec<PathBuf> = LIBRARY_SUBDIRS
        .iter()
        .map(|s| library.join(s))
        .filter(|p| p.is_dir())
        .collect();
    let breakdown = sized_entries(&ctx, &subdirs).await;

    // Every direct child of ~/Library/Caches, largest first.
    let mut cache_dirs: Vec<PathBuf> = match std::fs::read_dir(library.join("Caches")) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => Vec::new(),
    };
    cache_dirs.sort();
    let mut largest = sized_entries_with_bytes(&ctx, &cache_dirs).await;
    largest.sort_by(|a, b| b.0.cmp(&a.0));
    largest.truncate(TOP_CACHE_FOLDERS);
    let largest: Vec<Value> = largest.into_iter().map(|(_, v)| v).collect();

    let known: Vec<PathBuf> = KNOWN_HEAVY_CACHES
        .iter()
        .map(|s| ctx.home.join(s))
        .filter(|p| p.is_dir())
        .collect();
    let known = sized_entries(&ctx, &known).await;

    Ok(json!({
        "library_breakdown": breakdown,
        "largest_caches": largest,
        "known_heavy_caches": known,
    }))
}

async fn sized_entries(ctx: &ToolCtx, paths: &[PathBuf]) -> Vec<Value> {
    sized_entries_with_bytes(ctx, paths)
        .await
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

/// One `du -sh` call over all paths; unreadable entries are simply
/// absent from the output.
async fn sized_entries_with_bytes(ctx: &ToolCtx, paths: &[PathBuf]) -> Vec<(u64, Value)> {
    if paths.is_empty() {
        return Vec::new();
    }

    let owned: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let mut args: Vec<&str> = vec!["-sh"];
    args.extend(owned.iter().map(|s| s.as_str()));

    match ctx.run("du", &args).await {
        Ok(out) => parse_du(&out.stdout)
            .into_iter()
            .map(|(bytes, size, path)| (bytes, json!({ "size": size, "path": path })))
            .collect(),
        Err(_) => Vec::new(),
    }
}
