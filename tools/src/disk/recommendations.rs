//! cleanup_recommendations — threshold checks over the usual space hogs

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::cleanup::{docker, go_cache};
use crate::context::ToolCtx;
use crate::disk::usage::root_stat;
use crate::units;

const DISK_CRITICAL_PERCENT: f64 = 90.0;
const DISK_HIGH_PERCENT: f64 = 80.0;
const GO_CACHE_GB: f64 = 10.0;
const BREW_CACHE_GB: f64 = 5.0;
const TRASH_GB: f64 = 1.0;
const DOCKER_RECLAIMABLE_GB: f64 = 10.0;

#[derive(Serialize)]
struct Recommendation {
    priority: &'static str,
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'static str>,
    detail: String,
}

fn priority_rank(p: &str) -> u8 {
    match p {
        "critical" => 0,
        "high" => 1,
        "medium" => 2,
        _ => 3,
    }
}

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let mut recs: Vec<Recommendation> = Vec::new();

    // Root filesystem fullness. Every other check is advisory; this one
    // is the reason the tool exists, so its failure is reported in-band.
    match root_stat(&ctx).await {
        Ok(stat) => {
            if stat.percent >= DISK_CRITICAL_PERCENT {
                recs.push(Recommendation {
                    priority: "critical",
                    action: "Free disk space immediately".to_string(),
                    command: None,
                    detail: format!(
                        "Root filesystem is {:.0}% full ({} available)",
                        stat.percent,
                        units::human_size(stat.available_kb * 1024)
                    ),
                });
            } else if stat.percent >= DISK_HIGH_PERCENT {
                recs.push(Recommendation {
                    priority: "high",
                    action: "Plan a cleanup soon".to_string(),
                    command: None,
                    detail: format!("Root filesystem is {:.0}% full", stat.percent),
                });
            }
        }
        Err(e) => {
            return Ok(json!({
                "error": e.to_string(),
                "note": "could not read root filesystem usage",
            }))
        }
    }

    if let Ok(path) = go_cache::cache_path(&ctx).await {
        if let Ok(size) = ctx.dir_size(std::path::Path::new(&path)).await {
            if units::size_to_gb(&size).unwrap_or(0.0) > GO_CACHE_GB {
                recs.push(Recommendation {
                    priority: "high",
                    action: format!("Clear the Go build cache ({size})"),
                    command: Some("go clean -cache"),
                    detail: format!("{path} is larger than {GO_CACHE_GB:.0} GB"),
                });
            }
        }
    }

    let brew_cache = ctx.home.join("Library/Caches/Homebrew");
    if let Ok(size) = ctx.dir_size(&brew_cache).await {
        if units::size_to_gb(&size).unwrap_or(0.0) > BREW_CACHE_GB {
            recs.push(Recommendation {
                priority: "medium",
                action: format!("Clear the Homebrew cache ({size})"),
                command: Some("brew cleanup -s --prune=all"),
                detail: format!("{} is larger than {BREW_CACHE_GB:.0} GB", brew_cache.display()),
            });
        }
    }

    let trash = ctx.trash_dir();
    if let Ok(size) = ctx.dir_size(&trash).await {
        if units::size_to_gb(&size).unwrap_or(0.0) > TRASH_GB {
            recs.push(Recommendation {
                priority: "medium",
                action: format!("Empty the trash ({size})"),
                command: None,
                detail: format!("{} is larger than {TRASH_GB:.0} GB", trash.display()),
            });
        }
    }

    if let Ok(out) = ctx.capture("docker", &["system", "df"]).await {
        let reclaimable = docker::reclaimable_gb(&docker::parse_system_df(&out));
        if reclaimable > DOCKER_RECLAIMABLE_GB {
            recs.push(Recommendation {
                priority: "high",
                action: format!("Prune unused Docker resources ({reclaimable:.1} GB reclaimable)"),
                command: Some("docker system prune -f"),
                detail: format!("Docker reports more than {DOCKER_RECLAIMABLE_GB:.0} GB reclaimable"),
            });
        }
    }

    recs.sort_by_key(|r| priority_rank(r.priority));

    let summary = if recs.is_empty() {
        "No cleanup needed right now".to_string()
    } else {
        format!("{} recommended action(s)", recs.len())
    };

    Ok(json!({
        "summary": summary,
        "recommendations": recs,
    }))
}
