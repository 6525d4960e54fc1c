//! system_info — one-record machine summary

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;
use crate::disk::usage::root_stat;
use crate::units::round2;

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let os_version = ctx
        .capture("sw_vers", &["-productVersion"])
        .await
        .context("system_info: sw_vers failed")?
        .trim()
        .to_string();

    let model = ctx
        .capture("sysctl", &["-n", "hw.model"])
        .await?
        .trim()
        .to_string();

    let chip = ctx
        .capture("sysctl", &["-n", "machdep.cpu.brand_string"])
        .await?
        .trim()
        .to_string();

    let memory_bytes: u64 = ctx
        .capture("sysctl", &["-n", "hw.memsize"])
        .await?
        .trim()
        .parse()
        .unwrap_or(0);
    let memory_gb = round2(memory_bytes as f64 / (1024.0 * 1024.0 * 1024.0));

    let uptime_out = ctx.capture("uptime", &[]).await?;
    let uptime = parse_uptime(&uptime_out);

    let disk = root_stat(&ctx).await?;

    let hostname = ctx.capture("hostname", &[]).await?.trim().to_string();

    Ok(json!({
        "os_version": os_version,
        "model": model,
        "chip": chip,
        "memory_gb": memory_gb,
        "uptime": uptime,
        "disk": disk.to_json(),
        "user": ctx.user,
        "hostname": hostname,
    }))
}

/// Extract the "up ..." portion of uptime output.
/// Format: "10:02  up 3 days, 22:08, 2 users, load averages: 1.74 2.06 2.10"
fn parse_uptime(text: &str) -> String {
    let line = text.trim();
    let Some(idx) = line.find("up ") else {
        return line.to_string();
    };
    let rest = &line[idx + 3..];
    let end = rest.find(" user").map(|i| {
        // back up over the ", N" before "users"
        rest[..i].rfind(',').unwrap_or(i)
    });
    match end {
        Some(end) => rest[..end].trim().to_string(),
        None => rest.trim().to_string(),
    }
}
