//! battery_health — cycle count, condition, and capacity thresholds

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;

const DEGRADED_PERCENT: u32 = 80;
const WEAR_PERCENT: u32 = 90;

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let out = ctx
        .capture("system_profiler", &["SPPowerDataType"])
        .await
        .context("battery_health: system_profiler failed")?;

    let cycle_count = field(&out, "Cycle Count").and_then(|v| v.parse::<u32>().ok());
    let Some(cycle_count) = cycle_count else {
        return Ok(json!({
            "error": "No battery information found",
            "note": "This Mac may not have a battery",
        }));
    };

    let condition = field(&out, "Condition").unwrap_or_else(|| "Unknown".to_string());
    let max_capacity = field(&out, "Maximum Capacity")
        .and_then(|v| v.trim_end_matches('%').parse::<u32>().ok())
        .unwrap_or(100);
    let charge = field(&out, "State of Charge (%)").and_then(|v| v.parse::<u32>().ok());
    let charging = field(&out, "Charging").map(|v| v == "Yes");

    Ok(json!({
        "cycle_count": cycle_count,
        "condition": condition,
        "max_capacity_percent": max_capacity,
        "charge_percent": charge,
        "charging": charging,
        "health": health_note(max_capacity),
    }))
}

fn health_note(max_capacity: u32) -> String {
    if max_capacity < DEGRADED_PERCENT {
        format!(
            "Battery is degraded ({max_capacity}% of design capacity); consider a battery service"
        )
    } else if max_capacity < WEAR_PERCENT {
        format!("Battery shows some wear ({max_capacity}% of design capacity)")
    } else {
        format!("Battery health is good ({max_capacity}% of design capacity)")
    }
}

/// Value of a "Key: value" line in system_profiler output.
fn field(text: &str, key: &str) -> Option<String> {
    let prefix = format!("{key}:");
    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(&prefix) {
            return Some(rest.trim().to_string());
        }
    }
    None
}
