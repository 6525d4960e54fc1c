//! thermal_status — throttling state from pmset, best-effort temperature

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let out = ctx
        .capture("pmset", &["-g", "therm"])
        .await
        .context("thermal_status: pmset failed")?;

    let speed_limit = therm_value(&out, "CPU_Speed_Limit");
    let available_cpus = therm_value(&out, "CPU_Available_CPUs");
    let scheduler_limit = therm_value(&out, "CPU_Scheduler_Limit");

    let throttled = speed_limit.map(|v| v < 100);

    // Temperature needs a third-party helper; absence is not an error.
    let (temperature, note) = match ctx.capture("osx-cpu-temp", &[]).await {
        Ok(out) => (Some(out.trim().to_string()), None),
        Err(_) => (
            None,
            Some("temperature reading requires osx-cpu-temp to be installed"),
        ),
    };

    let mut result = json!({
        "throttled": throttled,
        "cpu_speed_limit": speed_limit,
        "available_cpus": available_cpus,
        "scheduler_limit": scheduler_limit,
        "temperature": temperature,
    });
    if let Some(note) = note {
        result["note"] = json!(note);
    }
    Ok(result)
}

/// Parse "KEY \t= 100" lines from `pmset -g therm`.
fn therm_value(text: &str, key: &str) -> Option<i64> {
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(key) {
            return line.split('=').nth(1)?.trim().parse().ok();
        }
    }
    None
}
