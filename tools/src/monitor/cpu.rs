//! cpu_usage — load averages, aggregate CPU usage, and top processes

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    top_n: usize,
}

#[derive(Serialize)]
struct ProcessEntry {
    pid: u32,
    cpu: f64,
    memory: f64,
    name: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("cpu_usage: invalid input")?;

    let load_raw = ctx.capture("sysctl", &["-n", "vm.loadavg"]).await?;
    let load_avg = parse_load_avg(&load_raw);

    let logical = ctx
        .capture("sysctl", &["-n", "hw.ncpu"])
        .await?
        .trim()
        .parse::<u32>()
        .unwrap_or(1);
    let physical = ctx
        .capture("sysctl", &["-n", "hw.physicalcpu"])
        .await?
        .trim()
        .parse::<u32>()
        .unwrap_or(logical);

    // top in snapshot mode prints a header with aggregate CPU usage
    let top_out = ctx.capture("top", &["-l", "1", "-n", "0"]).await?;
    let usage = parse_cpu_usage(&top_out);

    let ps_out = ctx
        .capture("ps", &["-Aro", "pid=,%cpu=,%mem=,comm="])
        .await?;
    let mut top_processes = parse_ps(&ps_out);
    top_processes.truncate(input.top_n);

    Ok(json!({
        "load_avg": load_avg,
        "logical_cores": logical,
        "physical_cores": physical,
        "cpu_percent": usage,
        "top_processes": top_processes,
    }))
}

/// macOS sysctl vm.loadavg format: "{ 1.23 2.34 3.45 }"
fn parse_load_avg(s: &str) -> [f64; 3] {
    let cleaned = s.trim().trim_start_matches('{').trim_end_matches('}');
    let parts: Vec<f64> = cleaned
        .split_whitespace()
        .filter_map(|p| p.parse::<f64>().ok())
        .collect();

    [
        parts.first().copied().unwrap_or(0.0),
        parts.get(1).copied().unwrap_or(0.0),
        parts.get(2).copied().unwrap_or(0.0),
    ]
}

/// Parse "CPU usage: X.X% user, Y.Y% sys, Z.Z% idle" from top output.
fn parse_cpu_usage(top_output: &str) -> Value {
    let mut user = 0.0_f64;
    let mut sys = 0.0_f64;
    let mut idle = 0.0_f64;

    for line in top_output.lines() {
        if !line.contains("CPU usage:") {
            continue;
        }
        for part in line.split(',') {
            let part = part.trim();
            let value = part
                .split_whitespace()
                .find_map(|w| w.trim_end_matches('%').parse::<f64>().ok())
                .unwrap_or(0.0);
            if part.contains("user") {
                user = value;
            } else if part.contains("sys") {
                sys = value;
            } else if part.contains("idle") {
                idle = value;
            }
        }
    }

    json!({
        "user": user,
        "system": sys,
        "idle": idle,
        "total": user + sys,
    })
}

/// Parse `ps -Aro pid=,%cpu=,%mem=,comm=` rows; comm may contain spaces.
fn parse_ps(stdout: &str) -> Vec<ProcessEntry> {
    let mut processes = Vec::new();
    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        let (Some(pid), Some(cpu), Some(mem)) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let Ok(pid) = pid.parse::<u32>() else {
            continue;
        };
        let name: String = parts.collect::<Vec<&str>>().join(" ");
        if name.is_empty() {
            continue;
        }

        processes.push(ProcessEntry {
            pid,
            cpu: cpu.parse().unwrap_or(0.0),
            memory: mem.parse().unwrap_or(0.0),
            name,
        });
    }
    processes
}
