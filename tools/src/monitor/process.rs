//! process_list — sorted, filtered process table

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    sort_by: String,
    limit: usize,
    filter: Option<String>,
}

#[derive(Serialize)]
struct ProcessEntry {
    pid: u32,
    cpu: f64,
    memory: f64,
    status: String,
    name: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("process_list: invalid input")?;

    let out = ctx
        .capture("ps", &["-Ao", "pid=,%cpu=,%mem=,state=,comm="])
        .await?;
    let mut processes = parse_ps(&out);

    if let Some(filter) = &input.filter {
        let needle = filter.to_lowercase();
        processes.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    sort_processes(&mut processes, &input.sort_by);
    processes.truncate(input.limit);

    Ok(json!({
        "count": processes.len(),
        "processes": processes,
    }))
}

fn sort_processes(processes: &mut [ProcessEntry], sort_by: &str) {
    match sort_by {
        "memory" => processes.sort_by(|a, b| {
            b.memory
                .partial_cmp(&a.memory)
                .unwrap_or(Ordering::Equal)
        }),
        "name" => processes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        _ => processes
            .sort_by(|a, b| b.cpu.partial_cmp(&a.cpu).unwrap_or(Ordering::Equal)),
    }
}

fn parse_ps(stdout: &str) -> Vec<ProcessEntry> {
    let mut processes = Vec::new();
    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        let (Some(pid), Some(cpu), Some(mem), Some(state)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
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
            status: map_state(state),
            name,
        });
    }
    processes
}

/// Map macOS process state codes to human-readable strings.
fn map_state(raw: &str) -> String {
    match raw.chars().next() {
        Some('R') => "running".to_string(),
        Some('S') => "sleeping".to_string(),
        Some('I') => "idle".to_string(),
        Some('T') => "stopped".to_string(),
        Some('U') => "uninterruptible".to_string(),
        Some('Z') => "zombie".to_string(),
        _ => raw.to_string(),
    }
}
