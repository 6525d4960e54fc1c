//! memory_status — vm_stat page counts in GB plus top memory consumers

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;
use crate::units::round2;

/// Apple Silicon page size; vm_stat's own header wins when present.
const DEFAULT_PAGE_SIZE: u64 = 16384;

const TOP_CONSUMERS: usize = 5;

#[derive(Serialize)]
struct Consumer {
    pid: u32,
    mem_percent: f64,
    rss_mb: u64,
    name: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let total_bytes: u64 = ctx
        .capture("sysctl", &["-n", "hw.memsize"])
        .await?
        .trim()
        .parse()
        .unwrap_or(0);

    let vm_out = ctx.capture("vm_stat", &[]).await?;
    let page_size = parse_page_size(&vm_out);

    let pages_free = extract_vm_stat_value(&vm_out, "Pages free").unwrap_or(0);
    let pages_active = extract_vm_stat_value(&vm_out, "Pages active").unwrap_or(0);
    let pages_inactive = extract_vm_stat_value(&vm_out, "Pages inactive").unwrap_or(0);
    let pages_wired = extract_vm_stat_value(&vm_out, "Pages wired down").unwrap_or(0);
    let pages_compressed =
        extract_vm_stat_value(&vm_out, "Pages occupied by compressor").unwrap_or(0);

    let gb = |pages: u64| round2(pages as f64 * page_size as f64 / (1024.0 * 1024.0 * 1024.0));

    // ps -m sorts by resident size
    let ps_out = ctx
        .capture("ps", &["-axm", "-o", "pid=,%mem=,rss=,comm="])
        .await?;
    let mut consumers = parse_consumers(&ps_out);
    consumers.truncate(TOP_CONSUMERS);

    Ok(json!({
        "total_gb": round2(total_bytes as f64 / (1024.0 * 1024.0 * 1024.0)),
        "free_gb": gb(pages_free),
        "active_gb": gb(pages_active),
        "inactive_gb": gb(pages_inactive),
        "wired_gb": gb(pages_wired),
        "compressed_gb": gb(pages_compressed),
        "page_size": page_size,
        "top_consumers": consumers,
    }))
}

/// Header: "Mach Virtual Memory Statistics: (page size of 16384 bytes)"
fn parse_page_size(vm_out: &str) -> u64 {
    vm_out
        .lines()
        .next()
        .and_then(|line| {
            line.split_whitespace()
                .skip_while(|w| *w != "of")
                .nth(1)
                .and_then(|w| w.parse::<u64>().ok())
        })
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Format: "Pages free:     12345."
fn extract_vm_stat_value(text: &str, key: &str) -> Option<u64> {
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(key) {
            let value_str = line.split(':').nth(1)?.trim().trim_end_matches('.');
            return value_str.parse::<u64>().ok();
        }
    }
    None
}

fn parse_consumers(stdout: &str) -> Vec<Consumer> {
    let mut consumers = Vec::new();
    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        let (Some(pid), Some(mem), Some(rss)) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let Ok(pid) = pid.parse::<u32>() else {
            continue;
        };
        let name: String = parts.collect::<Vec<&str>>().join(" ");
        if name.is_empty() {
            continue;
        }

        consumers.push(Consumer {
            pid,
            mem_percent: mem.parse().unwrap_or(0.0),
            rss_mb: rss.parse::<u64>().unwrap_or(0) / 1024,
            name,
        });
    }
    consumers
}

#[cfg(test)]
mod tests {
    use super::*;

    const VM_STAT_SAMPLE: &str = "\
Mach Virtual Memory Statistics: (page size of 16384 bytes)
Pages free:                               78411.
Pages active:                            441843.
Pages inactive:                          432190.
Pages speculative:                         5125.
Pages throttled:                              0.
Pages wired down:                        136180.
Pages purgeable:                           1545.
Pages occupied by compressor:            211563.
";

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size(VM_STAT_SAMPLE), 16384);
        assert_eq!(parse_page_size("no header"), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_extract_vm_stat_value() {
        assert_eq!(
            extract_vm_stat_value(VM_STAT_SAMPLE, "Pages free"),
            Some(78411)
        );
        assert_eq!(
            extract_vm_stat_value(VM_STAT_SAMPLE, "Pages wired down"),
            Some(136180)
        );
        assert_eq!(
            extract_vm_stat_value(VM_STAT_SAMPLE, "Pages occupied by compressor"),
            Some(211563)
        );
        assert_eq!(extract_vm_stat_value(VM_STAT_SAMPLE, "Pages bogus"), None);
    }

    #[test]
    fn test_parse_consumers() {
        let sample = "  412  8.2 1359872 /Applications/Safari.app/Contents/MacOS/Safari\n  77  0.1  8192 logd\n";
        let consumers = parse_consumers(sample);
        assert_eq!(consumers.len(), 2);
        assert_eq!(consumers[0].pid, 412);
        assert_eq!(consumers[0].rss_mb, 1328);
        assert_eq!(consumers[1].name, "logd");
    }
}
