//! disk_usage — depth-limited size breakdown plus the root filesystem line

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;
use crate::units;

#[derive(Deserialize)]
struct Input {
    path: String,
    depth: u32,
}

#[derive(Serialize)]
struct Entry {
    size: String,
    path: String,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("disk_usage: invalid input")?;

    let path = if input.path.is_empty() {
        ctx.home.clone()
    } else {
        ctx.expand_home(&input.path)
    };
    let path_str = path.to_string_lossy().into_owned();
    let depth = input.depth.to_string();

    // du exits non-zero when it hits unreadable subdirectories but
    // still reports everything it could size.
    let out = ctx.run("du", &["-h", "-d", &depth, &path_str]).await?;
    if out.stdout.is_empty() && !out.success() {
        anyhow::bail!("du failed for {}: {}", path_str, out.stderr.trim());
    }

    let mut entries = parse_du(&out.stdout);
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    let entries: Vec<Entry> = entries
        .into_iter()
        .map(|(_, size, path)| Entry { size, path })
        .collect();

    let root = root_stat(&ctx).await?;

    Ok(json!({
        "path": path_str,
        "entries": entries,
        "root": root.to_json(),
    }))
}

/// Parse `du -h` output: one "SIZE<tab>PATH" line per directory.
/// Returns (bytes, size, path) so callers can sort by real size.
pub(crate) fn parse_du(text: &str) -> Vec<(u64, String, String)> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim_start();
        let mut parts = line.splitn(2, |c: char| c.is_whitespace());
        let size = match parts.next() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => continue,
        };
        let path = match parts.next() {
            Some(p) => p.trim().to_string(),
            None => continue,
        };
        let bytes = units::parse_size(&size).unwrap_or(0);
        entries.push((bytes, size, path));
    }
    entries
}

/// Root filesystem figures from `df -k /`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DfStat {
    pub total_kb: u64,
    pub used_kb: u64,
    pub available_kb: u64,
    pub percent: f64,
}

impl DfStat {
    pub(crate) fn to_json(&self) -> Value {
        json!({
            "filesystem_size": units::human_size(self.total_kb * 1024),
            "used": units::human_size(self.used_kb * 1024),
            "available": units::human_size(self.available_kb * 1024),
            "capacity_percent": self.percent,
        })
    }
}

pub(crate) async fn root_stat(ctx: &ToolCtx) -> Result<DfStat> {
    let out = ctx.capture("df", &["-k", "/"]).await?;
    parse_df_k(&out).context("unexpected df output for /")
}

/// Parse the first data line of `df -k` output.
/// Format: Filesystem 1024-blocks Used Available Capacity ... Mounted
pub(crate) fn parse_df_k(text: &str) -> Option<DfStat> {
    let line = text.lines().nth(1)?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }

    Some(DfStat {
        total_kb: parts[1].parse().ok()?,
        used_kb: parts[2].parse().ok()?,
        available_kb: parts[3].parse().ok()?,
        percent: parts[4].trim_end_matches('%').parse().unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DU_SAMPLE: &str = "\
4.2G\t/Users/dev/Library/Caches\n\
 12K\t/Users/dev/Library/Preferences\n\
736M\t/Users/dev/Library/Application Support\n\
5.1G\t/Users/dev/Library\n";

    const DF_SAMPLE: &str = "\
Filesystem    1024-blocks      Used Available Capacity iused     ifree %iused  Mounted on\n\
/dev/disk3s1s1  971350180 850123456  98765432    90%  404229 987654321    0%   /\n";

    #[test]
    fn test_parse_du_handles_spaces_in_paths() {
        let entries = parse_du(DU_SAMPLE);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].2, "/Users/dev/Library/Application Support");
        assert_eq!(entries[2].1, "736M");
    }

    #[test]
    fn test_parse_du_sorts_by_bytes() {
        let mut entries = parse_du(DU_SAMPLE);
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        assert_eq!(entries[0].1, "5.1G");
        assert_eq!(entries[3].1, "12K");
    }

    #[test]
    fn test_parse_df_k() {
        let stat = parse_df_k(DF_SAMPLE).unwrap();
        assert_eq!(stat.total_kb, 971350180);
        assert_eq!(stat.available_kb, 98765432);
        assert_eq!(stat.percent, 90.0);
    }

    #[test]
    fn test_parse_df_k_rejects_short_output() {
        assert!(parse_df_k("Filesystem\n").is_none());
        assert!(parse_df_k("").is_none());
    }
}
