//! go_cache_status — Go build cache location, size, and recommendation

use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::context::ToolCtx;
use crate::units;

const CRITICAL_GB: f64 = 20.0;
const WARNING_GB: f64 = 10.0;

pub async fn execute(ctx: Arc<ToolCtx>, _input: Value) -> Result<Value> {
    let path = match cache_path(&ctx).await {
        Ok(path) => path,
        Err(e) => {
            return Ok(json!({
                "error": e.to_string(),
                "note": "Go toolchain may not be installed",
            }))
        }
    };

    let size = ctx.dir_size(Path::new(&path)).await?;
    let gb = units::size_to_gb(&size).unwrap_or(0.0);

    Ok(json!({
        "path": path,
        "size": size,
        "recommendation": recommendation(gb),
    }))
}

/// Resolve GOCACHE via the Go toolchain itself.
pub(crate) async fn cache_path(ctx: &ToolCtx) -> Result<String> {
    let out = ctx.capture("go", &["env", "GOCACHE"]).await?;
    let path = out.trim().to_string();
    if path.is_empty() {
        anyhow::bail!("go env GOCACHE returned nothing");
    }
    Ok(path)
}

fn recommendation(gb: f64) -> String {
    if gb > CRITICAL_GB {
        format!("CRITICAL: Go build cache is {gb:.1} GB; run `go clean -cache` to reclaim space")
    } else if gb > WARNING_GB {
        format!("Warning: Go build cache is {gb:.1} GB and worth trimming")
    } else {
        "Cache size is reasonable".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_critical_above_20gb() {
        let rec = recommendation(units::size_to_gb("25G").unwrap());
        assert!(rec.contains("CRITICAL"), "got: {rec}");
    }

    #[test]
    fn test_recommendation_warning_between_10_and_20gb() {
        let rec = recommendation(12.0);
        assert!(rec.contains("Warning"), "got: {rec}");
    }

    #[test]
    fn test_recommendation_reasonable_below_10gb() {
        let rec = recommendation(units::size_to_gb("5G").unwrap());
        assert!(rec.contains("reasonable"), "got: {rec}");
    }
}
