//! kill_process — send a termination signal by pid or name

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::ToolCtx;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Input {
    pid: Option<i32>,
    name: Option<String>,
    force: bool,
}

pub async fn execute(ctx: Arc<ToolCtx>, input: Value) -> Result<Value> {
    let input: Input = serde_json::from_value(input).context("kill_process: invalid input")?;

    let pid = match (input.pid, &input.name) {
        (None, None) => {
            return Ok(json!({
                "success": false,
                "error": "Must provide either pid or name",
            }))
        }
        (Some(pid), _) => pid,
        (None, Some(name)) => match first_pid_by_name(&ctx, name).await {
            Some(pid) => pid,
            None => {
                return Ok(json!({
                    "success": false,
                    "error": format!("No process found matching '{name}'"),
                }))
            }
        },
    };

    let signal = if input.force {
        nix::sys::signal::Signal::SIGKILL
    } else {
        nix::sys::signal::Signal::SIGTERM
    };

    match nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), signal) {
        Ok(()) => Ok(json!({
            "success": true,
            "pid": pid,
            "signal": signal as i32,
        })),
        Err(nix::errno::Errno::ESRCH) => Ok(json!({
            "success": false,
            "error": format!("No such process: {pid}"),
        })),
        Err(nix::errno::Errno::EPERM) => Ok(json!({
            "success": false,
            "error": format!("Permission denied signalling pid {pid}"),
        })),
        Err(e) => Ok(json!({
            "success": false,
            "error": format!("Failed to signal pid {pid}: {e}"),
        })),
    }
}

/// First pid whose executable name matches exactly, via pgrep.
async fn first_pid_by_name(ctx: &ToolCtx, name: &str) -> Option<i32> {
    let out = ctx.capture("pgrep", &["-x", name]).await.ok()?;
    out.lines().next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::exec::{CommandOutput, CommandRunner, ExecError};
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// Runner that fails the test if anything shells out.
    struct PanicRunner;

    #[async_trait]
    impl CommandRunner for PanicRunner {
        async fn run(&self, program: &str, _args: &[&str]) -> Result<CommandOutput, ExecError> {
            panic!("unexpected external command: {program}");
        }
    }

    fn ctx() -> Arc<ToolCtx> {
        Arc::new(ToolCtx::new(
            PathBuf::from("/tmp"),
            "tester".to_string(),
            Config::default(),
            Arc::new(PanicRunner),
        ))
    }

    #[tokio::test]
    async fn test_requires_pid_or_name_without_signalling() {
        let result = execute(ctx(), json!({ "force": false })).await.unwrap();
        assert_eq!(result["success"], false);
        assert_eq!(result["error"], "Must provide either pid or name");
    }
}
