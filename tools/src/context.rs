//! Per-process environment context threaded into every handler.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::exec::{CommandOutput, CommandRunner, ExecError, SystemRunner};
use crate::units;

/// Environment context: home directory, user, configuration, and the
/// command runner every handler shells out through.
pub struct ToolCtx {
    pub home: PathBuf,
    pub user: String,
    pub config: Config,
    runner: Arc<dyn CommandRunner>,
}

impl ToolCtx {
    pub fn new(home: PathBuf, user: String, config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            home,
            user,
            config,
            runner,
        }
    }

    /// Context for the real machine: home from the OS, a live runner.
    pub fn system(config: Config) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
        let runner = Arc::new(SystemRunner::new(Duration::from_secs(
            config.exec.command_timeout_seconds,
        )));
        Ok(Self::new(home, user, config, runner))
    }

    /// Run a command, returning its output whatever the exit status.
    pub async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        self.runner.run(program, args).await
    }

    /// Run a command and return stdout, failing on non-zero exit.
    pub async fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let out = self.runner.run(program, args).await?;
        if !out.success() {
            return Err(anyhow!(
                "{} {} failed: {}",
                program,
                args.join(" "),
                out.stderr.trim()
            ));
        }
        Ok(out.stdout)
    }

    /// Human-readable size of a directory via `du -sh`.
    ///
    /// du exits non-zero when a subdirectory is unreadable but still
    /// reports a total, so the exit status is ignored when output exists.
    pub async fn dir_size(&self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy();
        let out = self.run("du", &["-sh", &path_str]).await?;
        units::first_du_field(&out.stdout)
            .ok_or_else(|| anyhow!("unexpected du output for {}", path.display()))
    }

    /// Expand a leading `~` to the context home directory.
    pub fn expand_home(&self, path: &str) -> PathBuf {
        if path == "~" {
            self.home.clone()
        } else if let Some(rest) = path.strip_prefix("~/") {
            self.home.join(rest)
        } else {
            PathBuf::from(path)
        }
    }

    /// Trash directory: the configured override or `~/.Trash`.
    pub fn trash_dir(&self) -> PathBuf {
        match &self.config.paths.trash_dir {
            Some(dir) => self.expand_home(dir),
            None => self.home.join(".Trash"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ToolCtx {
        ToolCtx::new(
            PathBuf::from("/Users/tester"),
            "tester".to_string(),
            Config::default(),
            Arc::new(SystemRunner::new(Duration::from_secs(1))),
        )
    }

    #[test]
    fn test_expand_home() {
        let ctx = ctx();
        assert_eq!(ctx.expand_home("~"), PathBuf::from("/Users/tester"));
        assert_eq!(
            ctx.expand_home("~/Library"),
            PathBuf::from("/Users/tester/Library")
        );
        assert_eq!(ctx.expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_trash_dir_default_and_override() {
        let mut ctx = ctx();
        assert_eq!(ctx.trash_dir(), PathBuf::from("/Users/tester/.Trash"));

        ctx.config.paths.trash_dir = Some("~/CustomTrash".to_string());
        assert_eq!(ctx.trash_dir(), PathBuf::from("/Users/tester/CustomTrash"));
    }
}
