//! Shared test support: a scripted command runner and context builder.
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use macops_tools::{CommandOutput, CommandRunner, Config, ExecError, ToolCtx};

/// Scripted stand-in for the real command runner. Commands are matched
/// by exact command line or by prefix (first scripted entry wins);
/// anything unscripted behaves like a missing binary.
pub struct FakeRunner {
    scripts: Mutex<Vec<(String, CommandOutput)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script a successful command.
    pub fn ok(&self, cmdline: &str, stdout: &str) -> &Self {
        self.scripts.lock().unwrap().push((
            cmdline.to_string(),
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                status: 0,
            },
        ));
        self
    }

    /// Script a command that exits non-zero.
    pub fn fail(&self, cmdline: &str, stderr: &str) -> &Self {
        self.scripts.lock().unwrap().push((
            cmdline.to_string(),
            CommandOutput {
                stdout: String::new(),
                stderr: stderr.to_string(),
                status: 1,
            },
        ));
        self
    }

    /// Every command line issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines that would have changed machine state.
    pub fn destructive_calls(&self) -> Vec<String> {
        const DESTRUCTIVE: &[&str] = &[
            "rm ",
            "go clean",
            "brew cleanup",
            "npm cache clean",
            "pip3 cache purge",
            "docker system prune",
            "pyenv uninstall",
        ];
        self.calls()
            .into_iter()
            .filter(|c| DESTRUCTIVE.iter().any(|d| c.starts_with(d)))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        let cmdline = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        self.calls.lock().unwrap().push(cmdline.clone());

        let scripts = self.scripts.lock().unwrap();
        for (key, output) in scripts.iter() {
            if cmdline == *key || cmdline.starts_with(&format!("{key} ")) {
                return Ok(output.clone());
            }
        }

        Err(ExecError::Spawn {
            program: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "command not found"),
        })
    }
}

/// Context with a fake home directory and a scripted runner.
pub fn test_ctx(home: &Path, runner: Arc<FakeRunner>) -> Arc<ToolCtx> {
    Arc::new(ToolCtx::new(
        home.to_path_buf(),
        "tester".to_string(),
        Config::default(),
        runner,
    ))
}

pub const DF_SAMPLE: &str = "\
Filesystem    1024-blocks      Used Available Capacity iused     ifree %iused  Mounted on\n\
/dev/disk3s1s1  971350180 850123456  98765432    90%  404229 987654321    0%   /\n";

pub const DOCKER_DF_SAMPLE: &str = "\
TYPE            TOTAL     ACTIVE    SIZE      RECLAIMABLE\n\
Images          12        3         18.42GB   14.2GB (77%)\n\
Containers      5         2         120.3MB   80MB (66%)\n\
Local Volumes   8         1         6.5GB     6.1GB (93%)\n\
Build Cache     142       0         9.8GB     9.8GB\n";
