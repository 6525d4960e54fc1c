//! Cache and trash cleanup tools, plus the full cleanup workflow.
//!
//! Destructive actions always go through the context runner, are never
//! retried, and each step is isolated: a missing facility yields a
//! `skipped` record instead of aborting the caller.

pub mod caches;
pub mod developer;
pub mod docker;
pub mod go_cache;
pub mod trash;
pub mod workflow;

use serde::Serialize;

use crate::registry::{ParamSpec, Registry, ToolSpec};

/// Cache targets accepted by cleanup_caches.
pub const CACHE_TARGETS: &[&str] = &["go", "brew", "npm", "pip", "chrome", "spotify", "all"];

/// Outcome of one cleanup action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    #[serde(rename = "cleaned")]
    Cleaned,
    #[serde(rename = "would clean")]
    WouldClean,
    #[serde(rename = "skipped")]
    Skipped,
}

/// One cleanup step record, emitted in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Step {
    pub fn cleaned(name: &str, size: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            size,
            status: StepStatus::Cleaned,
            detail: None,
            error: None,
        }
    }

    pub fn would_clean(name: &str, size: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            size,
            status: StepStatus::WouldClean,
            detail: None,
            error: None,
        }
    }

    pub fn skipped(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            size: None,
            status: StepStatus::Skipped,
            detail: None,
            error: Some(error),
        }
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Register every cleanup tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(ToolSpec::new(
        "go_cache_status",
        "Locate the Go build cache, measure it, and recommend action",
        vec![],
    ));

    reg.register_tool(ToolSpec::new(
        "cleanup_caches",
        "Report or purge developer and application caches, per target",
        vec![
            ParamSpec::enum_array("targets", CACHE_TARGETS, &["all"], "Caches to act on"),
            ParamSpec::bool("dryRun", false, "Report sizes without deleting anything"),
        ],
    ));

    reg.register_tool(ToolSpec::new(
        "cleanup_docker",
        "Report Docker disk usage; optionally prune unused images and containers",
        vec![
            ParamSpec::bool("includeVolumes", false, "Also prune unused volumes"),
            ParamSpec::bool("dryRun", false, "Report usage without pruning"),
        ],
    ));

    reg.register_tool(ToolSpec::new(
        "empty_trash",
        "Report or purge the trash directory",
        vec![ParamSpec::bool(
            "dryRun",
            false,
            "Report contents without deleting",
        )],
    ));

    reg.register_tool(ToolSpec::new(
        "developer_cleanup",
        "Find node_modules, Xcode, and pyenv leftovers; optionally remove them",
        vec![
            ParamSpec::bool("cleanNodeModules", false, "Delete discovered node_modules"),
            ParamSpec::bool("cleanXcode", false, "Delete Xcode DerivedData and Archives"),
            ParamSpec::bool(
                "cleanPyenvOldVersions",
                false,
                "Uninstall all but the newest pyenv version",
            ),
            ParamSpec::bool("dryRun", true, "Discovery and size reporting only"),
        ],
    ));

    reg.register_tool(ToolSpec::new(
        "full_cleanup_workflow",
        "Run every cleanup step in order with per-step fault isolation",
        vec![
            ParamSpec::bool("includeDocker", false, "Also prune Docker resources"),
            ParamSpec::bool(
                "includeDockerVolumes",
                false,
                "Also prune Docker volumes (requires includeDocker)",
            ),
            ParamSpec::bool("dryRun", false, "Report what would be cleaned"),
        ],
    ));
}
