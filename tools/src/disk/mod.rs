//! Disk inspection tools — usage breakdown, Library analysis, and
//! cleanup recommendations.
//!
//! Each submodule exposes `pub async fn execute(ctx, input) -> Result<Value>`
//! which deserialises JSON input, shells out through the context runner,
//! and returns JSON output.

pub mod library;
pub mod recommendations;
pub mod usage;

use crate::registry::{ParamSpec, Registry, ToolSpec};

/// Register every disk tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(ToolSpec::new(
        "disk_usage",
        "Depth-limited size breakdown of a path plus root filesystem usage",
        vec![
            ParamSpec::string("path", Some("~"), "Directory to analyze"),
            ParamSpec::number("depth", Some(1), "How many directory levels to break down"),
        ],
    ));

    reg.register_tool(ToolSpec::new(
        "analyze_library",
        "Sizes of well-known ~/Library subdirectories and the largest cache folders",
        vec![],
    ));

    reg.register_tool(ToolSpec::new(
        "cleanup_recommendations",
        "Evaluate disk, cache, trash, and Docker usage against thresholds and suggest actions",
        vec![],
    ));
}
