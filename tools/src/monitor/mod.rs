//! Resource monitoring and process tools.

pub mod cpu;
pub mod kill;
pub mod memory;
pub mod process;

use crate::registry::{ParamSpec, Registry, ToolSpec};

/// Sort orders accepted by process_list.
pub const PROCESS_SORT_KEYS: &[&str] = &["cpu", "memory", "name"];

/// Register every monitor tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(ToolSpec::new(
        "cpu_usage",
        "Load averages, aggregate CPU usage, core counts, and top processes by CPU",
        vec![ParamSpec::number(
            "topN",
            Some(10),
            "How many processes to report",
        )],
    ));

    reg.register_tool(ToolSpec::new(
        "memory_status",
        "Virtual-memory statistics in GB plus the top memory consumers",
        vec![],
    ));

    reg.register_tool(ToolSpec::new(
        "process_list",
        "Sorted, filtered process table",
        vec![
            ParamSpec::string_enum("sortBy", PROCESS_SORT_KEYS, "cpu", "Sort column"),
            ParamSpec::number("limit", Some(20), "Maximum rows to return"),
            ParamSpec::string("filter", None, "Case-insensitive substring match on the name"),
        ],
    ));

    reg.register_tool(ToolSpec::new(
        "kill_process",
        "Send a termination signal by pid or first name match (SIGTERM, SIGKILL when forced)",
        vec![
            ParamSpec::number("pid", None, "Process id to signal"),
            ParamSpec::string("name", None, "Process name to look up when no pid is given"),
            ParamSpec::bool("force", false, "Use SIGKILL instead of SIGTERM"),
        ],
    ));
}
