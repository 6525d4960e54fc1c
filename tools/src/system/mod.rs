//! System overview, startup item, and network tools.

pub mod info;
pub mod network;
pub mod startup;

use crate::registry::{ParamSpec, Registry, ToolSpec};

/// Register every system tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(ToolSpec::new(
        "system_info",
        "OS version, model, chip, memory, uptime, disk summary, user, and hostname",
        vec![],
    ));

    reg.register_tool(ToolSpec::new(
        "startup_items",
        "User and system launch agents/daemons plus currently loaded agents",
        vec![ParamSpec::bool(
            "showDisabled",
            false,
            "Also list disabled launch items",
        )],
    ));

    reg.register_tool(ToolSpec::new(
        "network_status",
        "Interfaces, WiFi association, external IP, DNS servers, and connection count",
        vec![],
    ));
}
