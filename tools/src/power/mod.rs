//! Power and thermal tools.

pub mod battery;
pub mod thermal;

use crate::registry::{Registry, ToolSpec};

/// Register every power tool with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(ToolSpec::new(
        "thermal_status",
        "Thermal throttling state and a best-effort temperature reading",
        vec![],
    ));

    reg.register_tool(ToolSpec::new(
        "battery_health",
        "Battery cycle count, condition, capacity, and a health note",
        vec![],
    ));
}
