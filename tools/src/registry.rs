//! Tool Registry — stores and retrieves tool descriptors

use serde_json::{json, Map, Value};
use tracing::debug;

/// Declared type of one tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Bool,
    /// String restricted to a fixed set of values.
    StringEnum(&'static [&'static str]),
    /// Array of strings, each restricted to a fixed set of values.
    EnumArray(&'static [&'static str]),
}

impl ParamKind {
    fn json_type(&self) -> &'static str {
        match self {
            ParamKind::String | ParamKind::StringEnum(_) => "string",
            ParamKind::Number => "number",
            ParamKind::Bool => "boolean",
            ParamKind::EnumArray(_) => "array",
        }
    }
}

/// One declared parameter: the single source of truth for its type,
/// default, and allowed values. Handlers never re-implement defaulting.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn string(name: &'static str, default: Option<&str>, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::String,
            default: default.map(|d| json!(d)),
            description,
        }
    }

    pub fn number(name: &'static str, default: Option<i64>, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Number,
            default: default.map(|d| json!(d)),
            description,
        }
    }

    pub fn bool(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Bool,
            default: Some(json!(default)),
            description,
        }
    }

    pub fn string_enum(
        name: &'static str,
        allowed: &'static [&'static str],
        default: &str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::StringEnum(allowed),
            default: Some(json!(default)),
            description,
        }
    }

    pub fn enum_array(
        name: &'static str,
        allowed: &'static [&'static str],
        default: &[&str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::EnumArray(allowed),
            default: Some(json!(default)),
            description,
        }
    }
}

/// Immutable tool descriptor, created at process start.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(name: &'static str, description: &'static str, params: Vec<ParamSpec>) -> Self {
        Self {
            name,
            description,
            params,
        }
    }

    /// Discovery form: `{name, description, inputSchema}` with a
    /// JSON-Schema-shaped parameter object.
    pub fn descriptor_json(&self) -> Value {
        let mut properties = Map::new();
        for p in &self.params {
            let mut prop = Map::new();
            prop.insert("type".into(), json!(p.kind.json_type()));
            prop.insert("description".into(), json!(p.description));
            match p.kind {
                ParamKind::StringEnum(allowed) => {
                    prop.insert("enum".into(), json!(allowed));
                }
                ParamKind::EnumArray(allowed) => {
                    prop.insert("items".into(), json!({"type": "string", "enum": allowed}));
                }
                _ => {}
            }
            if let Some(default) = &p.default {
                prop.insert("default".into(), default.clone());
            }
            properties.insert(p.name.to_string(), Value::Object(prop));
        }

        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": {
                "type": "object",
                "properties": properties,
            },
        })
    }
}

/// In-memory tool registry; listing order is registration order and is
/// part of the discovery contract.
pub struct Registry {
    tools: Vec<ToolSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool descriptor, replacing any existing one with the
    /// same name.
    pub fn register_tool(&mut self, tool: ToolSpec) {
        debug!("Registered tool: {}", tool.name);
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name == tool.name) {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// List tools in registration order
    pub fn list_tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Get total tool count
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full catalog of built-in tools.
pub fn builtin_registry() -> Registry {
    let mut reg = Registry::new();
    crate::disk::register_tools(&mut reg);
    crate::cleanup::register_tools(&mut reg);
    crate::monitor::register_tools(&mut reg);
    crate::power::register_tools(&mut reg);
    crate::system::register_tools(&mut reg);
    reg
}
