//! Tool dispatch pipeline
//!
//! Pipeline: lookup → fill defaults → validate types/enums → invoke
//! handler. Handler failures are converted to the in-band `{error}`
//! payload; only unknown tools and invalid arguments surface as
//! protocol-level errors.

use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::context::ToolCtx;
use crate::registry::{ParamKind, ParamSpec, Registry};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("No handler bound for registered tool: {0}")]
    Unbound(String),
}

/// A tool handler function
type Handler = Box<dyn Fn(Arc<ToolCtx>, Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Routes invocations to their handlers.
pub struct Dispatcher {
    /// Map of tool name → handler function
    handlers: HashMap<&'static str, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Self {
            handlers: HashMap::new(),
        };
        dispatcher.register_handlers();
        dispatcher
    }

    fn bind<F, Fut>(&mut self, name: &'static str, handler: F)
    where
        F: Fn(Arc<ToolCtx>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.handlers.insert(
            name,
            Box::new(move |ctx, input| {
                let fut: BoxFuture<'static, Result<Value>> = Box::pin(handler(ctx, input));
                fut
            }),
        );
    }

    /// Register all built-in tool handlers. Must stay in lockstep with
    /// the registry; a structural test walks both tables.
    fn register_handlers(&mut self) {
        // Disk tools
        self.bind("disk_usage", crate::disk::usage::execute);
        self.bind("analyze_library", crate::disk::library::execute);
        self.bind(
            "cleanup_recommendations",
            crate::disk::recommendations::execute,
        );

        // Cleanup tools
        self.bind("go_cache_status", crate::cleanup::go_cache::execute);
        self.bind("cleanup_caches", crate::cleanup::caches::execute);
        self.bind("cleanup_docker", crate::cleanup::docker::execute);
        self.bind("empty_trash", crate::cleanup::trash::execute);
        self.bind("developer_cleanup", crate::cleanup::developer::execute);
        self.bind("full_cleanup_workflow", crate::cleanup::workflow::execute);

        // Monitor tools
        self.bind("cpu_usage", crate::monitor::cpu::execute);
        self.bind("memory_status", crate::monitor::memory::execute);
        self.bind("process_list", crate::monitor::process::execute);
        self.bind("kill_process", crate::monitor::kill::execute);

        // Power tools
        self.bind("thermal_status", crate::power::thermal::execute);
        self.bind("battery_health", crate::power::battery::execute);

        // System tools
        self.bind("system_info", crate::system::info::execute);
        self.bind("startup_items", crate::system::startup::execute);
        self.bind("network_status", crate::system::network::execute);
    }

    /// Names of every bound handler, for consistency checks.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Dispatch one invocation through the pipeline.
    pub async fn dispatch(
        &self,
        registry: &Registry,
        ctx: &Arc<ToolCtx>,
        tool_name: &str,
        raw_arguments: Value,
    ) -> Result<Value, DispatchError> {
        let spec = registry
            .get_tool(tool_name)
            .ok_or_else(|| DispatchError::UnknownTool(tool_name.to_string()))?;

        let mut arguments = match raw_arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(DispatchError::InvalidArgument(format!(
                    "arguments must be an object, got {other}"
                )))
            }
        };

        for param in &spec.params {
            if !arguments.contains_key(param.name) {
                if let Some(default) = &param.default {
                    arguments.insert(param.name.to_string(), default.clone());
                }
            }
        }

        for param in &spec.params {
            if let Some(value) = arguments.get(param.name) {
                validate_param(tool_name, param, value)?;
            }
        }

        let handler = self
            .handlers
            .get(tool_name)
            .ok_or_else(|| DispatchError::Unbound(tool_name.to_string()))?;

        let invocation_id = Uuid::new_v4();
        let start = Instant::now();
        info!("Dispatching {tool_name} (invocation {invocation_id})");

        match handler(ctx.clone(), Value::Object(arguments)).await {
            Ok(value) => {
                info!(
                    "Completed {tool_name} in {}ms (invocation {invocation_id})",
                    start.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(e) => {
                warn!(
                    "Handler {tool_name} failed after {}ms (invocation {invocation_id}): {e:#}",
                    start.elapsed().as_millis()
                );
                Ok(json!({ "error": e.to_string() }))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_param(tool: &str, param: &ParamSpec, value: &Value) -> Result<(), DispatchError> {
    let fail = |msg: String| Err(DispatchError::InvalidArgument(msg));

    match param.kind {
        ParamKind::String => {
            if !value.is_string() {
                return fail(format!("{tool}: parameter '{}' must be a string", param.name));
            }
        }
        ParamKind::Number => {
            if !value.is_number() {
                return fail(format!("{tool}: parameter '{}' must be a number", param.name));
            }
        }
        ParamKind::Bool => {
            if !value.is_boolean() {
                return fail(format!(
                    "{tool}: parameter '{}' must be a boolean",
                    param.name
                ));
            }
        }
        ParamKind::StringEnum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => {
                return fail(format!(
                    "{tool}: parameter '{}' must be one of {allowed:?}, got '{s}'",
                    param.name
                ))
            }
            None => {
                return fail(format!("{tool}: parameter '{}' must be a string", param.name))
            }
        },
        ParamKind::EnumArray(allowed) => match value.as_array() {
            Some(items) => {
                for item in items {
                    match item.as_str() {
                        Some(s) if allowed.contains(&s) => {}
                        Some(s) => {
                            return fail(format!(
                                "{tool}: parameter '{}' element must be one of {allowed:?}, got '{s}'",
                                param.name
                            ))
                        }
                        None => {
                            return fail(format!(
                                "{tool}: parameter '{}' must be an array of strings",
                                param.name
                            ))
                        }
                    }
                }
            }
            None => {
                return fail(format!("{tool}: parameter '{}' must be an array", param.name))
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(kind: ParamKind) -> ParamSpec {
        ParamSpec {
            name: "p",
            kind,
            default: None,
            description: "test",
        }
    }

    #[test]
    fn test_validate_string() {
        assert!(validate_param("t", &param(ParamKind::String), &json!("x")).is_ok());
        assert!(validate_param("t", &param(ParamKind::String), &json!(1)).is_err());
    }

    #[test]
    fn test_validate_number_and_bool() {
        assert!(validate_param("t", &param(ParamKind::Number), &json!(3)).is_ok());
        assert!(validate_param("t", &param(ParamKind::Number), &json!("3")).is_err());
        assert!(validate_param("t", &param(ParamKind::Bool), &json!(true)).is_ok());
        assert!(validate_param("t", &param(ParamKind::Bool), &json!(0)).is_err());
    }

    #[test]
    fn test_validate_string_enum() {
        const SORT: &[&str] = &["cpu", "memory", "name"];
        let p = param(ParamKind::StringEnum(SORT));
        assert!(validate_param("t", &p, &json!("cpu")).is_ok());
        assert!(validate_param("t", &p, &json!("bogus")).is_err());
    }

    #[test]
    fn test_validate_enum_array() {
        const TARGETS: &[&str] = &["go", "brew", "all"];
        let p = param(ParamKind::EnumArray(TARGETS));
        assert!(validate_param("t", &p, &json!(["go", "brew"])).is_ok());
        assert!(validate_param("t", &p, &json!(["go", "bogus"])).is_err());
        assert!(validate_param("t", &p, &json!("go")).is_err());
        assert!(validate_param("t", &p, &json!([1])).is_err());
    }
}
