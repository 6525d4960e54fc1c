use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use macops_tools::{builtin_registry, config, DispatchError, Dispatcher, Registry, ToolCtx};

use crate::rpc::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND, TOOL_NOT_FOUND,
};

pub struct RpcHandler {
    registry: Registry,
    dispatcher: Dispatcher,
    ctx: Arc<ToolCtx>,
}

impl RpcHandler {
    pub fn new() -> Result<Self> {
        let config = config::load_config()?;
        let ctx = Arc::new(ToolCtx::system(config)?);

        Ok(Self {
            registry: builtin_registry(),
            dispatcher: Dispatcher::new(),
            ctx,
        })
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Handling RPC method: {}", request.method);

        let result = match request.method.as_str() {
            "health" => self.handle_health(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            _ => Err(JsonRpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Method '{}' not found", request.method),
                data: None,
            }),
        };

        match result {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::error(request.id, error),
        }
    }

    fn handle_health(&self) -> Result<Value, JsonRpcError> {
        Ok(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "tools": self.registry.tool_count(),
        }))
    }

    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        let tools: Vec<Value> = self
            .registry
            .list_tools()
            .iter()
            .map(|t| t.descriptor_json())
            .collect();
        Ok(json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError {
            code: INVALID_PARAMS,
            message: "Missing parameters".to_string(),
            data: None,
        })?;

        let name = params
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| JsonRpcError {
                code: INVALID_PARAMS,
                message: "Missing required parameter: name".to_string(),
                data: None,
            })?
            .to_string();

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let payload = self
            .dispatcher
            .dispatch(&self.registry, &self.ctx, &name, arguments)
            .await
            .map_err(dispatch_error)?;

        let text = serde_json::to_string(&payload).map_err(|e| JsonRpcError {
            code: INTERNAL_ERROR,
            message: format!("Failed to serialize result: {e}"),
            data: None,
        })?;

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
        }))
    }
}

fn dispatch_error(e: DispatchError) -> JsonRpcError {
    let code = match e {
        DispatchError::UnknownTool(_) => TOOL_NOT_FOUND,
        DispatchError::InvalidArgument(_) => INVALID_PARAMS,
        DispatchError::Unbound(_) => INTERNAL_ERROR,
    };
    JsonRpcError {
        code,
        message: e.to_string(),
        data: None,
    }
}
