//! macops stdio server — JSON-RPC 2.0 over stdin/stdout.
//!
//! One request per line in, one response per line out; logs go to
//! stderr so stdout stays a clean protocol stream.

use anyhow::Result;
use std::io::{self, BufRead, BufReader, Write};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

mod handler;
mod rpc;

use handler::RpcHandler;
use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("macops stdio server starting...");

    let rt = Runtime::new()?;
    let handler = RpcHandler::new()?;

    info!("Server ready, waiting for requests...");

    let stdin = io::stdin();
    let reader = BufReader::new(stdin.lock());
    let mut stdout = io::stdout();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(e) => {
                error!("Failed to read from stdin: {e}");
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => rt.block_on(handler.handle_request(request)),
            Err(e) => {
                warn!("Invalid JSON-RPC request: {e}");
                JsonRpcResponse::error(
                    None,
                    JsonRpcError {
                        code: PARSE_ERROR,
                        message: "Parse error".to_string(),
                        data: Some(serde_json::json!({ "details": e.to_string() })),
                    },
                )
            }
        };

        match serde_json::to_string(&response) {
            Ok(response_json) => {
                if let Err(e) = writeln!(stdout, "{response_json}") {
                    error!("Failed to write response to stdout: {e}");
                    break;
                }
                if let Err(e) = stdout.flush() {
                    error!("Failed to flush stdout: {e}");
                    break;
                }
            }
            Err(e) => {
                error!("Failed to serialize response: {e}");
            }
        }
    }

    info!("macops stdio server shutting down...");
    Ok(())
}
