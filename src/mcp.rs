use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::backend::JobSearchBackend;
use crate::error::{JobSearchError, Result};
use crate::tools::{call_tool, tool_descriptors};

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    code: i32,
    message: String,
}

/// Serve line-delimited JSON-RPC over stdin/stdout until EOF.
pub async fn run_stdio(backend: Arc<dyn JobSearchBackend>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let req: RpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                write_response(
                    &mut stdout,
                    RpcResponse {
                        jsonrpc: "2.0",
                        id: Value::Null,
                        result: None,
                        error: Some(RpcError {
                            code: -32700,
                            message: format!("parse error: {e}"),
                        }),
                    },
                )
                .await?;
                continue;
            }
        };

        // Id-less notifications get no response at all.
        if req.id.is_null() && req.method.starts_with("notifications/") {
            continue;
        }

        let resp = process_request(backend.clone(), req).await;
        write_response(&mut stdout, resp).await?;
    }

    Ok(())
}

/// Handle one request. Shared between the stdio loop and the HTTP
/// transport's message endpoint.
pub async fn process_request(backend: Arc<dyn JobSearchBackend>, req: RpcRequest) -> RpcResponse {
    match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "notifications/initialized" => ok_response(req.id, Value::Bool(true)),
        "ping" => ok_response(req.id, serde_json::json!({})),
        "tools/list" | "list_tools" => {
            ok_response(req.id, serde_json::json!({ "tools": tool_descriptors() }))
        }
        "tools/call" => handle_tool_call(backend, req).await,
        _ => rpc_error(&req, -32601, format!("method not found: {}", req.method)),
    }
}

fn handle_initialize(req: &RpcRequest) -> RpcResponse {
    ok_response(
        req.id.clone(),
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "linkedin-jobs-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

async fn handle_tool_call(backend: Arc<dyn JobSearchBackend>, req: RpcRequest) -> RpcResponse {
    let Some(name) = req
        .params
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_owned)
    else {
        let e = JobSearchError::InvalidRequest("tools/call requires string field `name`".into());
        return rpc_error(&req, -32602, e.to_string());
    };
    let arguments = req
        .params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    // Tool-level failures are successful responses carrying isError
    // content, not RPC errors.
    let output = call_tool(backend.as_ref(), &name, &arguments).await;
    ok_response(req.id, output.into_value())
}

async fn write_response(stdout: &mut tokio::io::Stdout, resp: RpcResponse) -> Result<()> {
    let line = serde_json::to_string(&resp).unwrap_or_else(|_| "{}".to_string());
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

fn ok_response(id: Value, result: Value) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id,
        result: Some(result),
        error: None,
    }
}

fn rpc_error(req: &RpcRequest, code: i32, message: String) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id: req.id.clone(),
        result: None,
        error: Some(RpcError { code, message }),
    }
}
