//! Capability host backed by an MCP server spoken to over stdio.
//!
//! Requests are newline-delimited JSON-RPC 2.0. A background reader task routes each
//! response to the caller waiting on its id. Requests from the server use their own id
//! space: `ping` is answered, anything else gets "method not found". Notifications are
//! ignored.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::capability::RemoteCapability;
use crate::config::BridgeConfig;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::host::CapabilityHost;

const PROTOCOL_VERSION: &str = "2024-11-05";
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Any inbound line: a response to us, a server request, or a notification.
#[derive(Debug, Deserialize)]
struct JsonRpcMessage {
    id: Option<Value>,
    method: Option<String>,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, String>>>>>;

pub struct McpStdioHost {
    server: String,
    stdin: Arc<Mutex<ChildStdin>>,
    next_id: AtomicU64,
    pending: PendingMap,
    call_timeout: Duration,
    _child: Mutex<Child>,
}

impl McpStdioHost {
    /// Spawn the configured server and complete the MCP handshake.
    pub async fn start(config: &BridgeConfig) -> Result<Self, AdapterError> {
        let command = config.command.as_deref().ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::InvalidInput)
                .with_hint("bridge.command is not configured")
        })?;

        let mut cmd = Command::new(command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &config.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|err| {
            AdapterError::new(AdapterErrorKind::CapabilityIo)
                .with_hint(format!("failed to spawn '{command}': {err}"))
        })?;
        let stdin = child.stdin.take().ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::CapabilityIo).with_hint("server stdin missing")
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::CapabilityIo).with_hint("server stdout missing")
        })?;

        let stdin = Arc::new(Mutex::new(stdin));
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        tokio::spawn(reader_task(
            stdout,
            Arc::clone(&stdin),
            Arc::clone(&pending),
            command.to_string(),
        ));

        let host = Self {
            server: command.to_string(),
            stdin,
            next_id: AtomicU64::new(1),
            pending,
            call_timeout: Duration::from_millis(config.call_timeout_ms),
            _child: Mutex::new(child),
        };
        host.initialize().await?;
        Ok(host)
    }

    async fn initialize(&self) -> Result<(), AdapterError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "soul-breakpoint",
                "version": env!("CARGO_PKG_VERSION"),
            }
        });
        let result = self.call("initialize", Some(params)).await?;
        debug!(target: "mcp", server = %self.server, ?result, "handshake complete");
        self.write_line(&json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
        }))
        .await
    }

    async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, AdapterError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let payload = serde_json::to_value(&request).map_err(|err| {
            AdapterError::new(AdapterErrorKind::Internal).with_hint(err.to_string())
        })?;
        debug!(target: "mcp", server = %self.server, id, method, "request");
        if let Err(err) = self.write_line(&payload).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        let outcome = match timeout(self.call_timeout, rx).await {
            Ok(outcome) => outcome,
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(AdapterError::new(AdapterErrorKind::Timeout)
                    .with_hint(format!("{method} exceeded {:?}", self.call_timeout))
                    .retriable(true));
            }
        };

        outcome
            .map_err(|_| {
                AdapterError::new(AdapterErrorKind::CapabilityIo).with_hint("server closed")
            })?
            .map_err(|message| AdapterError::new(AdapterErrorKind::CapabilityIo).with_hint(message))
    }

    async fn write_line(&self, payload: &Value) -> Result<(), AdapterError> {
        write_payload(&self.stdin, payload).await
    }
}

async fn write_payload(stdin: &Mutex<ChildStdin>, payload: &Value) -> Result<(), AdapterError> {
    let mut line = payload.to_string();
    line.push('\n');
    let mut stdin = stdin.lock().await;
    stdin.write_all(line.as_bytes()).await.map_err(io_error)?;
    stdin.flush().await.map_err(io_error)
}

#[async_trait]
impl CapabilityHost for McpStdioHost {
    async fn list_capabilities(&self) -> Result<Vec<RemoteCapability>, AdapterError> {
        let result = self.call("tools/list", None).await?;
        parse_capability_list(&result)
    }

    async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, AdapterError> {
        self.call(
            "tools/call",
            Some(json!({ "name": name, "arguments": arguments })),
        )
        .await
    }
}

/// Decode a `tools/list` result into capability snapshots.
pub fn parse_capability_list(result: &Value) -> Result<Vec<RemoteCapability>, AdapterError> {
    let tools = result
        .get("tools")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(tools).map_err(|err| {
        AdapterError::new(AdapterErrorKind::InvalidResponse)
            .with_hint(format!("tools/list: {err}"))
            .with_data(result.clone())
    })
}

fn io_error(err: std::io::Error) -> AdapterError {
    AdapterError::new(AdapterErrorKind::CapabilityIo).with_hint(err.to_string())
}

async fn reader_task(
    stdout: ChildStdout,
    stdin: Arc<Mutex<ChildStdin>>,
    pending: PendingMap,
    server: String,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(reply) = route_line(&line, &pending, &server).await else {
                    continue;
                };
                if let Err(err) = write_payload(&stdin, &reply).await {
                    warn!(target: "mcp", %server, %err, "failed to answer server request");
                }
            }
            Ok(None) => {
                error!(target: "mcp", %server, "server stdout closed");
                fail_pending(&pending, "server stdout closed").await;
                break;
            }
            Err(err) => {
                error!(target: "mcp", %server, %err, "read error");
                fail_pending(&pending, &format!("read error: {err}")).await;
                break;
            }
        }
    }
}

/// Handle one inbound line. Returns the reply owed to the server, if any.
async fn route_line(line: &str, pending: &PendingMap, server: &str) -> Option<Value> {
    if line.trim().is_empty() {
        return None;
    }
    let message = match serde_json::from_str::<JsonRpcMessage>(line) {
        Ok(message) => message,
        Err(err) => {
            warn!(target: "mcp", %server, %err, "unparseable line from server");
            return None;
        }
    };

    if let Some(method) = message.method {
        let id = message.id?;
        debug!(target: "mcp", %server, %method, "server request");
        let reply = if method == "ping" {
            json!({ "jsonrpc": "2.0", "id": id, "result": {} })
        } else {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": METHOD_NOT_FOUND, "message": format!("method not found: {method}") }
            })
        };
        return Some(reply);
    }

    let id = message.id.as_ref().and_then(Value::as_u64)?;
    if let Some(tx) = pending.lock().await.remove(&id) {
        let payload = match message.error {
            Some(err) => Err(format!("json-rpc error {}: {}", err.code, err.message)),
            None => Ok(message.result.unwrap_or(Value::Null)),
        };
        let _ = tx.send(payload);
    }
    None
}

async fn fail_pending(pending: &PendingMap, reason: &str) {
    for (_, tx) in pending.lock().await.drain() {
        let _ = tx.send(Err(reason.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tools_with_optional_descriptions() {
        let result = json!({
            "tools": [
                { "name": "navigate_page", "description": "Open a URL", "inputSchema": {} },
                { "name": "chrome-devtools:call_cdp", "inputSchema": {} }
            ]
        });
        let caps = parse_capability_list(&result).expect("capabilities");
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[0].description.as_deref(), Some("Open a URL"));
        assert_eq!(caps[1].name, "chrome-devtools:call_cdp");
        assert!(caps[1].description.is_none());
    }

    #[test]
    fn missing_tools_key_is_empty_list() {
        let caps = parse_capability_list(&json!({})).expect("capabilities");
        assert!(caps.is_empty());
    }

    #[test]
    fn malformed_tools_are_rejected() {
        let err = parse_capability_list(&json!({ "tools": [{ "description": "no name" }] }))
            .expect_err("name is required");
        assert_eq!(err.kind, AdapterErrorKind::InvalidResponse);
    }

    async fn pending_call(pending: &PendingMap, id: u64) -> oneshot::Receiver<Result<Value, String>> {
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(id, tx);
        rx
    }

    #[tokio::test]
    async fn server_ping_is_answered_without_touching_our_call() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let mut rx = pending_call(&pending, 1).await;

        let reply = route_line(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, &pending, "test").await;
        assert_eq!(reply, Some(json!({ "jsonrpc": "2.0", "id": 1, "result": {} })));
        assert!(pending.lock().await.contains_key(&1));
        assert!(rx.try_recv().is_err());

        let reply = route_line(
            r#"{"jsonrpc":"2.0","id":1,"result":{"tools":[]}}"#,
            &pending,
            "test",
        )
        .await;
        assert!(reply.is_none());
        assert_eq!(rx.await.expect("delivered"), Ok(json!({ "tools": [] })));
    }

    #[tokio::test]
    async fn unknown_server_request_gets_method_not_found() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let reply = route_line(
            r#"{"jsonrpc":"2.0","id":"s-7","method":"sampling/createMessage","params":{}}"#,
            &pending,
            "test",
        )
        .await
        .expect("reply");
        assert_eq!(reply["id"], "s-7");
        assert_eq!(reply["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn notifications_and_noise_are_ignored() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let mut rx = pending_call(&pending, 2).await;
        for line in [
            r#"{"jsonrpc":"2.0","method":"notifications/tools/list_changed"}"#,
            "not json",
            "   ",
        ] {
            assert!(route_line(line, &pending, "test").await.is_none());
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn error_response_reaches_the_caller() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let rx = pending_call(&pending, 3).await;
        route_line(
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32000,"message":"boom"}}"#,
            &pending,
            "test",
        )
        .await;
        assert_eq!(
            rx.await.expect("delivered"),
            Err("json-rpc error -32000: boom".to_string())
        );
    }

    #[tokio::test]
    async fn failing_pending_wakes_every_waiter() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let first = pending_call(&pending, 4).await;
        let second = pending_call(&pending, 5).await;

        fail_pending(&pending, "read error: broken pipe").await;

        assert!(pending.lock().await.is_empty());
        assert_eq!(first.await.expect("delivered"), Err("read error: broken pipe".to_string()));
        assert_eq!(second.await.expect("delivered"), Err("read error: broken pipe".to_string()));
    }

    #[tokio::test]
    async fn start_without_command_is_invalid_input() {
        let err = McpStdioHost::start(&BridgeConfig::default())
            .await
            .err()
            .expect("missing command");
        assert_eq!(err.kind, AdapterErrorKind::InvalidInput);
    }
}
