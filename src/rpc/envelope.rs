//! Request/response envelope shapes and the fixed JSON-RPC error codes.
//!
//! Response bodies carry only `result`/`error` plus the echoed `id`,
//! matching the wire format clients of this daemon already expect.

use serde_json::{json, Value};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const BACKEND_ERROR: i64 = -1;

pub const PARSE_ERROR_MSG: &str = "parse error";
pub const INVALID_REQUEST_MSG: &str = "not a valid jsonrpc-2.0 request";
pub const INVALID_PARAMS_MSG: &str = "invalid method parameter(s)";
pub const BACKEND_ERROR_MSG: &str = "jsonrpc error";

const JSONRPC_VERSION: &str = "2.0";

/// A structurally valid request envelope. `id` is the request's id value,
/// which may be JSON null; an absent `id` key never validates.
#[derive(Debug)]
pub struct RpcRequest {
    pub id: Value,
    pub method: String,
    /// Raw `params` value. `null` and an absent key both normalize to
    /// `None`; anything else is left for parameter binding to judge.
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Validates the envelope, returning a ready-to-send error body on
    /// failure. The parsed `id` is echoed in that body whenever the key was
    /// present, even when some other envelope field is broken.
    pub fn from_value(payload: Value) -> Result<Self, Value> {
        let Value::Object(mut object) = payload else {
            return Err(error_body(
                Value::Null,
                INVALID_REQUEST,
                INVALID_REQUEST_MSG,
            ));
        };

        let id = object.get("id").cloned();
        let echo_id = id.clone().unwrap_or(Value::Null);

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(error_body(echo_id, INVALID_REQUEST, INVALID_REQUEST_MSG));
        }

        let Some(method) = object.get("method").and_then(Value::as_str) else {
            return Err(error_body(echo_id, INVALID_REQUEST, INVALID_REQUEST_MSG));
        };
        let method = method.to_string();

        let Some(id) = id else {
            return Err(error_body(Value::Null, INVALID_REQUEST, INVALID_REQUEST_MSG));
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        };

        Ok(Self { id, method, params })
    }
}

pub fn result_body(id: Value, result: Value) -> Value {
    json!({
        "result": result,
        "id": id
    })
}

pub fn error_body(id: Value, code: i64, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
}
