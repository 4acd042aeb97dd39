//! The dispatch state machine: parse, validate, resolve, bind, execute.
//!
//! Every call produces exactly one success or error envelope; no failure in
//! any stage may escape as a panic or a missing response.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::pool::PoolError;
use crate::registry::{MethodSpec, PoolOp};
use crate::rpc::envelope::{
    error_body, result_body, RpcRequest, BACKEND_ERROR, BACKEND_ERROR_MSG, INVALID_PARAMS,
    INVALID_PARAMS_MSG, METHOD_NOT_FOUND, PARSE_ERROR, PARSE_ERROR_MSG,
};
use crate::AppState;

/// A fully-bound call, ready to execute against the pool provider.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MethodCall {
    VolList,
    VolCreate { name: String, size: u64 },
    VolDestroy { name: String },
    PoolList,
}

/// Runs one raw request body through the full state machine and returns the
/// response envelope to write back.
pub async fn dispatch(state: &AppState, body: &[u8]) -> Value {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        // The id is never known at this point.
        Err(_) => return error_body(Value::Null, PARSE_ERROR, PARSE_ERROR_MSG),
    };

    let request = match RpcRequest::from_value(payload) {
        Ok(request) => request,
        Err(error_response) => return error_response,
    };

    let Some(spec) = state.registry.resolve(&request.method) else {
        return error_body(
            request.id,
            METHOD_NOT_FOUND,
            &format!("method {} not found", request.method),
        );
    };

    let Some(call) = bind_params(spec, request.params) else {
        return error_body(request.id, INVALID_PARAMS, INVALID_PARAMS_MSG);
    };

    match execute(state, call).await {
        Ok(result) => {
            debug!(method = %request.method, "rpc call succeeded");
            result_body(request.id, result)
        }
        Err(err) => {
            // The wire keeps the single generic code for all backend
            // failures; the specific kind is only visible in the log.
            warn!(method = %request.method, error = %err, "backend call failed");
            error_body(request.id, BACKEND_ERROR, BACKEND_ERROR_MSG)
        }
    }
}

/// Binds the raw `params` value against the method's schema. The provided
/// names must match the declared set exactly and every value must have the
/// declared type; any mismatch maps to the invalid-params error.
fn bind_params(spec: &MethodSpec, params: Option<Value>) -> Option<MethodCall> {
    let args: Map<String, Value> = match params {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return None,
    };

    if args.len() != spec.params.len()
        || !spec.params.iter().all(|name| args.contains_key(*name))
    {
        return None;
    }

    let call = match spec.op {
        PoolOp::VolList => MethodCall::VolList,
        PoolOp::PoolList => MethodCall::PoolList,
        PoolOp::VolCreate => MethodCall::VolCreate {
            name: string_arg(&args, "name")?,
            size: args.get("size").and_then(Value::as_u64)?,
        },
        PoolOp::VolDestroy => MethodCall::VolDestroy {
            name: string_arg(&args, "name")?,
        },
    };
    Some(call)
}

fn string_arg(args: &Map<String, Value>, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_string)
}

async fn execute(state: &AppState, call: MethodCall) -> Result<Value, PoolError> {
    match call {
        MethodCall::VolList => {
            let volumes = state.pool.volumes().await?;
            to_json(&volumes)
        }
        MethodCall::VolCreate { name, size } => {
            state.pool.create_volume(&name, size).await?;
            Ok(Value::Null)
        }
        MethodCall::VolDestroy { name } => {
            state.pool.destroy_volume(&name).await?;
            Ok(Value::Null)
        }
        MethodCall::PoolList => {
            let pools = state.pool.pools().await?;
            to_json(&pools)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, PoolError> {
    serde_json::to_value(value)
        .map_err(|err| PoolError::Backend(format!("result serialization failed: {err}")))
}
