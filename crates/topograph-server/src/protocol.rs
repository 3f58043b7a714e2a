//! JSON-RPC 2.0 message types for the Topograph protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use topograph_core::GraphError;

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal error, the 500 of this protocol.
pub const INTERNAL_ERROR: i32 = -32603;
/// The referenced vertex does not exist, the 404 of this protocol.
pub const VERTEX_NOT_FOUND: i32 = -32001;

/// An incoming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// A response to a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl Response {
    /// Builds a success response.
    pub fn success<T: Serialize>(id: Option<Value>, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Builds an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "Parse error")
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(id: Option<Value>, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, message)
    }

    /// Maps an engine error onto its wire code.
    pub fn graph_error(id: Option<Value>, err: &GraphError) -> Self {
        let code = match err {
            GraphError::NotFound(_) => VERTEX_NOT_FOUND,
            GraphError::Internal(_) => INTERNAL_ERROR,
        };
        Self::error(id, code, err.to_string())
    }
}

/// Params for methods keyed on one vertex.
#[derive(Debug, Deserialize)]
pub struct VertexParams {
    pub key: String,
}

/// Params for dependents/dependencies.
#[derive(Debug, Deserialize)]
pub struct ReachParams {
    pub key: String,
    /// Expand transitively. Defaults to one hop.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct SetHealthParams {
    pub key: String,
    pub healthy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_error() {
        let response = Response::success(Some(json!(1)), json!({"ok": true}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["result"]["ok"], true);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_graph_error_codes() {
        let not_found = Response::graph_error(None, &GraphError::NotFound("x".into()));
        assert_eq!(not_found.error.unwrap().code, VERTEX_NOT_FOUND);

        let internal = Response::graph_error(None, &GraphError::Internal("x".into()));
        assert_eq!(internal.error.unwrap().code, INTERNAL_ERROR);
    }

    #[test]
    fn test_reach_params_default_to_one_hop() {
        let params: ReachParams = serde_json::from_value(json!({"key": "db"})).unwrap();
        assert!(!params.all);
    }
}
