//! Topograph Server - WebSocket server for the Topograph protocol
//!
//! This crate exposes the health engine to operators and dashboards over
//! JSON-RPC 2.0 on WebSocket. It is a thin adapter: every method maps onto
//! one engine operation, and engine errors map onto protocol error codes
//! (`-32001` for an unknown vertex, `-32603` for internal failures).
//!
//! The server supports:
//! - Multiple concurrent connections, one task each
//! - Concurrent queries and health updates against one shared engine

use std::sync::Arc;
use topograph_graph::HealthEngine;

/// Engine handle shared across connections.
///
/// The engine synchronizes its own health state, so no outer lock is needed.
pub type SharedEngine = Arc<HealthEngine>;

mod handlers;
mod protocol;
mod server;

pub use handlers::{dispatch, process_message};
pub use protocol::{
    PathParams, ReachParams, Request, Response, RpcError, SetHealthParams, VertexParams,
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, VERTEX_NOT_FOUND,
};
pub use server::{ServerConfig, TopographServer, DEFAULT_ADDR};
