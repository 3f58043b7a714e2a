//! Request handlers for protocol methods.
//!
//! Each handler implements one method of the Topograph protocol. They only
//! translate between wire params and engine calls; the engine does the work.

use crate::protocol::{PathParams, ReachParams, Request, Response, SetHealthParams, VertexParams};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use topograph_graph::HealthEngine;
use tracing::{debug, info};

/// Parses and dispatches one JSON-RPC message.
pub fn process_message(text: &str, engine: &HealthEngine) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    dispatch(request, engine)
}

/// Routes a parsed request to its handler.
pub fn dispatch(request: Request, engine: &HealthEngine) -> Response {
    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Processing method: {}", method);

    match method {
        "graph.info" => handle_info(engine, id),
        "summary" => Response::success(id, engine.summary()),
        "health.clear" => handle_clear(engine, id),

        "vertex.get" => with_params(request.params, id, |p: VertexParams, id| {
            reply(id, engine.get_vertex(&p.key))
        }),

        "vertex.dependents" => with_params(request.params, id, |p: ReachParams, id| {
            reply(id, engine.dependents(&p.key, p.all))
        }),

        "vertex.dependencies" => with_params(request.params, id, |p: ReachParams, id| {
            reply(id, engine.dependencies(&p.key, p.all))
        }),

        "vertex.neighbors" => with_params(request.params, id, |p: VertexParams, id| {
            reply(id, engine.neighbors(&p.key))
        }),

        "vertex.lineage" => with_params(request.params, id, |p: VertexParams, id| {
            reply(id, engine.lineage(&p.key))
        }),

        "path" => with_params(request.params, id, |p: PathParams, id| {
            reply(id, engine.path(&p.source, &p.target))
        }),

        "vertex.setHealth" => with_params(request.params, id, |p: SetHealthParams, id| {
            handle_set_health(engine, id, p)
        }),

        _ => Response::method_not_found(id, method),
    }
}

/// Deserializes params and hands them to `handler`, or reports bad params.
fn with_params<P, F>(params: Value, id: Option<Value>, handler: F) -> Response
where
    P: DeserializeOwned,
    F: FnOnce(P, Option<Value>) -> Response,
{
    match serde_json::from_value::<P>(params) {
        Ok(params) => handler(params, id),
        Err(e) => Response::invalid_params(id, e.to_string()),
    }
}

fn reply<T: Serialize>(id: Option<Value>, result: topograph_core::Result<T>) -> Response {
    match result {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the graph.info method.
fn handle_info(engine: &HealthEngine, id: Option<Value>) -> Response {
    let graph = engine.graph();

    Response::success(
        id,
        serde_json::json!({
            "vertexCount": graph.vertex_count(),
            "edgeCount": graph.edge_count(),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Handles the vertex.setHealth method.
fn handle_set_health(engine: &HealthEngine, id: Option<Value>, params: SetHealthParams) -> Response {
    match engine.set_vertex_health(&params.key, params.healthy) {
        Ok(changed) => {
            if changed {
                let status = if params.healthy { "healthy" } else { "unhealthy" };
                info!("Vertex {} marked {}", params.key, status);
            }
            Response::success(id, Value::Null)
        }
        Err(e) => Response::graph_error(id, &e),
    }
}

/// Handles the health.clear method.
fn handle_clear(engine: &HealthEngine, id: Option<Value>) -> Response {
    engine.clear_health_status();
    info!("Health status cleared for all vertices");
    Response::success(id, Value::Null)
}
