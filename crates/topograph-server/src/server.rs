//! WebSocket server implementation.
//!
//! Handles client connections and routes messages to handlers.

use crate::handlers::process_message;
use crate::SharedEngine;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use topograph_graph::HealthEngine;
use tracing::{debug, error, info, warn};

/// Default bind address.
pub const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 7450);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(DEFAULT_ADDR),
        }
    }
}

/// The Topograph WebSocket server.
pub struct TopographServer {
    config: ServerConfig,
    engine: SharedEngine,
}

impl TopographServer {
    /// Creates a new server owning the given engine.
    pub fn new(engine: HealthEngine, config: ServerConfig) -> Self {
        Self::new_with_shared(Arc::new(engine), config)
    }

    /// Creates a server around an engine that is shared elsewhere.
    pub fn new_with_shared(engine: SharedEngine, config: ServerConfig) -> Self {
        Self { config, engine }
    }

    /// Returns a handle to the shared engine.
    pub fn engine(&self) -> SharedEngine {
        self.engine.clone()
    }

    /// Binds the configured address and serves forever.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        self.serve(listener).await
    }

    /// Accepts connections on an already bound listener, forever.
    pub async fn serve(
        &self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Topograph server listening on {}", listener.local_addr()?);

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("New connection from {}", addr);
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, engine).await {
                            error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    engine: SharedEngine,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection established with {}", addr);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("Message error from {}: {}", addr, e);
                break;
            }
        };

        if msg.is_close() {
            debug!("Client {} disconnected", addr);
            break;
        }

        if msg.is_ping() {
            write.send(Message::Pong(msg.into_data())).await?;
            continue;
        }

        if msg.is_text() {
            let text = msg.to_text().unwrap_or("");
            let response = process_message(text, &engine);
            let json = serde_json::to_string(&response)?;
            write.send(Message::Text(json)).await?;
        }
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio_tungstenite::connect_async;
    use topograph_core::Topology;

    fn engine() -> HealthEngine {
        let topology = Topology::from_json(
            r#"{
                "vertices": [{"key": "api", "label": "API"}, {"key": "db", "label": "DB"}],
                "edges": [{"key": "api-db", "source": "api", "target": "db"}]
            }"#,
        )
        .unwrap();
        HealthEngine::from_topology(topology).unwrap()
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            ServerConfig::default().addr,
            "127.0.0.1:7450".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_request_over_websocket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = TopographServer::new(engine(), ServerConfig { addr });
        let shared = server.engine();
        tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "vertex.setHealth",
            "params": {"key": "db", "healthy": false}
        });
        ws.send(Message::Text(request.to_string())).await.unwrap();
        let _ = ws.next().await.unwrap().unwrap();

        let request = json!({"jsonrpc": "2.0", "id": 2, "method": "vertex.dependents", "params": {"key": "db"}});
        ws.send(Message::Text(request.to_string())).await.unwrap();

        let reply = ws.next().await.unwrap().unwrap();
        let body: Value = serde_json::from_str(reply.to_text().unwrap()).unwrap();
        assert_eq!(body["id"], 2);
        assert_eq!(body["result"]["title"], "dependents of db");
        assert_eq!(body["result"]["principal"]["healthy"], false);
        assert_eq!(body["result"]["vertices"][0]["key"], "api");

        // the mutation went through the same engine the server holds
        assert_eq!(shared.unhealthy_snapshot()[0].key, "db");

        ws.close(None).await.unwrap();
    }
}
