//! Server Implementation
//!
//! HTTP server startup and shutdown.

use socketioxide::layer::SocketIoLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{Config, ServerState};
use crate::api;

pub struct Server {
    state: ServerState,
    socket_layer: SocketIoLayer,
}

impl Server {
    pub fn new(state: ServerState, socket_layer: SocketIoLayer) -> Self {
        Self {
            state,
            socket_layer,
        }
    }

    /// Build the state from scratch and run until interrupted
    pub async fn from_config(config: Config) -> anyhow::Result<()> {
        let (state, socket_layer) = ServerState::initialize(config).await?;
        Self::new(state, socket_layer).run().await
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let port = self.state.config.http_port;

        let app = api::router()
            .layer(self.socket_layer)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("MUDECOOP server listening on {addr}");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
