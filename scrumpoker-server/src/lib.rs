use std::net::{Ipv6Addr, SocketAddr};

use axum::routing::get;
use log::{error, info};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

mod context;
mod docs;
mod errors;
mod rooms;
mod schemas;
mod serialized;
mod votings;

pub use context::ServerContext;
pub use errors::{ErrorBody, ServerError, ServerResult};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 8080;

pub type Router = axum::Router<ServerContext>;

/// Builds the full scrumpoker router on top of the given context
pub fn app(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/rooms", rooms::router())
        .nest("/votings", votings::router())
        .route("/api.json", get(docs::docs))
        .fallback(route_not_found)
        .layer(cors)
        .with_state(context)
}

async fn route_not_found() -> ServerError {
    ServerError::NotFound { resource: "route" }
}

/// Starts the scrumpoker server, returning once it has shut down and the store is closed
pub async fn run_server(context: ServerContext, port: u16) -> std::io::Result<()> {
    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on {}", addr);

    let served = axum::serve(listener, app(context.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Closing the store...");
    context.collab.close().await;

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Could not listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Could not listen for the terminate signal: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
