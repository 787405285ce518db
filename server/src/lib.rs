//! In-memory todo HTTP service.
//!
//! # Overview
//! CRUD over todo records plus a few greeting endpoints, served with Axum.
//! Requests pass through the CORS layer, then the logging layer, then the
//! router.
//!
//! # Design
//! - [`Store`] is built once by the caller and injected as router state;
//!   nothing is global.
//! - Every error leaves a handler as [`ApiError`], rendered as
//!   `{"error": "<message>"}`.
//! - `/todos/{id}` is routed as a catch-all so any remainder after
//!   `/todos/`, valid or not, reaches the id parser and gets a JSON answer.

pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod store;

use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;

pub use config::{Config, ConfigError};
pub use cors::CorsPolicy;
pub use error::ApiError;
pub use store::{Store, StoreError, Todo, TodoPatch};

pub type SharedStore = Arc<Store>;

pub fn app(store: SharedStore, cors_policy: CorsPolicy) -> Router {
    let item: MethodRouter<SharedStore> = get(handlers::get_todo)
        .head(handlers::item_method_not_allowed)
        .patch(handlers::update_todo)
        .put(handlers::update_todo)
        .delete(handlers::delete_todo)
        .fallback(handlers::item_method_not_allowed);

    Router::new()
        .route("/", get_only(handlers::root))
        .route("/health", get_only(handlers::health))
        .route("/hello", get_only(handlers::hello))
        .route(
            "/todos",
            get(handlers::list_todos)
                .head(handlers::method_not_allowed)
                .post(handlers::create_todo)
                .fallback(handlers::method_not_allowed),
        )
        .route("/todos/", item.clone())
        .route("/todos/{*id}", item)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(logging::log_requests))
        .layer(middleware::from_fn_with_state(
            Arc::new(cors_policy),
            cors::cors,
        ))
        .with_state(store)
}

/// GET and nothing else. HEAD is registered explicitly so it is not served
/// by the GET handler.
fn get_only<H, T>(handler: H) -> MethodRouter<SharedStore>
where
    H: Handler<T, SharedStore>,
    T: 'static,
{
    get(handler)
        .head(handlers::method_not_allowed)
        .fallback(handlers::method_not_allowed)
}

/// Serve on `listener` with a fresh store until SIGINT/SIGTERM.
pub async fn run(listener: TcpListener, cors_policy: CorsPolicy) -> Result<(), std::io::Error> {
    let store: SharedStore = Arc::new(Store::new());
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app(store, cors_policy))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
