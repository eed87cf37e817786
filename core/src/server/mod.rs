//! Reference task server: the REST contract the client talks to, backed by
//! a [`TaskRepository`].
//!
//! | Method | Path          | Success body                  |
//! |--------|---------------|-------------------------------|
//! | GET    | `/tasks`      | array of tasks                |
//! | POST   | `/tasks`      | created task with its new id  |
//! | PUT    | `/tasks/{id}` | `{"message": "Task updated"}` |
//! | DELETE | `/tasks/{id}` | `{"message": "Task deleted"}` |
//!
//! Unknown ids answer 404 with `{"detail": "Task not found"}`.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::repository::TaskRepository;

pub use handlers::AppState;

pub fn build_router<R: TaskRepository + Send + 'static>(repo: R, allowed_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(repo))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Binds `config.bind` and serves until Ctrl-C.
pub async fn serve<R: TaskRepository + Send + 'static>(config: &ServerConfig, repo: R) -> Result<()> {
    let app = build_router(repo, &config.allowed_origins);
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "task server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("task server stopped with an error")?;
    info!("task server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
