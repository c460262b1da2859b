//! REST surface over the word and level stores.

use crate::db::Stores;
use axum::Router;
use axum::routing::{delete, get, post, put};
use std::future::Future;
use tokio::net::TcpListener;

pub mod error;
pub mod routes;

#[derive(Clone)]
pub struct ApiState {
    pub stores: Stores,
}

pub fn router(stores: Stores) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health))
        .route("/stats", get(routes::vocabulary_stats))
        .route("/words", get(routes::list_words).post(routes::create_word))
        .route(
            "/words/{id}",
            put(routes::update_word).delete(routes::delete_word),
        )
        .route("/words/{id}/stats", post(routes::record_word_stats))
        .route(
            "/custom-levels",
            get(routes::list_levels).post(routes::create_level),
        )
        .route("/custom-levels/{name}", delete(routes::delete_level))
        .route(
            "/custom-levels/{name}/stats",
            post(routes::record_level_stats),
        );

    Router::new()
        .nest("/api", api)
        .with_state(ApiState { stores })
}

/// Serves until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    stores: Stores,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on http://{addr}");
    }
    axum::serve(listener, router(stores))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
