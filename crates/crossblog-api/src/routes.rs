use std::io;

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::{middleware, Router};
use crossblog_core::repository::RepositoryFactory;
use crossblog_core_types::schema::HEADER_REQUEST_ID;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_article, get_article, health, list_articles, post_article, put_article,
    search_articles,
};
use crate::request_id::propagate_request_id;
use crate::state::AppState;

/// Build the application router over a repository factory
pub fn router<F: RepositoryFactory>(factory: F) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get(HEADER_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/health", get(health))
        .route("/articles", post(post_article::<F>))
        .route("/articles/search", get(list_articles::<F>))
        .route("/articles/search/", get(list_articles::<F>))
        .route("/articles/search/:term", get(search_articles::<F>))
        .route(
            "/articles/:id",
            get(get_article::<F>)
                .put(put_article::<F>)
                .delete(delete_article::<F>),
        )
        .with_state(AppState::new(factory))
        .layer(trace)
        .layer(middleware::from_fn(propagate_request_id))
}

/// Serve `app` until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "crossblog listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
