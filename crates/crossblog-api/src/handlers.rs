//! Route handlers
//!
//! Thin adapters: open a repository, run the controller, render the outcome.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use crossblog_core::model::{ArticleId, ArticleModel};
use crossblog_core::repository::RepositoryFactory;
use crossblog_core_types::RequestContext;
use crossblog_engine::ArticlesController;
use serde::Serialize;

use crate::error::ApiError;
use crate::response::{render, render_created, render_empty};
use crate::state::AppState;

pub async fn search_articles<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
    Path(term): Path<String>,
) -> Result<Response, ApiError> {
    run_search(&state, &ctx, &term).await
}

/// Search with an empty term, which lists every article
pub async fn list_articles<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, ApiError> {
    run_search(&state, &ctx, "").await
}

async fn run_search<F: RepositoryFactory>(
    state: &AppState<F>,
    ctx: &RequestContext,
    term: &str,
) -> Result<Response, ApiError> {
    tracing::debug!(request_id = %ctx.request_id, term = %term, "search articles");
    let controller = ArticlesController::new(state.repository());
    let outcome = controller
        .search(term)
        .await
        .map_err(|e| ApiError::in_context(e, ctx))?;
    Ok(render(outcome))
}

pub async fn get_article<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<ArticleId>,
) -> Result<Response, ApiError> {
    let controller = ArticlesController::new(state.repository());
    let outcome = controller
        .get(id)
        .await
        .map_err(|e| ApiError::in_context(e, &ctx))?;
    Ok(render(outcome))
}

pub async fn put_article<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<ArticleId>,
    Json(model): Json<ArticleModel>,
) -> Result<Response, ApiError> {
    let mut controller = ArticlesController::new(state.repository());
    let outcome = controller
        .put(id, model)
        .await
        .map_err(|e| ApiError::in_context(e, &ctx))?;
    Ok(render(outcome))
}

pub async fn post_article<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
    Json(model): Json<ArticleModel>,
) -> Result<Response, ApiError> {
    let mut controller = ArticlesController::new(state.repository());
    let outcome = controller
        .post(model)
        .await
        .map_err(|e| ApiError::in_context(e, &ctx))?;
    Ok(render_created(outcome))
}

pub async fn delete_article<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<ArticleId>,
) -> Result<Response, ApiError> {
    let mut controller = ArticlesController::new(state.repository());
    let outcome = controller
        .delete(id)
        .await
        .map_err(|e| ApiError::in_context(e, &ctx))?;
    Ok(render_empty(outcome))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "crossblog".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
