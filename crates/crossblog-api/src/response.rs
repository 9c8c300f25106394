//! Rendering controller outcomes

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use crossblog_core::model::Article;
use crossblog_engine::Outcome;
use serde::Serialize;

/// 200 or 201 with a JSON body, or a bare 404
pub fn render<T: Serialize>(outcome: Outcome<T>) -> Response {
    match outcome {
        Outcome::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Outcome::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Like [`render`] but without a body on success
pub fn render_empty(outcome: Outcome<()>) -> Response {
    match outcome {
        Outcome::Ok(()) => StatusCode::OK.into_response(),
        Outcome::Created(()) => StatusCode::CREATED.into_response(),
        Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Render a create outcome with a `Location` header
pub fn render_created(outcome: Outcome<Article>) -> Response {
    match outcome {
        Outcome::Created(article) => {
            let location = format!("/articles/{}", article.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(article),
            )
                .into_response()
        }
        other => render(other),
    }
}
