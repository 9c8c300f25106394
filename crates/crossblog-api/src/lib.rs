//! Crossblog API - HTTP surface for the article controller
//!
//! Routes:
//! - `GET /articles/search/:term`
//! - `GET|PUT|DELETE /articles/:id`
//! - `POST /articles`
//! - `GET /health`
//!
//! Each request opens its own repository from the shared factory and hands
//! it to a fresh `ArticlesController`.

pub mod error;
pub mod handlers;
pub mod request_id;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::{router, serve};
pub use state::AppState;
