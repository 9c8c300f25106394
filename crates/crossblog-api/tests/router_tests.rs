// HTTP routing tests driven through tower's oneshot, no socket involved

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use crossblog_api::{router, ErrorResponse};
use crossblog_core::errors::{ExError, ExErrorKind};
use crossblog_core::model::{Article, ArticleId, ArticleListModel, ArticleModel};
use crossblog_core::repository::{
    ArticleQuery, ArticleRepository, RepoResult, RepositoryFactory, SaveReport,
};
use crossblog_store::MemoryStore;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

async fn seeded_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    store
        .seed((1..=3).map(|n| {
            Article::draft(
                format!("Title{}", n),
                format!("Content{}", n),
                false,
                Utc.with_ymd_and_hms(2018, 9, n, 12, 0, 0).unwrap(),
            )
        }))
        .await
        .unwrap();
    (router(store.clone()), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn article_json(title: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "content": content,
        "published": true,
        "date": "2019-01-01T00:00:00Z",
    })
}

#[tokio::test]
async fn test_search_hits_and_misses() {
    let (app, _) = seeded_app().await;

    let hit = send(&app, "GET", "/articles/search/Title", None).await;
    assert_eq!(hit.status(), StatusCode::OK);
    let list: ArticleListModel = json_body(hit).await;
    assert_eq!(list.len(), 3);

    let miss = send(&app, "GET", "/articles/search/Invalid", None).await;
    assert_eq!(miss.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(miss).await;
    assert_eq!(body, serde_json::json!({ "articles": [] }));
}

#[tokio::test]
async fn test_search_without_term_lists_everything() {
    let (app, _) = seeded_app().await;

    for uri in ["/articles/search", "/articles/search/"] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let list: ArticleListModel = json_body(response).await;
        assert_eq!(list.len(), 3, "{}", uri);
    }
}

#[tokio::test]
async fn test_get_existing_and_missing() {
    let (app, _) = seeded_app().await;

    let found = send(&app, "GET", "/articles/1", None).await;
    assert_eq!(found.status(), StatusCode::OK);
    let model: ArticleModel = json_body(found).await;
    assert_eq!(model.id, 1);
    assert_eq!(model.title, "Title1");

    let missing = send(&app, "GET", "/articles/404", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(missing).await.is_empty());
}

#[tokio::test]
async fn test_put_overwrites_and_keeps_id() {
    let (app, store) = seeded_app().await;

    let mut body = article_json("Title Altered", "Content Altered");
    body["id"] = serde_json::json!(99);
    let response = send(&app, "PUT", "/articles/1", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let article: Article = json_body(response).await;
    assert_eq!(article.id, 1);
    assert_eq!(article.title, "Title Altered");
    assert_eq!(article.content, "Content Altered");
    assert!(article.published);

    let stored = store.open().get(1).await.unwrap().unwrap();
    assert_eq!(stored, article);
    assert!(store.open().get(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_missing_is_not_found() {
    let (app, _) = seeded_app().await;

    let response = send(&app, "PUT", "/articles/7", Some(article_json("T", "C"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_post_creates_with_location() {
    let (app, store) = seeded_app().await;

    let response = send(&app, "POST", "/articles", Some(article_json("Title", "Content"))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/articles/4"
    );

    let article: Article = json_body(response).await;
    assert_eq!(article.id, 4);
    assert_eq!(article.title, "Title");
    assert_eq!(store.len().await, 4);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (app, _) = seeded_app().await;

    let first = send(&app, "DELETE", "/articles/2", None).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(body_bytes(first).await.is_empty());

    let second = send(&app, "DELETE", "/articles/2", None).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let gone = send(&app, "GET", "/articles/2", None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let (app, _) = seeded_app().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .unwrap();
    let echoed = app.clone().oneshot(request).await.unwrap();
    assert_eq!(echoed.headers().get("x-request-id").unwrap(), "req-abc");

    let generated = send(&app, "GET", "/health", None).await;
    let id = generated.headers().get("x-request-id").unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_health_reports_service() {
    let (app, _) = seeded_app().await;

    let response = send(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "crossblog");
}

#[tokio::test]
async fn test_malformed_input_is_rejected_before_controller() {
    let (app, store) = seeded_app().await;

    let bad_id = send(&app, "GET", "/articles/not-a-number", None).await;
    assert!(bad_id.status().is_client_error());

    let request = Request::builder()
        .method("POST")
        .uri("/articles")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let bad_body = app.clone().oneshot(request).await.unwrap();
    assert!(bad_body.status().is_client_error());
    assert_eq!(store.len().await, 3);
}

/// Factory whose repositories fail every storage call
#[derive(Clone)]
struct BrokenFactory;

struct BrokenRepo;

#[async_trait]
impl ArticleRepository for BrokenRepo {
    fn query(&self) -> ArticleQuery {
        ArticleQuery::from_articles(Vec::new())
    }

    async fn get(&self, _id: ArticleId) -> RepoResult<Option<Article>> {
        Err(ExError::new(ExErrorKind::Persistence).with_message("database is locked"))
    }

    fn add(&mut self, _article: Article) {}

    fn update(&mut self, _article: Article) {}

    fn remove(&mut self, _article: &Article) {}

    async fn save_changes(&mut self) -> RepoResult<SaveReport> {
        Err(ExError::new(ExErrorKind::Persistence).with_message("database is locked"))
    }
}

impl RepositoryFactory for BrokenFactory {
    type Repository = BrokenRepo;

    fn open(&self) -> BrokenRepo {
        BrokenRepo
    }
}

#[tokio::test]
async fn test_storage_failure_renders_500_with_code() {
    let app = router(BrokenFactory);

    let request = Request::builder()
        .uri("/articles/1")
        .header("x-request-id", "req-fail")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.code, "ERR_PERSISTENCE");
    assert_eq!(body.message, "database is locked");
    assert_eq!(body.request_id.as_deref(), Some("req-fail"));
}
