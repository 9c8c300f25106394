// File-backed SQLite store tests

use chrono::{TimeZone, Utc};
use crossblog_core::model::Article;
use crossblog_core::repository::{ArticleRepository, RepositoryFactory};
use crossblog_store::SqliteStore;

#[tokio::test]
async fn test_articles_survive_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("crossblog.db");
    let date = Utc.with_ymd_and_hms(2018, 3, 14, 15, 9, 26).unwrap();

    let inserted = {
        let store = SqliteStore::connect(&path).unwrap();
        let mut repo = store.open();
        repo.add(Article::draft("Durable", "Written to disk", true, date));
        repo.save_changes().await.unwrap().inserted
    };

    let store = SqliteStore::connect(&path).unwrap();
    let fetched = store.open().get(inserted[0].id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Durable");
    assert_eq!(fetched.date, date);
    assert!(fetched.published);
}

#[tokio::test]
async fn test_ids_not_reused_across_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crossblog.db");
    let date = Utc::now();

    {
        let store = SqliteStore::connect(&path).unwrap();
        let mut repo = store.open();
        repo.add(Article::draft("A", "a", false, date));
        repo.add(Article::draft("B", "b", false, date));
        let inserted = repo.save_changes().await.unwrap().inserted;
        repo.remove(&inserted[1]);
        repo.save_changes().await.unwrap();
    }

    let store = SqliteStore::connect(&path).unwrap();
    let mut repo = store.open();
    repo.add(Article::draft("C", "c", false, date));
    let next = repo.save_changes().await.unwrap().inserted;
    assert_eq!(next[0].id, 3);
}

#[tokio::test]
async fn test_case_insensitive_search_after_pushdown() {
    let store = SqliteStore::in_memory().unwrap();
    let mut repo = store.open();
    repo.add(Article::draft("Rust Patterns", "x", true, Utc::now()));
    repo.add(Article::draft("Gardening", "y", true, Utc::now()));
    repo.save_changes().await.unwrap();

    let found = repo.query().title_contains("rUsT").to_list().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Rust Patterns");

    let by_text = repo.query().text_contains("Y").to_list().await.unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].title, "Gardening");
}
