// Controller behaviour against the bundled in-memory store

use chrono::{TimeZone, Utc};
use crossblog_core::model::{Article, ArticleModel};
use crossblog_core::repository::RepositoryFactory;
use crossblog_engine::{ArticlesController, Outcome};
use crossblog_store::MemoryStore;
use proptest::prelude::*;

fn model(title: &str) -> ArticleModel {
    ArticleModel {
        id: 0,
        title: title.to_string(),
        content: format!("{} content", title),
        published: false,
        date: Utc.with_ymd_and_hms(2018, 7, 1, 0, 0, 0).unwrap(),
    }
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed((1..=3).map(|n| {
            Article::draft(
                format!("Title{}", n),
                format!("Content{}", n),
                true,
                Utc::now(),
            )
        }))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let store = MemoryStore::new();

    let created = ArticlesController::new(store.open())
        .post(model("Fresh"))
        .await
        .unwrap();
    let Outcome::Created(article) = created else {
        panic!("expected Created, got {:?}", created);
    };
    assert!(article.is_persisted());

    let fetched = ArticlesController::new(store.open())
        .get(article.id)
        .await
        .unwrap();
    assert_eq!(fetched, Outcome::Ok(ArticleModel::from(&article)));
}

#[tokio::test]
async fn test_post_ignores_inbound_id() {
    let store = seeded_store().await;
    let mut body = model("Fourth");
    body.id = 1;

    let created = ArticlesController::new(store.open())
        .post(body)
        .await
        .unwrap()
        .into_payload()
        .unwrap();

    assert_eq!(created.id, 4);
    assert_eq!(store.len().await, 4);
}

#[tokio::test]
async fn test_delete_twice_is_ok_then_not_found() {
    let store = seeded_store().await;

    let first = ArticlesController::new(store.open()).delete(2).await.unwrap();
    let second = ArticlesController::new(store.open()).delete(2).await.unwrap();

    assert_eq!(first, Outcome::Ok(()));
    assert_eq!(second, Outcome::NotFound);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_put_is_visible_to_later_requests() {
    let store = seeded_store().await;

    let updated = ArticlesController::new(store.open())
        .put(1, model("Title Altered"))
        .await
        .unwrap();
    assert!(matches!(updated, Outcome::Ok(ref a) if a.id == 1));

    let found = ArticlesController::new(store.open())
        .search("altered")
        .await
        .unwrap()
        .into_payload()
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.articles[0].id, 1);
}

#[tokio::test]
async fn test_concurrent_puts_last_writer_wins() {
    let store = seeded_store().await;

    let mut first = ArticlesController::new(store.open());
    let mut second = ArticlesController::new(store.open());

    let (a, b) = tokio::join!(first.put(3, model("From A")), second.put(3, model("From B")));
    assert!(matches!(a.unwrap(), Outcome::Ok(_)));
    assert!(matches!(b.unwrap(), Outcome::Ok(_)));

    let stored = ArticlesController::new(store.open())
        .get(3)
        .await
        .unwrap()
        .into_payload()
        .unwrap();
    assert!(stored.title == "From A" || stored.title == "From B");
}

#[tokio::test]
async fn test_empty_term_returns_everything() {
    let store = seeded_store().await;

    let list = ArticlesController::new(store.open())
        .search("")
        .await
        .unwrap()
        .into_payload()
        .unwrap();
    assert_eq!(list.len(), 3);
}

proptest! {
    #[test]
    fn prop_search_count_matches_title_filter(
        titles in proptest::collection::vec("[a-cA-C]{0,6}", 0..8),
        term in "[a-cA-C]{0,3}",
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (found, expected) = runtime.block_on(async {
            let store = MemoryStore::new();
            store
                .seed(titles.iter().map(|t| Article::draft(t.clone(), "", false, Utc::now())))
                .await
                .unwrap();

            let found = ArticlesController::new(store.open())
                .search(&term)
                .await
                .unwrap()
                .into_payload()
                .unwrap();
            let expected = titles
                .iter()
                .filter(|t| t.to_lowercase().contains(&term.to_lowercase()))
                .count();
            (found.len(), expected)
        });

        prop_assert_eq!(found, expected);
    }
}
