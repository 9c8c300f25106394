//! In-memory article store
//!
//! A `BTreeMap` keyed by id behind a tokio `RwLock`. Ids come from a
//! counter that only moves forward, so deleted ids are never handed out
//! again.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use crossblog_core::errors::CrossblogError;
use crossblog_core::model::{Article, ArticleId};
use crossblog_core::repository::query::ArticleFilter;
use crossblog_core::repository::{
    ArticleQuery, ArticleRepository, ArticleSource, ChangeSet, PendingChange, RepoResult,
    RepositoryFactory, SaveReport,
};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    articles: BTreeMap<ArticleId, Article>,
    last_id: ArticleId,
}

impl MemoryState {
    /// Apply a change set; on error `self` may be partially modified
    fn apply(&mut self, changes: Vec<PendingChange>) -> RepoResult<SaveReport> {
        let mut report = SaveReport::default();
        for change in changes {
            match change {
                PendingChange::Insert(article) => {
                    self.last_id += 1;
                    let article = article.with_id(self.last_id);
                    self.articles.insert(article.id, article.clone());
                    report.inserted.push(article);
                }
                PendingChange::Update(article) => {
                    let slot = self.articles.get_mut(&article.id).ok_or(
                        CrossblogError::StaleWrite {
                            article_id: article.id,
                            change: "update",
                        },
                    )?;
                    *slot = article;
                    report.updated += 1;
                }
                PendingChange::Delete(id) => {
                    self.articles
                        .remove(&id)
                        .ok_or(CrossblogError::StaleWrite {
                            article_id: id,
                            change: "delete",
                        })?;
                    report.removed += 1;
                }
            }
        }
        Ok(report)
    }
}

/// Shared in-memory backing store
///
/// Cloning is cheap; clones share the same articles.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert articles in one commit and return them with their ids
    pub async fn seed<I>(&self, drafts: I) -> RepoResult<Vec<Article>>
    where
        I: IntoIterator<Item = Article>,
    {
        let mut repo = self.open();
        for draft in drafts {
            repo.add(draft);
        }
        Ok(repo.save_changes().await?.inserted)
    }

    /// Number of stored articles
    pub async fn len(&self) -> usize {
        self.state.read().await.articles.len()
    }

    /// Check if the store holds no articles
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.articles.is_empty()
    }
}

impl RepositoryFactory for MemoryStore {
    type Repository = MemoryArticleRepository;

    fn open(&self) -> MemoryArticleRepository {
        MemoryArticleRepository {
            store: self.clone(),
            pending: ChangeSet::new(),
        }
    }
}

#[async_trait]
impl ArticleSource for MemoryStore {
    async fn fetch(&self, filters: &[ArticleFilter]) -> RepoResult<Vec<Article>> {
        let state = self.state.read().await;
        Ok(state
            .articles
            .values()
            .filter(|article| filters.iter().all(|f| f.matches(article)))
            .cloned()
            .collect())
    }
}

/// Unit of work over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryArticleRepository {
    store: MemoryStore,
    pending: ChangeSet,
}

impl MemoryArticleRepository {
    /// Changes staged since the last commit
    pub fn pending(&self) -> &[PendingChange] {
        self.pending.changes()
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    fn query(&self) -> ArticleQuery {
        ArticleQuery::new(Arc::new(self.store.clone()))
    }

    async fn get(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        Ok(self.store.state.read().await.articles.get(&id).cloned())
    }

    fn add(&mut self, article: Article) {
        self.pending.stage(PendingChange::Insert(article));
    }

    fn update(&mut self, article: Article) {
        self.pending.stage(PendingChange::Update(article));
    }

    fn remove(&mut self, article: &Article) {
        self.pending.stage(PendingChange::Delete(article.id));
    }

    async fn save_changes(&mut self) -> RepoResult<SaveReport> {
        let changes = self.pending.drain();
        if changes.is_empty() {
            return Ok(SaveReport::default());
        }

        let mut state = self.store.state.write().await;
        // Apply to a copy so a failing change leaves the store untouched
        let mut next = state.clone();
        let report = next.apply(changes)?;
        *state = next;

        tracing::debug!(
            inserted = report.inserted.len(),
            updated = report.updated,
            removed = report.removed,
            "memory commit"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossblog_core::ExErrorKind;

    fn draft(title: &str) -> Article {
        Article::draft(title, format!("{} body", title), false, Utc::now())
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let inserted = store.seed(vec![draft("A"), draft("B")]).await.unwrap();

        let ids: Vec<ArticleId> = inserted.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_staged_changes_are_invisible_until_commit() {
        let store = MemoryStore::new();
        let mut repo = store.open();
        repo.add(draft("A"));

        assert_eq!(repo.pending().len(), 1);
        assert!(store.is_empty().await);

        repo.save_changes().await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(repo.pending().is_empty());
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let store = MemoryStore::new();
        let seeded = store.seed(vec![draft("A")]).await.unwrap();

        let mut repo = store.open();
        repo.add(draft("B"));
        repo.update(draft("Ghost").with_id(42));

        let err = repo.save_changes().await.unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Concurrency);
        assert_eq!(store.len().await, 1);

        // The failed insert did not consume an id
        let next = store.seed(vec![draft("C")]).await.unwrap();
        assert_eq!(next[0].id, seeded[0].id + 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let seeded = store.seed(vec![draft("A"), draft("B")]).await.unwrap();

        let mut repo = store.open();
        repo.remove(&seeded[1]);
        repo.save_changes().await.unwrap();

        let next = store.seed(vec![draft("C")]).await.unwrap();
        assert_eq!(next[0].id, 3);
    }

    #[tokio::test]
    async fn test_empty_commit_is_noop() {
        let store = MemoryStore::new();
        let report = store.open().save_changes().await.unwrap();
        assert_eq!(report, SaveReport::default());
    }
}
