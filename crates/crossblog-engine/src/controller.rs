//! Article controller
//!
//! Five operations over an injected [`ArticleRepository`]. "Not found" is an
//! [`Outcome`]; only storage failures come back as `Err`.

use std::time::Instant;

use crossblog_core::errors::CrossblogError;
use crossblog_core::model::{Article, ArticleId, ArticleListModel, ArticleModel};
use crossblog_core::repository::{ArticleRepository, RepoResult};
use crossblog_core::{log_op_end, log_op_error, log_op_start};
use futures::TryStreamExt;

use crate::outcome::Outcome;

/// Handles article requests against one unit of work
#[derive(Debug)]
pub struct ArticlesController<R> {
    repository: R,
}

impl<R: ArticleRepository> ArticlesController<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Articles whose title contains `term`, ignoring case
    ///
    /// An empty term matches every article. Never `NotFound`.
    pub async fn search(&self, term: &str) -> RepoResult<Outcome<ArticleListModel>> {
        log_op_start!("article_search", term = term);
        let start = Instant::now();

        let result = self.search_inner(term).await;

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(list) => {
                log_op_end!(
                    "article_search",
                    duration_ms = elapsed,
                    term = term,
                    match_count = list.len()
                );
            }
            Err(e) => {
                log_op_error!("article_search", *e, duration_ms = elapsed, term = term);
            }
        }
        result.map(Outcome::Ok)
    }

    async fn search_inner(&self, term: &str) -> RepoResult<ArticleListModel> {
        self.repository
            .query()
            .title_contains(term)
            .into_stream()
            .map_ok(ArticleModel::from)
            .try_collect()
            .await
    }

    /// Fetch one article as its wire model
    pub async fn get(&self, id: ArticleId) -> RepoResult<Outcome<ArticleModel>> {
        log_op_start!("article_get", article_id = id);
        let start = Instant::now();

        let result = self
            .repository
            .get(id)
            .await
            .map(|found| Outcome::found(found.map(ArticleModel::from)));

        log_finish("article_get", id, start, &result);
        result
    }

    /// Overwrite an existing article with the model's fields
    ///
    /// The model's `id` is ignored in favour of `id`. There is no version
    /// check, so the last commit wins.
    pub async fn put(
        &mut self,
        id: ArticleId,
        model: ArticleModel,
    ) -> RepoResult<Outcome<Article>> {
        log_op_start!("article_put", article_id = id);
        let start = Instant::now();

        let result = self.put_inner(id, &model).await;

        log_finish("article_put", id, start, &result);
        result
    }

    async fn put_inner(
        &mut self,
        id: ArticleId,
        model: &ArticleModel,
    ) -> RepoResult<Outcome<Article>> {
        let Some(mut article) = self.repository.get(id).await? else {
            return Ok(Outcome::NotFound);
        };

        model.apply_to(&mut article);
        self.repository.update(article.clone());
        self.repository.save_changes().await?;
        Ok(Outcome::Ok(article))
    }

    /// Create an article; the store assigns its id
    pub async fn post(&mut self, model: ArticleModel) -> RepoResult<Outcome<Article>> {
        log_op_start!("article_post");
        let start = Instant::now();

        let result = self.post_inner(&model).await;

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                let article_id = outcome.payload().map(|a| a.id).unwrap_or_default();
                log_op_end!(
                    "article_post",
                    duration_ms = elapsed,
                    article_id = article_id,
                    outcome = outcome.label()
                );
            }
            Err(e) => {
                log_op_error!("article_post", *e, duration_ms = elapsed);
            }
        }
        result
    }

    async fn post_inner(&mut self, model: &ArticleModel) -> RepoResult<Outcome<Article>> {
        self.repository.add(model.to_draft());
        let report = self.repository.save_changes().await?;

        let inserted = report.inserted.len();
        let mut rows = report.inserted.into_iter();
        match (rows.next(), inserted) {
            (Some(article), 1) => Ok(Outcome::Created(article)),
            _ => Err(CrossblogError::InsertCountMismatch {
                expected: 1,
                inserted,
            }
            .into()),
        }
    }

    /// Remove an article
    pub async fn delete(&mut self, id: ArticleId) -> RepoResult<Outcome<()>> {
        log_op_start!("article_delete", article_id = id);
        let start = Instant::now();

        let result = self.delete_inner(id).await;

        log_finish("article_delete", id, start, &result);
        result
    }

    async fn delete_inner(&mut self, id: ArticleId) -> RepoResult<Outcome<()>> {
        let Some(article) = self.repository.get(id).await? else {
            return Ok(Outcome::NotFound);
        };

        self.repository.remove(&article);
        self.repository.save_changes().await?;
        Ok(Outcome::Ok(()))
    }
}

/// Emit the end or end_error event of an id-addressed operation
fn log_finish<T>(
    op: &'static str,
    id: ArticleId,
    start: Instant,
    result: &RepoResult<Outcome<T>>,
) {
    let elapsed = start.elapsed().as_millis() as u64;
    match result {
        Ok(outcome) => {
            log_op_end!(
                op,
                duration_ms = elapsed,
                article_id = id,
                outcome = outcome.label()
            );
        }
        Err(e) => {
            log_op_error!(op, *e, duration_ms = elapsed, article_id = id);
        }
    }
}
