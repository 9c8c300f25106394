//! Lazy, composable article queries
//!
//! An [`ArticleQuery`] is a recipe: a source plus a list of filters. Nothing
//! is read until the query is materialized with [`ArticleQuery::into_stream`],
//! [`ArticleQuery::to_list`] or [`ArticleQuery::count`].
//!
//! Sources may translate filters into their native query language, but the
//! query re-applies every filter to what the source returns, so pushdown only
//! ever narrows the fetch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use super::contract::RepoResult;
use crate::errors::ExError;
use crate::model::Article;

/// Predicate applied to an article by [`ArticleFilter::Matches`]
pub type ArticlePredicate = Arc<dyn Fn(&Article) -> bool + Send + Sync>;

/// A single filter in an article query
#[derive(Clone)]
pub enum ArticleFilter {
    /// Case-insensitive substring match on the title
    TitleContains(String),
    /// Case-insensitive substring match on the content
    ContentContains(String),
    /// Case-insensitive substring match on the title or the content
    TextContains(String),
    /// Exact match on the published flag
    Published(bool),
    /// Arbitrary predicate; never pushed down to a store
    Matches(ArticlePredicate),
}

impl ArticleFilter {
    /// Evaluate this filter against an article
    pub fn matches(&self, article: &Article) -> bool {
        match self {
            ArticleFilter::TitleContains(term) => contains_ignore_case(&article.title, term),
            ArticleFilter::ContentContains(term) => contains_ignore_case(&article.content, term),
            ArticleFilter::TextContains(term) => {
                contains_ignore_case(&article.title, term)
                    || contains_ignore_case(&article.content, term)
            }
            ArticleFilter::Published(flag) => article.published == *flag,
            ArticleFilter::Matches(predicate) => predicate(article),
        }
    }
}

impl fmt::Debug for ArticleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleFilter::TitleContains(term) => f.debug_tuple("TitleContains").field(term).finish(),
            ArticleFilter::ContentContains(term) => {
                f.debug_tuple("ContentContains").field(term).finish()
            }
            ArticleFilter::TextContains(term) => f.debug_tuple("TextContains").field(term).finish(),
            ArticleFilter::Published(flag) => f.debug_tuple("Published").field(flag).finish(),
            ArticleFilter::Matches(_) => f.write_str("Matches(<predicate>)"),
        }
    }
}

/// Case-insensitive substring test; an empty needle matches everything
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Backing source an [`ArticleQuery`] reads from at materialization time
///
/// Rows must come back in the store's natural order (ascending id for the
/// bundled adapters).
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch candidate rows; `filters` is a hint the source may push down
    async fn fetch(&self, filters: &[ArticleFilter]) -> RepoResult<Vec<Article>>;
}

/// Source over a fixed list of articles
///
/// Useful for test doubles and for wrapping rows that are already loaded.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    async fn fetch(&self, _filters: &[ArticleFilter]) -> RepoResult<Vec<Article>> {
        Ok(self.articles.clone())
    }
}

/// Lazy view over the articles of a store
#[derive(Clone)]
pub struct ArticleQuery {
    source: Arc<dyn ArticleSource>,
    filters: Vec<ArticleFilter>,
}

impl ArticleQuery {
    /// Start an unfiltered query over `source`
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source,
            filters: Vec::new(),
        }
    }

    /// Start an unfiltered query over a fixed list of articles
    pub fn from_articles(articles: Vec<Article>) -> Self {
        Self::new(Arc::new(StaticSource::new(articles)))
    }

    /// Add a filter
    pub fn filter_by(mut self, filter: ArticleFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Keep articles whose title contains `term`, ignoring case
    pub fn title_contains(self, term: impl Into<String>) -> Self {
        self.filter_by(ArticleFilter::TitleContains(term.into()))
    }

    /// Keep articles whose content contains `term`, ignoring case
    pub fn content_contains(self, term: impl Into<String>) -> Self {
        self.filter_by(ArticleFilter::ContentContains(term.into()))
    }

    /// Keep articles whose title or content contains `term`, ignoring case
    pub fn text_contains(self, term: impl Into<String>) -> Self {
        self.filter_by(ArticleFilter::TextContains(term.into()))
    }

    /// Keep articles with the given published flag
    pub fn published(self, flag: bool) -> Self {
        self.filter_by(ArticleFilter::Published(flag))
    }

    /// Keep articles matching an arbitrary predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Article) -> bool + Send + Sync + 'static,
    {
        self.filter_by(ArticleFilter::Matches(Arc::new(predicate)))
    }

    /// Filters composed so far
    pub fn filters(&self) -> &[ArticleFilter] {
        &self.filters
    }

    /// Materialize the query as a stream
    ///
    /// The source is read once, when the stream is first polled.
    pub fn into_stream(self) -> BoxStream<'static, RepoResult<Article>> {
        let ArticleQuery { source, filters } = self;
        stream::once(async move {
            let rows = source.fetch(&filters).await?;
            let matched: Vec<RepoResult<Article>> = rows
                .into_iter()
                .filter(|article| filters.iter().all(|f| f.matches(article)))
                .map(Ok)
                .collect();
            Ok::<_, ExError>(stream::iter(matched))
        })
        .try_flatten()
        .boxed()
    }

    /// Materialize the query into a vector
    pub async fn to_list(self) -> RepoResult<Vec<Article>> {
        self.into_stream().try_collect().await
    }

    /// Materialize the query and count the matches
    pub async fn count(self) -> RepoResult<usize> {
        self.into_stream()
            .try_fold(0usize, |n, _| async move { Ok(n + 1) })
            .await
    }
}

impl fmt::Debug for ArticleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleQuery")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}
