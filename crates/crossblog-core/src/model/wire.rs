//! Wire models used in request and response bodies
//!
//! Structurally identical to [`Article`] but kept separate so the JSON shape
//! can change without touching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::{Article, ArticleId};

/// Request body for create/update and body of single-article responses
///
/// Every field defaults when missing, so clients may omit `id` on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleModel {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub date: DateTime<Utc>,
}

impl ArticleModel {
    /// Build an unpersisted article from this model
    ///
    /// The model's `id` is ignored; the store assigns identity on commit.
    pub fn to_draft(&self) -> Article {
        Article::draft(
            self.title.clone(),
            self.content.clone(),
            self.published,
            self.date,
        )
    }

    /// Overwrite every field of `article` except its identity
    pub fn apply_to(&self, article: &mut Article) {
        article.title = self.title.clone();
        article.content = self.content.clone();
        article.published = self.published;
        article.date = self.date;
    }
}

impl From<Article> for ArticleModel {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            published: article.published,
            date: article.date,
        }
    }
}

impl From<&Article> for ArticleModel {
    fn from(article: &Article) -> Self {
        article.clone().into()
    }
}

/// Body of search responses
///
/// `articles` serializes as `[]` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleListModel {
    pub articles: Vec<ArticleModel>,
}

impl ArticleListModel {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl FromIterator<ArticleModel> for ArticleListModel {
    fn from_iter<I: IntoIterator<Item = ArticleModel>>(iter: I) -> Self {
        Self {
            articles: iter.into_iter().collect(),
        }
    }
}

impl Extend<ArticleModel> for ArticleListModel {
    fn extend<I: IntoIterator<Item = ArticleModel>>(&mut self, iter: I) {
        self.articles.extend(iter);
    }
}
