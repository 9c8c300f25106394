use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned article identity
pub type ArticleId = i64;

/// Id carried by an article that has been staged but not yet committed
pub const UNASSIGNED_ID: ArticleId = 0;

/// Article - a blog post as persisted by the repository
///
/// The id is assigned by the store when the article is first committed and
/// never changes or gets reused afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Store-assigned identity (`UNASSIGNED_ID` until committed)
    pub id: ArticleId,

    /// Headline shown in listings and matched by search
    pub title: String,

    /// Body text
    pub content: String,

    /// Whether the article is visible to readers
    pub published: bool,

    /// Publication timestamp
    pub date: DateTime<Utc>,
}

impl Article {
    /// Create an article that has not been persisted yet
    ///
    /// The store replaces the id with a fresh one on commit.
    pub fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        published: bool,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.into(),
            content: content.into(),
            published,
            date,
        }
    }

    /// Check if this article has a store-assigned id
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Return a copy of this article carrying the given identity
    pub fn with_id(mut self, id: ArticleId) -> Self {
        self.id = id;
        self
    }
}
