use async_trait::async_trait;

use super::query::ArticleQuery;
use crate::errors::ExError;
use crate::model::{Article, ArticleId};

/// Result type for repository operations
pub type RepoResult<T> = std::result::Result<T, ExError>;

/// A change staged on a repository, applied by `save_changes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Insert a new article; its id is assigned on commit
    Insert(Article),
    /// Overwrite every non-id field of an existing article
    Update(Article),
    /// Delete an existing article
    Delete(ArticleId),
}

impl PendingChange {
    /// Short label used in logs and error context
    pub fn label(&self) -> &'static str {
        match self {
            PendingChange::Insert(_) => "insert",
            PendingChange::Update(_) => "update",
            PendingChange::Delete(_) => "delete",
        }
    }
}

/// Summary of one committed unit of work
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Inserted articles with their assigned ids, in staging order
    pub inserted: Vec<Article>,
    /// Number of articles overwritten
    pub updated: usize,
    /// Number of articles deleted
    pub removed: usize,
}

impl SaveReport {
    /// Total number of rows touched by the commit
    pub fn affected(&self) -> usize {
        self.inserted.len() + self.updated + self.removed
    }
}

/// Persistence contract the article controller depends on
///
/// One repository instance is one unit of work: `add`, `update` and `remove`
/// only stage changes, and `save_changes` commits everything staged since the
/// last commit as a single atomic step. Absence is reported as `Ok(None)`,
/// never as an error; storage faults propagate as `ExError`.
///
/// There is no version check on `update`: two units of work that overwrite
/// the same article both succeed and the last commit wins.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Lazy, composable view over all stored articles
    fn query(&self) -> ArticleQuery;

    /// Fetch one article by id
    async fn get(&self, id: ArticleId) -> RepoResult<Option<Article>>;

    /// Stage a new article; any id it carries is ignored
    fn add(&mut self, article: Article);

    /// Stage an overwrite of an existing article
    fn update(&mut self, article: Article);

    /// Stage removal of an existing article
    fn remove(&mut self, article: &Article);

    /// Commit all staged changes as one unit
    async fn save_changes(&mut self) -> RepoResult<SaveReport>;
}

/// Hands out one repository per request
pub trait RepositoryFactory: Send + Sync + 'static {
    type Repository: ArticleRepository + 'static;

    /// Open a fresh unit of work over the shared store
    fn open(&self) -> Self::Repository;
}

/// Staging buffer shared by the bundled repository adapters
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<PendingChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, change: PendingChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Staged changes in staging order
    pub fn changes(&self) -> &[PendingChange] {
        &self.changes
    }

    /// Take every staged change, leaving the set empty
    pub fn drain(&mut self) -> Vec<PendingChange> {
        std::mem::take(&mut self.changes)
    }
}
