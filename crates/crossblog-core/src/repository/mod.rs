//! Repository contract between the controller and persistence
//!
//! # Responsibility
//! - Define how articles are queried, fetched and persisted, independent of
//!   storage technology.
//! - Provide the lazy query abstraction used by search.
//!
//! # Invariants
//! - "Not found" is `Ok(None)`, never an error.
//! - Staged changes are applied together by `save_changes` or not at all.

pub mod contract;
pub mod query;

pub use contract::{
    ArticleRepository, ChangeSet, PendingChange, RepoResult, RepositoryFactory, SaveReport,
};
pub use query::{ArticleFilter, ArticleQuery, ArticleSource, StaticSource};
