//! Crossblog Core - domain model and repository contract
//!
//! This crate provides:
//! - Article and its wire models (`ArticleModel`, `ArticleListModel`)
//! - The repository contract and lazy `ArticleQuery`
//! - The error facility (`ExError`, `ExErrorKind`, `CrossblogError`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod repository;

// Re-export commonly used types
pub use errors::{CrossblogError, ExError, ExErrorKind};
pub use model::{Article, ArticleId, ArticleListModel, ArticleModel};
pub use repository::{
    ArticleQuery, ArticleRepository, PendingChange, RepoResult, RepositoryFactory, SaveReport,
};
