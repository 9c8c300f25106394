//! Repository adapters
//!
//! Both adapters implement the article repository contract from
//! `crossblog-core`: `MemoryStore` for tests and throwaway servers,
//! `SqliteStore` for durable storage.

pub mod hydration;
pub mod memory;
pub mod sqlite_repo;

pub use memory::{MemoryArticleRepository, MemoryStore};
pub use sqlite_repo::{SqliteArticleRepository, SqliteStore};
