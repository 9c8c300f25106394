//! Crossblog Store - persistence adapters for articles
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - An in-memory store and a SQLite store, both implementing the
//!   article repository contract

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{MemoryArticleRepository, MemoryStore, SqliteArticleRepository, SqliteStore};
