//! SQLite article store
//!
//! One connection behind a mutex, driven from `spawn_blocking`. Each
//! repository opened from the store stages changes in memory and commits
//! them in a single transaction.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossblog_core::errors::CrossblogError;
use crossblog_core::model::{Article, ArticleId};
use crossblog_core::repository::query::ArticleFilter;
use crossblog_core::repository::{
    ArticleQuery, ArticleRepository, ArticleSource, ChangeSet, PendingChange, RepoResult,
    RepositoryFactory, SaveReport,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Transaction};

use super::hydration::{encode_date, ArticleRow, ARTICLE_COLUMNS};
use crate::db;
use crate::errors::{from_rusqlite, join_error, lock_poisoned, Result};
use crate::migrations::apply_migrations;

/// Shared SQLite backing store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and bring its schema up to date
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Fresh in-memory database with the schema applied
    pub fn in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap a connection whose schema is already migrated
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| lock_poisoned(op))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| join_error(op, e))?
    }
}

impl RepositoryFactory for SqliteStore {
    type Repository = SqliteArticleRepository;

    fn open(&self) -> SqliteArticleRepository {
        SqliteArticleRepository {
            store: self.clone(),
            pending: ChangeSet::new(),
        }
    }
}

#[async_trait]
impl ArticleSource for SqliteStore {
    async fn fetch(&self, filters: &[ArticleFilter]) -> RepoResult<Vec<Article>> {
        let (sql, params) = select_sql(filters);
        tracing::trace!(%sql, "article fetch");

        self.with_conn("fetch_articles", move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
            let rows = stmt
                .query_map(params_from_iter(params.iter()), ArticleRow::from_row)
                .map_err(from_rusqlite)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(from_rusqlite)?;
            rows.into_iter().map(ArticleRow::into_article).collect()
        })
        .await
    }
}

/// Build the SELECT for a filter list
///
/// Substring filters with a non-empty ASCII term become
/// `instr(lower(col), lower(?))`. SQLite's `lower` only folds ASCII, so a
/// non-ASCII term would drop rows the in-memory match keeps; those terms are
/// left to the query along with predicates and empty terms.
fn select_sql(filters: &[ArticleFilter]) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for filter in filters {
        match filter {
            ArticleFilter::TitleContains(term) if pushable(term) => {
                clauses.push("instr(lower(title), lower(?)) > 0".to_string());
                params.push(Value::Text(term.clone()));
            }
            ArticleFilter::ContentContains(term) if pushable(term) => {
                clauses.push("instr(lower(content), lower(?)) > 0".to_string());
                params.push(Value::Text(term.clone()));
            }
            ArticleFilter::TextContains(term) if pushable(term) => {
                clauses.push(
                    "(instr(lower(title), lower(?)) > 0 OR instr(lower(content), lower(?)) > 0)"
                        .to_string(),
                );
                params.push(Value::Text(term.clone()));
                params.push(Value::Text(term.clone()));
            }
            ArticleFilter::Published(flag) => {
                clauses.push("published = ?".to_string());
                params.push(Value::Integer(i64::from(*flag)));
            }
            _ => {}
        }
    }

    let mut sql = format!("SELECT {} FROM articles", ARTICLE_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id");
    (sql, params)
}

fn pushable(term: &str) -> bool {
    !term.is_empty() && term.is_ascii()
}

/// Unit of work over a [`SqliteStore`]
#[derive(Debug)]
pub struct SqliteArticleRepository {
    store: SqliteStore,
    pending: ChangeSet,
}

impl SqliteArticleRepository {
    /// Changes staged since the last commit
    pub fn pending(&self) -> &[PendingChange] {
        self.pending.changes()
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    fn query(&self) -> ArticleQuery {
        ArticleQuery::new(Arc::new(self.store.clone()))
    }

    async fn get(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.store
            .with_conn("get_article", move |conn| {
                let row = conn
                    .query_row(
                        &format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS),
                        [id],
                        ArticleRow::from_row,
                    )
                    .optional()
                    .map_err(from_rusqlite)?;
                row.map(ArticleRow::into_article).transpose()
            })
            .await
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

        let report = self
            .store
            .with_conn("save_changes", move |conn| {
                let tx = conn.transaction().map_err(from_rusqlite)?;
                let report = apply_changes(&tx, changes)?;
                tx.commit().map_err(from_rusqlite)?;
                Ok(report)
            })
            .await?;

        tracing::debug!(
            inserted = report.inserted.len(),
            updated = report.updated,
            removed = report.removed,
            "sqlite commit"
        );
        Ok(report)
    }
}

/// Apply staged changes inside `tx`; the caller commits
///
/// Returning early drops the transaction, which rolls everything back.
fn apply_changes(tx: &Transaction<'_>, changes: Vec<PendingChange>) -> Result<SaveReport> {
    let mut report = SaveReport::default();

    for change in changes {
        match change {
            PendingChange::Insert(article) => {
                tx.execute(
                    "INSERT INTO articles (title, content, published, date)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![
                        article.title,
                        article.content,
                        article.published,
                        encode_date(&article.date),
                    ],
                )
                .map_err(from_rusqlite)?;
                let id = tx.last_insert_rowid();
                report.inserted.push(article.with_id(id));
            }
            PendingChange::Update(article) => {
                let touched = tx
                    .execute(
                        "UPDATE articles
                         SET title = ?1, content = ?2, published = ?3, date = ?4
                         WHERE id = ?5",
                        rusqlite::params![
                            article.title,
                            article.content,
                            article.published,
                            encode_date(&article.date),
                            article.id,
                        ],
                    )
                    .map_err(from_rusqlite)?;
                if touched == 0 {
                    return Err(CrossblogError::StaleWrite {
                        article_id: article.id,
                        change: "update",
                    }
                    .into());
                }
                report.updated += 1;
            }
            PendingChange::Delete(id) => {
                let touched = tx
                    .execute("DELETE FROM articles WHERE id = ?1", [id])
                    .map_err(from_rusqlite)?;
                if touched == 0 {
                    return Err(CrossblogError::StaleWrite {
                        article_id: id,
                        change: "delete",
                    }
                    .into());
                }
                report.removed += 1;
            }
        }
    }

    Ok(report)
}
