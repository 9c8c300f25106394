//! Hydration layer - converts between SQLite rows and articles
//!
//! Dates are stored as RFC 3339 text with nanosecond precision so a
//! round trip through the database returns the exact timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use crossblog_core::errors::{CrossblogError, ExError};
use crossblog_core::model::{Article, ArticleId};
use rusqlite::Row;

/// Column list shared by every article SELECT
pub const ARTICLE_COLUMNS: &str = "id, title, content, published, date";

/// Raw article row as read from SQLite, before date decoding
#[derive(Debug)]
pub struct ArticleRow {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub date: String,
}

impl ArticleRow {
    /// Read a row selected with [`ARTICLE_COLUMNS`]
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            published: row.get(3)?,
            date: row.get(4)?,
        })
    }

    /// Decode into a domain article
    pub fn into_article(self) -> Result<Article, ExError> {
        let date = decode_date(&self.date).map_err(|reason| {
            ExError::from(CrossblogError::CorruptRow {
                article_id: self.id,
                reason,
            })
        })?;

        Ok(Article {
            id: self.id,
            title: self.title,
            content: self.content,
            published: self.published,
            date,
        })
    }
}

/// Encode a timestamp for storage
pub fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decode a stored timestamp
pub fn decode_date(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| format!("invalid date '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_round_trip_keeps_nanoseconds() {
        let date = Utc
            .with_ymd_and_hms(2018, 6, 1, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
            .unwrap();

        let encoded = encode_date(&date);
        assert_eq!(encoded, "2018-06-01T12:00:00.123456789Z");
        assert_eq!(decode_date(&encoded).unwrap(), date);
    }

    #[test]
    fn test_corrupt_date_reports_row() {
        let row = ArticleRow {
            id: 5,
            title: "t".to_string(),
            content: "c".to_string(),
            published: false,
            date: "yesterday".to_string(),
        };

        let err = row.into_article().unwrap_err();
        assert_eq!(err.entity_id(), Some("5"));
        assert_eq!(err.code(), "ERR_SERIALIZATION");
    }
}
