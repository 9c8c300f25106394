use crossblog_core_types::RequestId;
use thiserror::Error;

use crate::model::ArticleId;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in logs and in the body of
/// 5xx responses. "Article not found" is deliberately absent from the
/// controller's error path: it is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Concurrency,

    // Environment
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Repository adapters and the controller report failures with this type.
/// Classification lives in `kind`; the remaining fields are context for logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain-level failures raised by the repository adapters and controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrossblogError {
    /// A staged update or removal targeted a row that no longer exists at commit
    #[error("Article {article_id} changed underneath a pending {change}")]
    StaleWrite {
        article_id: ArticleId,
        change: &'static str,
    },

    /// A commit that staged an insert came back without an inserted row
    #[error("Commit reported {inserted} inserted articles, expected {expected}")]
    InsertCountMismatch { expected: usize, inserted: usize },

    /// A stored column could not be decoded into the domain model
    #[error("Corrupt article row {article_id}: {reason}")]
    CorruptRow { article_id: ArticleId, reason: String },
}

impl From<CrossblogError> for ExError {
    fn from(err: CrossblogError) -> Self {
        let message = err.to_string();
        match err {
            CrossblogError::StaleWrite { article_id, change } => {
                ExError::new(ExErrorKind::Concurrency)
                    .with_op(format!("save_changes.{}", change))
                    .with_entity_id(article_id.to_string())
                    .with_message(message)
            }
            CrossblogError::InsertCountMismatch { .. } => ExError::new(ExErrorKind::Internal)
                .with_op("save_changes")
                .with_message(message),
            CrossblogError::CorruptRow { article_id, .. } => {
                ExError::new(ExErrorKind::Serialization)
                    .with_entity_id(article_id.to_string())
                    .with_message(message)
            }
        }
    }
}
