use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type returned by hearth operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A referenced post, comment, user or relationship is absent.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Option<String> },

    /// Input failed validation before reaching the store.
    #[error("invalid input")]
    InvalidInput(#[from] ValidationError),

    /// The caller does not own the record it tried to mutate.
    #[error("unauthorized: {action}")]
    Unauthorized { action: Cow<'static, str> },

    /// A composite key already exists (or vanished) underneath a mutation.
    #[error("conflict on {key}")]
    Conflict { key: String },

    /// Underlying Redis command failed.
    #[error("store unavailable: {0}")]
    Store(#[from] redis::RedisError),

    /// A stored record or a script reply could not be decoded. Resubmitting will not help.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl FeedError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: Some(id.into()),
        }
    }

    pub fn invalid(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput(ValidationError::single(field, code, message))
    }

    /// Classifies the error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::NotFound { .. } => ErrorKind::NotFound,
            FeedError::InvalidInput(_) => ErrorKind::InvalidInput,
            FeedError::Unauthorized { .. } => ErrorKind::Unauthorized,
            FeedError::Conflict { .. } => ErrorKind::Conflict,
            FeedError::Store(_) => ErrorKind::StoreUnavailable,
            FeedError::Other { .. } => ErrorKind::Internal,
        }
    }
}

/// Caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Unauthorized,
    Conflict,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    /// Only infrastructure failures are worth re-submitting unchanged.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::StoreUnavailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    /// First issue message, used for short user-facing renderings.
    pub fn summary(&self) -> String {
        self.issues
            .first()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .unwrap_or_else(|| "invalid input".to_string())
    }
}

/// Detailed validation failure for a single field or logical path.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Discriminated result handed to callers of the public surface.
///
/// Serializes as `{"ok":true,"data":...}` or
/// `{"ok":false,"error_kind":"NOT_FOUND","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResult<T> {
    Ok { ok: Truthy, data: T },
    Err { ok: Falsy, error_kind: ErrorKind, message: String },
}

/// Serializes as the literal `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Truthy;

/// Serializes as the literal `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Falsy;

impl Serialize for Truthy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl Serialize for Falsy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(false)
    }
}

impl<T> ActionResult<T> {
    pub fn success(data: T) -> Self {
        ActionResult::Ok { ok: Truthy, data }
    }

    pub fn failure(error: &FeedError) -> Self {
        let message = match error {
            FeedError::InvalidInput(validation) => validation.summary(),
            other => other.to_string(),
        };
        ActionResult::Err {
            ok: Falsy,
            error_kind: error.kind(),
            message,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ActionResult::Ok { .. } => None,
            ActionResult::Err { error_kind, .. } => Some(*error_kind),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ActionResult::Ok { data, .. } => Some(data),
            ActionResult::Err { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ActionResult::Ok { data, .. } => Some(data),
            ActionResult::Err { .. } => None,
        }
    }
}

impl<T> From<Result<T, FeedError>> for ActionResult<T> {
    fn from(result: Result<T, FeedError>) -> Self {
        match result {
            Ok(data) => ActionResult::success(data),
            Err(err) => ActionResult::failure(&err),
        }
    }
}
