//! Error types for repository operations.
//!
//! Every error carries an [`ErrorContext`] describing where it happened so the
//! HTTP layer can log full detail while answering clients with a generic
//! message.

use std::fmt;

use crate::models::TourValidationError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "insert_tour", "delete_tour")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "tour")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, " [{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Could not reach the store, or the connection dropped.
    #[error("Connection error: {message}{context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// The store rejected or failed a query.
    #[error("Query error: {message}{context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// Requested entity was not found.
    #[error("Not found: {message}{context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Input was rejected before reaching the store.
    #[error("Validation error: {message}{context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// A record with the same unique key already exists.
    #[error("Conflict: {message}{context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message}{context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message}{context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn connection_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context,
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::QueryError {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn validation_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ValidationError {
            message: message.into(),
            context,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn conflict_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// The message without the context suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionError { message, .. }
            | Self::QueryError { message, .. }
            | Self::NotFound { message, .. }
            | Self::ValidationError { message, .. }
            | Self::Conflict { message, .. }
            | Self::ConfigurationError { message, .. }
            | Self::InternalError { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::Conflict { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::Conflict { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add or update the entity ID in the error context.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.context_mut().entity_id = Some(id.to_string());
        self
    }

    /// Errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ValidationError { .. } | Self::Conflict { .. }
        )
    }
}

impl From<TourValidationError> for RepositoryError {
    fn from(err: TourValidationError) -> Self {
        RepositoryError::validation_with_context(
            err.to_string(),
            ErrorContext::default().with_entity("tour"),
        )
    }
}

/// Server error code for a unique index violation.
#[cfg(feature = "mongo-repo")]
const DUPLICATE_KEY_CODE: i32 = 11000;

#[cfg(feature = "mongo-repo")]
impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                RepositoryError::conflict_with_context(
                    write_error.message.clone(),
                    ErrorContext::default().with_details("duplicate_key"),
                )
            }
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => RepositoryError::connection(err.to_string()),
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
                RepositoryError::internal(err.to_string())
            }
            _ => RepositoryError::query(err.to_string()),
        }
    }
}
