use std::error::Error as StdError;

use thiserror::Error;

/// Error reported by the native client, kept as-is so callers can still see
/// the vendor detail behind a portable error kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// SQLSTATE code, when the server produced one.
    pub code: Option<String>,
    pub message: String,
}

impl DriverError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// An error with no SQLSTATE code, e.g. an I/O or decoding failure.
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl From<tokio_postgres::Error> for DriverError {
    fn from(error: tokio_postgres::Error) -> Self {
        match error.as_db_error() {
            Some(db) => Self::new(Some(db.code().code()), db.message()),
            None => Self::new(error.code().map(|c| c.code()), message_with_sources(&error)),
        }
    }
}

/// Renders an error followed by each of its causes, `outer: inner: root`.
/// A cause already present in the text is not repeated.
pub(crate) fn message_with_sources(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}

/// Error type for pgconn operations
#[derive(Debug, Error)]
pub enum PgConnError {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] DriverError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{context}: {message}")]
    InvalidInput { context: String, message: String },

    #[error("{context}: table not found")]
    TableNotFound {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: column not found")]
    ColumnNotFound {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: index not found")]
    IndexNotFound {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: table already exists")]
    DuplicateTable {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: column already exists")]
    DuplicateColumn {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: index already exists")]
    DuplicateIndex {
        context: String,
        #[source]
        source: Option<DriverError>,
    },

    #[error("{context}: {source}")]
    Database {
        context: String,
        #[source]
        source: DriverError,
    },
}

impl PgConnError {
    /// The native error behind this one, if any.
    pub fn native(&self) -> Option<&DriverError> {
        match self {
            PgConnError::ConnectionFailed(source) | PgConnError::Database { source, .. } => {
                Some(source)
            }
            PgConnError::TableNotFound { source, .. }
            | PgConnError::ColumnNotFound { source, .. }
            | PgConnError::IndexNotFound { source, .. }
            | PgConnError::DuplicateTable { source, .. }
            | PgConnError::DuplicateColumn { source, .. }
            | PgConnError::DuplicateIndex { source, .. } => source.as_ref(),
            PgConnError::NotConnected
            | PgConnError::AlreadyConnected
            | PgConnError::NotSupported(_)
            | PgConnError::Config(_)
            | PgConnError::InvalidInput { .. } => None,
        }
    }

    /// SQLSTATE code of the native error, if any.
    pub fn code(&self) -> Option<&str> {
        self.native().and_then(|e| e.code.as_deref())
    }

    /// The operation that produced this error, for translated, database and
    /// input errors.
    pub fn context(&self) -> Option<&str> {
        match self {
            PgConnError::TableNotFound { context, .. }
            | PgConnError::ColumnNotFound { context, .. }
            | PgConnError::IndexNotFound { context, .. }
            | PgConnError::DuplicateTable { context, .. }
            | PgConnError::DuplicateColumn { context, .. }
            | PgConnError::DuplicateIndex { context, .. }
            | PgConnError::Database { context, .. }
            | PgConnError::InvalidInput { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Result type alias for pgconn operations
pub type Result<T> = std::result::Result<T, PgConnError>;

/// Result type returned by native drivers.
pub type DriverResult<T> = std::result::Result<T, DriverError>;
