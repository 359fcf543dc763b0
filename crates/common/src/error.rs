use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a statement was refused by a read-only session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOnlyReason {
    /// The client talks HTTP and used GET, which always implies read-only.
    HttpGet,
    /// The session's `readonly` setting forbids modification.
    Session,
    /// Refusal raised by a handler's own check, with its own wording.
    Statement(String),
}

impl fmt::Display for ReadOnlyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadOnlyReason::HttpGet => write!(
                f,
                "Cannot execute query in readonly mode. For queries over HTTP, method GET implies readonly. \
                 You should use method POST for modifying queries"
            ),
            ReadOnlyReason::Session => write!(f, "Cannot execute query in readonly mode"),
            ReadOnlyReason::Statement(message) => write!(f, "{}", message),
        }
    }
}

/// User-actionable policy rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{reason}")]
    ReadOnly { reason: ReadOnlyReason },

    #[error("Cannot execute query. DDL queries are prohibited for the user")]
    DdlProhibited,
}

impl AccessError {
    pub fn readonly(reason: ReadOnlyReason) -> Self {
        AccessError::ReadOnly { reason }
    }

    pub fn readonly_statement(message: impl Into<String>) -> Self {
        AccessError::ReadOnly {
            reason: ReadOnlyReason::Statement(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Unknown type of query: {label}")]
    UnrecognizedStatementKind { label: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Database {0} doesn't exist")]
    UnknownDatabase(String),

    #[error("Table {0} doesn't exist")]
    UnknownTable(String),

    #[error("Database {0} already exists")]
    DatabaseAlreadyExists(String),

    #[error("Table {0} already exists")]
    TableAlreadyExists(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown setting {0}")]
    UnknownSetting(String),

    #[error("Query was cancelled: {0}")]
    QueryWasCancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl Error {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Error::ParseError(message.into())
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Error::InvalidQuery(message.into())
    }

    pub fn unsupported_feature(message: impl Into<String>) -> Self {
        Error::UnsupportedFeature(message.into())
    }

    pub fn unrecognized_statement(label: impl Into<String>) -> Self {
        Error::UnrecognizedStatementKind {
            label: label.into(),
        }
    }

    /// Defects (parser/dispatcher skew, broken invariants) rather than
    /// anything the user can fix by rewriting the statement.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::UnrecognizedStatementKind { .. } | Error::InternalError(_)
        )
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::Access(_))
    }

    pub fn access_error(&self) -> Option<&AccessError> {
        match self {
            Error::Access(access) => Some(access),
            _ => None,
        }
    }
}
