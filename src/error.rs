//! Typed failures for the launch workflows.
//!
//! Every failure maps to a stable [`ErrorKind`] so callers can branch on the
//! category without matching message text.
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable classification of workflow failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidAmount,
    NotFound,
    IncompleteInput,
    NoFieldsProvided,
    GenesisParse,
    RemoteFailure,
    Cancelled,
    Workspace,
    Prompt,
    Config,
    Daemon,
}

impl ErrorKind {
    /// Stable error code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "ERR_INVALID_FORMAT",
            ErrorKind::InvalidAmount => "ERR_INVALID_AMOUNT",
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::IncompleteInput => "ERR_INCOMPLETE_INPUT",
            ErrorKind::NoFieldsProvided => "ERR_NO_FIELDS_PROVIDED",
            ErrorKind::GenesisParse => "ERR_GENESIS_PARSE",
            ErrorKind::RemoteFailure => "ERR_REMOTE_FAILURE",
            ErrorKind::Cancelled => "ERR_CANCELLED",
            ErrorKind::Workspace => "ERR_WORKSPACE",
            ErrorKind::Prompt => "ERR_PROMPT",
            ErrorKind::Config => "ERR_CONFIG",
            ErrorKind::Daemon => "ERR_DAEMON",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {what} {input:?}: {reason}")]
    InvalidFormat {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    #[error("{field} is required")]
    IncompleteInput { field: String },

    #[error("at least one of the flags {} must be provided", .flags.join(", "))]
    NoFieldsProvided { flags: Vec<&'static str> },

    #[error("parse genesis {}: {reason}", .path.display())]
    GenesisParse { path: PathBuf, reason: String },

    #[error("{0}")]
    RemoteFailure(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("{context} {}: {source}", .path.display())]
    Workspace {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{program} failed: {detail}")]
    Daemon { program: String, detail: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Error::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::IncompleteInput { .. } => ErrorKind::IncompleteInput,
            Error::NoFieldsProvided { .. } => ErrorKind::NoFieldsProvided,
            Error::GenesisParse { .. } => ErrorKind::GenesisParse,
            Error::RemoteFailure(_) => ErrorKind::RemoteFailure,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Workspace { .. } => ErrorKind::Workspace,
            Error::Prompt(_) => ErrorKind::Prompt,
            Error::Config(_) => ErrorKind::Config,
            Error::Daemon { .. } => ErrorKind::Daemon,
        }
    }

    pub(crate) fn workspace(
        context: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Workspace {
            context,
            path,
            source,
        }
    }

    pub(crate) fn remote(message: impl Into<String>) -> Error {
        Error::RemoteFailure(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fields_message_lists_flags_in_order() {
        let err = Error::NoFieldsProvided {
            flags: vec!["name", "metadata", "total-supply"],
        };
        assert_eq!(
            err.to_string(),
            "at least one of the flags name, metadata, total-supply must be provided"
        );
        assert_eq!(err.kind().code(), "ERR_NO_FIELDS_PROVIDED");
    }

    #[test]
    fn workspace_error_keeps_io_source() {
        let err = Error::workspace("read", "/tmp/x")(std::io::Error::other("boom"));
        assert_eq!(err.kind(), ErrorKind::Workspace);
        assert_eq!(err.to_string(), "read /tmp/x: boom");
        assert!(std::error::Error::source(&err).is_some());
    }
}
