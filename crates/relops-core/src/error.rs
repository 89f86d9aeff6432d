use thiserror::Error;

use crate::schema::DataType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("type mismatch in {context}: {left:?} vs {right:?}")]
    TypeMismatch {
        context: &'static str,
        left: DataType,
        right: DataType,
    },

    #[error("non-numeric value of type {found:?} in field '{field}'")]
    NonNumeric { field: String, found: DataType },

    #[error("unsupported {kind} operator '{op}'")]
    UnsupportedOperator { kind: &'static str, op: String },

    #[error("schema error: {0}")]
    SchemaMismatch(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // Core does no I/O itself; the io crate maps its failures into this.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Coarse classification of an [`Error`], for callers that branch on the
/// violated contract rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FieldResolution,
    TypeMismatch,
    UnsupportedOperator,
    Schema,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownField(_) => ErrorKind::FieldResolution,
            Error::TypeMismatch { .. } | Error::NonNumeric { .. } => ErrorKind::TypeMismatch,
            Error::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            Error::SchemaMismatch(_) => ErrorKind::Schema,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub fn unsupported(kind: &'static str, op: impl Into<String>) -> Self {
        Error::UnsupportedOperator {
            kind,
            op: op.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_distinguish_contracts() {
        assert_eq!(
            Error::UnknownField("x".into()).kind(),
            ErrorKind::FieldResolution
        );
        let mismatch = Error::TypeMismatch {
            context: "filter",
            left: DataType::Int64,
            right: DataType::Utf8,
        };
        assert_eq!(mismatch.kind(), ErrorKind::TypeMismatch);
        let non_numeric = Error::NonNumeric {
            field: "name".into(),
            found: DataType::Utf8,
        };
        assert_eq!(non_numeric.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            Error::unsupported("aggregate", "median").kind(),
            ErrorKind::UnsupportedOperator
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = Error::UnknownField("salary".into());
        assert!(err.to_string().contains("salary"));
        let err = Error::unsupported("join", "<");
        assert_eq!(err.to_string(), "unsupported join operator '<'");
    }
}
