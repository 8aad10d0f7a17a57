use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("expense record is missing required fields: {missing:?}")]
    IncompleteRecord { missing: Vec<&'static str> },
}

/// Failures of the external tabular store. Append failures are surfaced to
/// the user and leave the draft intact; probe failures abort bootstrap.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("sheet append failed: {0}")]
    Append(String),
    #[error("sheet store unreachable: {0}")]
    Unreachable(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
