//! CLI error type and exit codes.

use celebratorica_core::{LoggingError, ModelError, RepoError, StoreError, TransferError};
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    /// Process exit code for this failure.
    ///
    /// `2` for a missing category or item, `3` for rejected input,
    /// `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Store(StoreError::Repo(err)) => repo_exit_code(err),
            Self::Store(StoreError::Transfer(TransferError::Repo(err))) => repo_exit_code(err),
            Self::Store(StoreError::Transfer(TransferError::Serialization(_)))
            | Self::Store(StoreError::Transfer(TransferError::UnresolvedCategory { .. })) => 3,
            Self::Logging(LoggingError::UnsupportedLevel(_)) => 3,
            _ => 1,
        }
    }
}

fn repo_exit_code(err: &RepoError) -> i32 {
    match err {
        RepoError::CategoryNotFound(_) | RepoError::ItemNotFound(_) => 2,
        RepoError::Validation(ModelError::EmptyCategoryName)
        | RepoError::Validation(ModelError::InvalidOrder(_)) => 3,
        _ => 1,
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Store(StoreError::Repo(value))
    }
}

impl From<TransferError> for CliError {
    fn from(value: TransferError) -> Self {
        Self::Store(StoreError::Transfer(value))
    }
}
