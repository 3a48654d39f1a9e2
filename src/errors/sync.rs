use thiserror::Error;

use super::StoreError;

/// Sync Coordinator errors.
///
/// Network-class gateway failures never appear here: the coordinator
/// converts them into an offline-mode outcome so the caller can keep
/// reading from the Local Store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Local persistence failed mid-sync
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Gateway reported a session expiry; cached auth state has already
    /// been cleared
    #[error("Session expired, signed out")]
    SessionExpired,

    /// Another sync for the same project is already in flight
    #[error("Sync already in progress for project {0}")]
    SyncInProgress(String),

    /// The operation's cancel token was triggered
    #[error("Sync cancelled")]
    Cancelled,

    /// The project does not exist in the Local Store
    #[error("Project {0} not found")]
    ProjectNotFound(String),
}

impl SyncError {
    /// Busy and cancelled are transient signals, not failures.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::SyncInProgress(_) | SyncError::Cancelled)
    }
}
