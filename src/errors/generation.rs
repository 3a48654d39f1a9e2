use thiserror::Error;

use super::StoreError;

/// Generation chain errors.
///
/// Tier failures are converted into fallthroughs inside the chain; the
/// template tier is pure local computation and cannot fail, so the only
/// errors that escape are local persistence failures.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Persisting generated entities into the Local Store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The target project does not exist in the Local Store
    #[error("Project {0} not found")]
    ProjectNotFound(String),

    /// The operation's cancel token was triggered
    #[error("Generation cancelled")]
    Cancelled,
}
