use std::path::PathBuf;

use thiserror::Error;

/// Local Store persistence errors.
///
/// Reads never produce these: a missing entity is a sentinel and an
/// unparseable collection file self-heals to empty. Only a failed write
/// surfaces an error, because losing a mutation is the one condition the
/// caller must know about.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity could not be serialized for persistence
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data directory could not be created
    #[error("Failed to prepare data directory {0}")]
    DataDir(PathBuf),
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "IO_ERROR",
            StoreError::Serialization(_) => "SERIALIZATION_ERROR",
            StoreError::DataDir(_) => "DATA_DIR_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_error() {
        let err = StoreError::DataDir(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Failed to prepare data directory /nope");
        assert_eq!(err.error_code(), "DATA_DIR_ERROR");
    }
}
