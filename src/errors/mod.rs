//! Domain-specific error types for the sync core
//!
//! - **StoreError**: local persistence failures (IO, serialization)
//! - **GatewayError**: remote backend failures (network, auth, payload)
//! - **SyncError**: reconciliation failures and busy/cancelled signals
//! - **GenerationError**: exhaustion of the generation fallback chain
//!
//! Missing entities are never errors: the Local Store reports them with
//! `Option`/`bool` sentinels, and a corrupted collection file loads as
//! empty. Errors here are reserved for conditions a caller can act on.

pub mod gateway;
pub mod generation;
pub mod store;
pub mod sync;

pub use gateway::GatewayError;
pub use generation::GenerationError;
pub use store::StoreError;
pub use sync::SyncError;

/// Result type alias for Local Store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for Remote Gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type alias for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;
