//! Error types.
//!
//! Only configuration can fail. Structural misuse of the recency list is a
//! programming error and panics instead of surfacing here.

use thiserror::Error;

/// Returned when a store is configured with parameters it cannot honour.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The requested capacity was zero. A store must be able to hold at
    /// least one entry.
    #[error("store capacity must be at least 1, got 0")]
    ZeroCapacity,
}
