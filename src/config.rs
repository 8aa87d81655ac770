//! Store Configuration
//!
//! Configuration structs have public fields for simple instantiation. The
//! capacity is a [`NonZeroUsize`], so a config built from the struct literal
//! is valid by construction; [`LruStoreConfig::new`] is the checked entry
//! point for capacities that arrive as plain integers (CLI flags, settings
//! files).
//!
//! # Examples
//!
//! ```
//! use lru_store::config::LruStoreConfig;
//! use lru_store::LruStore;
//! use core::num::NonZeroUsize;
//!
//! let config = LruStoreConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let store: LruStore<String, i32> = LruStore::init(config, None);
//! assert_eq!(store.cap().get(), 1000);
//!
//! assert!(LruStoreConfig::new(0).is_err());
//! ```

use crate::error::ConfigurationError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an [`LruStore`](crate::LruStore).
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the store holds once a touch has
///   completed. Inserting past it evicts the least recently used entry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruStoreConfig {
    /// Maximum number of key-value pairs the store can hold.
    pub capacity: NonZeroUsize,
}

impl LruStoreConfig {
    /// Builds a config from an unchecked capacity.
    ///
    /// Fails with [`ConfigurationError::ZeroCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigurationError::ZeroCapacity)?;
        Ok(LruStoreConfig { capacity })
    }
}

impl TryFrom<usize> for LruStoreConfig {
    type Error = ConfigurationError;

    fn try_from(capacity: usize) -> Result<Self, Self::Error> {
        LruStoreConfig::new(capacity)
    }
}

impl fmt::Debug for LruStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStoreConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
