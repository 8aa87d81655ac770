#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        LruStore<K, V, S>                         │
//! │                                                                  │
//! │   KeyIndex (K → NodeId)          RecencyList<(K, V)>             │
//! │   ┌───────────────────┐                                          │
//! │   │ "Dog"  → #3  ─────┼──▶ [front] ⇄ #3 ⇄ #4 ⇄ #2 ⇄ [back]       │
//! │   │ "Tee"  → #4  ─────┼──────────────────▲    ▲                  │
//! │   │ "Soda" → #2  ─────┼───────────────────────┘                  │
//! │   └───────────────────┘         most recent ─▶ least recent      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Cost | Changes recency |
//! |-----------|------|-----------------|
//! | [`LruStore::touch`] | O(1) | yes |
//! | [`LruStore::touch_with`] | O(1) | yes |
//! | [`LruStore::get`] / [`LruStore::get_mut`] | O(1) | yes |
//! | [`LruStore::peek`] / [`LruStore::contains`] | O(1) | no |
//! | [`LruStore::remove`] / [`LruStore::pop_lru`] | O(1) | n/a |
//! | [`LruStore::snapshot`] / [`LruStore::iter`] | O(n) | no |
//!
//! ## Modules
//!
//! - [`store`]: the store and its touch/evict protocol
//! - [`config`]: store configuration
//! - [`error`]: configuration errors
//! - [`metrics`]: usage counters

#![no_std]

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

/// Sentinel-anchored doubly linked list holding entries in recency order.
///
/// Internal infrastructure: nodes are addressed by arena handles that only
/// the store hands out and consumes.
pub(crate) mod list;

/// Key → list node index.
pub(crate) mod index;

/// Store configuration.
pub mod config;

/// Error types.
pub mod error;

/// Usage counters and the metrics reporting trait.
pub mod metrics;

/// Fixed-capacity Least Recently Used store.
pub mod store;

pub use config::LruStoreConfig;
pub use error::ConfigurationError;
pub use index::DefaultHashBuilder;
pub use metrics::{CacheMetrics, StoreMetrics};
pub use store::LruStore;
