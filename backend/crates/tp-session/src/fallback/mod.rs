pub mod error;
pub mod file_store;
pub mod memory_store;

use crate::fallback::error::Result as StoreResult;

/// Durable key/value cache kept next to the client.
///
/// Never authoritative: callers log write failures and carry on.
pub trait FallbackStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key succeeds
    fn remove(&self, key: &str) -> StoreResult<()>;
}
