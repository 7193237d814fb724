use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Book, PageWindow, SearchPage};

/// Read access to the book catalog.
///
/// Every call leases one connection for its whole duration and releases it
/// before returning, whatever the outcome.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Count titles starting with `prefix` and fetch one window of them.
    async fn search(&self, prefix: &str, window: PageWindow) -> Result<SearchPage, StoreError>;

    /// Load one book by identifier; absence is [`StoreError::NotFound`].
    async fn find(&self, id: &str) -> Result<Book, StoreError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Connections currently leased out and not yet released.
    fn leased(&self) -> u32;

    /// Close the backing pool; further calls fail.
    async fn close(&self) {}
}
