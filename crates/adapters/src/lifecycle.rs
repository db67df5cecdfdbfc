//! Initialize/close lifecycle shared by adapter implementations.
//!
//! A [`SessionSlot`] holds whatever an adapter builds in `initialize`
//! (HTTP client, credentials, resolved endpoints). It is written only by
//! `initialize` and `close`; every other call takes a cheap `Arc` clone and
//! fails with [`MarketplaceError::NotInitialized`] while the slot is empty.

use std::sync::Arc;

use marketsync_core::MarketplaceError;
use tokio::sync::RwLock;

/// Holder for an adapter's initialized session.
#[derive(Debug)]
pub struct SessionSlot<S> {
    inner: RwLock<Option<Arc<S>>>,
}

impl<S> Default for SessionSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionSlot<S> {
    /// An empty (uninitialized) slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RwLock::const_new(None),
        }
    }

    /// Current session.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::NotInitialized` if no session is installed.
    pub async fn get(&self) -> Result<Arc<S>, MarketplaceError> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or(MarketplaceError::NotInitialized)
    }

    /// Install a session, returning the one it replaced.
    pub async fn install(&self, session: S) -> Option<Arc<S>> {
        self.inner.write().await.replace(Arc::new(session))
    }

    /// Remove the session. Calling this on an empty slot is a no-op.
    pub async fn take(&self) -> Option<Arc<S>> {
        self.inner.write().await.take()
    }

    /// Whether a session is installed.
    pub async fn is_initialized(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
