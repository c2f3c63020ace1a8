//! Port for invalidating cached views after a committed write.

use async_trait::async_trait;

use crate::domain::ViewPath;

use super::define_port_error;

define_port_error! {
    /// Errors raised by view cache adapters.
    pub enum ViewCacheError {
        /// Cache backend could not be reached.
        Connection { message: String } =>
            "view cache connection failed: {message}",
        /// The invalidation command failed.
        Command { message: String } =>
            "view cache command failed: {message}",
    }
}

/// Port marking rendered views stale.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewCache: Send + Sync {
    /// Invalidate every view in `views`.
    async fn invalidate(&self, views: &[ViewPath]) -> Result<(), ViewCacheError>;
}

/// Cache used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpViewCache;

#[async_trait]
impl ViewCache for NoOpViewCache {
    async fn invalidate(&self, _views: &[ViewPath]) -> Result<(), ViewCacheError> {
        Ok(())
    }
}
