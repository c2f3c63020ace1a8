//! Redis-backed view cache adapter.
//!
//! Rendered views are cached under namespaced keys
//! (`flashdeck:view:v1:<path>`). Invalidation deletes the keys for every
//! affected view in one `DEL`; bumping the version segment retires every
//! cached view at once.

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ViewPath;
use crate::domain::ports::{ViewCache, ViewCacheError};

const KEY_PREFIX: &str = "flashdeck:view:v1:";

/// Cache key for a rendered view.
pub fn view_key(view: &ViewPath) -> String {
    format!("{KEY_PREFIX}{view}")
}

/// View cache backed by a `bb8` pool of Redis connections.
#[derive(Clone)]
pub struct RedisViewCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisViewCache {
    /// Connect to `redis_url`.
    ///
    /// # Errors
    /// Returns [`ViewCacheError::Connection`] when the URL is invalid or the
    /// pool cannot be built.
    pub async fn connect(redis_url: &str) -> Result<Self, ViewCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| ViewCacheError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| ViewCacheError::connection(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ViewCache for RedisViewCache {
    async fn invalidate(&self, views: &[ViewPath]) -> Result<(), ViewCacheError> {
        if views.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = views.iter().map(view_key).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ViewCacheError::connection(err.to_string()))?;
        let removed: usize = conn
            .del(&keys)
            .await
            .map_err(|err| ViewCacheError::command(err.to_string()))?;
        debug!(?keys, removed, "views invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeckId;
    use rstest::rstest;

    #[rstest]
    #[case(ViewPath::DeckList, "flashdeck:view:v1:/dashboard")]
    #[case(ViewPath::DeckDetail(DeckId::new(42)), "flashdeck:view:v1:/dashboard/42")]
    fn keys_are_namespaced_by_view_path(#[case] view: ViewPath, #[case] expected: &str) {
        assert_eq!(view_key(&view), expected);
    }

    #[tokio::test]
    async fn malformed_urls_fail_to_connect() {
        let result = RedisViewCache::connect("not a url").await;
        assert!(matches!(result, Err(ViewCacheError::Connection { .. })));
    }
}
