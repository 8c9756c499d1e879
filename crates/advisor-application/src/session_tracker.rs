//! The session key shared by the client and both stores.

use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the key of the session the client considers open.
///
/// Cloning yields a handle to the same slot, so every component constructed
/// from one tracker observes the same key.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    key: Arc<RwLock<Option<String>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tracked key, if any.
    pub async fn current(&self) -> Option<String> {
        self.key.read().await.clone()
    }

    /// Replaces the tracked key.
    pub async fn set(&self, key: impl Into<String>) {
        let key = key.into();
        tracing::debug!("[SessionTracker] Tracking session {}", key);
        *self.key.write().await = Some(key);
    }

    pub async fn clear(&self) {
        *self.key.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_the_key() {
        let tracker = SessionTracker::new();
        let other = tracker.clone();
        assert_eq!(other.current().await, None);

        tracker.set("abc").await;
        assert_eq!(other.current().await.as_deref(), Some("abc"));

        other.clear().await;
        assert_eq!(tracker.current().await, None);
    }
}
