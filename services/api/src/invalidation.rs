//! Cache invalidation signals
//!
//! Mutations that change rendered pages emit the logical path that went
//! stale. Emission is fire-and-forget: failures are logged and never reach
//! the caller.

use common::cache::RedisPool;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Receiver of "this path is stale" signals
pub trait Revalidator: Send + Sync {
    fn revalidate(&self, path: &str);
}

/// Drops every signal
#[derive(Debug, Clone, Default)]
pub struct NoopRevalidator;

impl Revalidator for NoopRevalidator {
    fn revalidate(&self, path: &str) {
        debug!("Ignoring revalidation of {}", path);
    }
}

/// Fans signals out to in-process subscribers
#[derive(Debug, Clone)]
pub struct BroadcastRevalidator {
    sender: broadcast::Sender<String>,
}

impl BroadcastRevalidator {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Revalidator for BroadcastRevalidator {
    fn revalidate(&self, path: &str) {
        // Sending only fails when nobody is subscribed.
        if self.sender.send(path.to_string()).is_err() {
            debug!("No subscribers for revalidation of {}", path);
        }
    }
}

/// Publishes stale paths on a Redis channel and drops the cached page
#[derive(Clone)]
pub struct RedisRevalidator {
    redis: RedisPool,
    channel: String,
}

impl RedisRevalidator {
    pub fn new(redis: RedisPool, channel: impl Into<String>) -> Self {
        Self {
            redis,
            channel: channel.into(),
        }
    }
}

/// Cache key under which the serving layer stores a rendered page
pub fn page_key(path: &str) -> String {
    format!("page:{}", path)
}

impl Revalidator for RedisRevalidator {
    fn revalidate(&self, path: &str) {
        let redis = self.redis.clone();
        let channel = self.channel.clone();
        let path = path.to_string();

        tokio::spawn(async move {
            if let Err(e) = redis.delete(&page_key(&path)).await {
                warn!("Failed to drop cached page {}: {}", path, e);
            }
            match redis.publish(&channel, &path).await {
                Ok(receivers) => debug!("Revalidated {} ({} subscribers)", path, receivers),
                Err(e) => warn!("Failed to publish revalidation of {}: {}", path, e),
            }
        });
    }
}
