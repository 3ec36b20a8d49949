// Repository trait for realtime feed access
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// One delivery from the realtime database for a collection
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Full, unordered contents of the collection. `Value::Null` when it is empty or absent.
    Snapshot(Value),
    /// The feed reported a failure; the message is passed on untouched
    Failed(String),
}

#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Subscribe to a named collection.
    /// Dropping the returned receiver ends the subscription.
    async fn subscribe(&self, collection: &str) -> anyhow::Result<mpsc::Receiver<FeedEvent>>;
}
