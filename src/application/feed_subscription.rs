// Feed subscription - owns the live view of one collection
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::feed_repository::{FeedEvent, FeedRepository};
use crate::application::latest_selector::{Selection, reduce_snapshot};
use crate::domain::telemetry::TimestampedRecord;

/// Current state of a subscribed collection
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView<R> {
    Loading,
    NoData { malformed: usize },
    Failed(String),
    Ready(Selection<R>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Loading,
    NoData,
    Error,
    Ready,
}

impl<R> FeedView<R> {
    fn from_selection(selection: Selection<R>) -> Self {
        if selection.is_empty() {
            FeedView::NoData {
                malformed: selection.issues().len(),
            }
        } else {
            FeedView::Ready(selection)
        }
    }

    pub fn state(&self) -> FeedState {
        match self {
            FeedView::Loading => FeedState::Loading,
            FeedView::NoData { .. } => FeedState::NoData,
            FeedView::Failed(_) => FeedState::Error,
            FeedView::Ready(_) => FeedState::Ready,
        }
    }

    pub fn selection(&self) -> Option<&Selection<R>> {
        match self {
            FeedView::Ready(selection) => Some(selection),
            _ => None,
        }
    }

    /// Number of records skipped in the last snapshot
    pub fn malformed(&self) -> usize {
        match self {
            FeedView::NoData { malformed } => *malformed,
            FeedView::Ready(selection) => selection.issues().len(),
            _ => 0,
        }
    }

    /// Feed failure message, exactly as reported by the feed
    pub fn error(&self) -> Option<&str> {
        match self {
            FeedView::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub struct FeedSubscription<R> {
    collection: String,
    view: watch::Receiver<FeedView<R>>,
    task: JoinHandle<()>,
}

impl<R> FeedSubscription<R>
where
    R: TimestampedRecord + DeserializeOwned + Send + Sync + 'static,
{
    /// Subscribe to `collection` and start maintaining its latest-record view.
    pub fn start(repository: Arc<dyn FeedRepository>, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        let (tx, view) = watch::channel(FeedView::Loading);

        tracing::info!("Subscribing to feed {}", collection);
        let task = tokio::spawn(run_subscription(repository, collection.clone(), tx));

        Self {
            collection,
            view,
            task,
        }
    }
}

impl<R> FeedSubscription<R> {
    /// Handle for readers; sees every view published from now on
    pub fn watch(&self) -> watch::Receiver<FeedView<R>> {
        self.view.clone()
    }

    /// Unsubscribe. The last published view stays readable through existing handles.
    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
        tracing::info!("Unsubscribed from feed {}", self.collection);
    }
}

async fn run_subscription<R>(
    repository: Arc<dyn FeedRepository>,
    collection: String,
    tx: watch::Sender<FeedView<R>>,
) where
    R: TimestampedRecord + DeserializeOwned,
{
    let mut events = match repository.subscribe(&collection).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Could not subscribe to feed {}: {:#}", collection, e);
            tx.send_replace(FeedView::Failed(format!("{:#}", e)));
            return;
        }
    };

    while let Some(event) = events.recv().await {
        let view = match event {
            FeedEvent::Snapshot(snapshot) => {
                let selection = reduce_snapshot::<R>(snapshot);
                tracing::debug!(
                    "Feed {}: {} entities, {} skipped records",
                    collection,
                    selection.len(),
                    selection.issues().len()
                );
                FeedView::from_selection(selection)
            }
            FeedEvent::Failed(message) => {
                tracing::warn!("Feed {} reported an error: {}", collection, message);
                FeedView::Failed(message)
            }
        };
        tx.send_replace(view);
    }

    tracing::debug!("Feed {} closed", collection);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::greenhouse::GreenhouseMeasurement;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Hands out one pre-built receiver; the test keeps the sender
    pub(crate) struct ManualFeed {
        events: Mutex<Option<mpsc::Receiver<FeedEvent>>>,
    }

    impl ManualFeed {
        pub(crate) fn new() -> (Arc<Self>, mpsc::Sender<FeedEvent>) {
            let (tx, rx) = mpsc::channel(16);
            let feed = Arc::new(Self {
                events: Mutex::new(Some(rx)),
            });
            (feed, tx)
        }
    }

    #[async_trait]
    impl FeedRepository for ManualFeed {
        async fn subscribe(&self, _collection: &str) -> anyhow::Result<mpsc::Receiver<FeedEvent>> {
            self.events
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| anyhow::anyhow!("already subscribed"))
        }
    }

    struct BrokenFeed;

    #[async_trait]
    impl FeedRepository for BrokenFeed {
        async fn subscribe(&self, _collection: &str) -> anyhow::Result<mpsc::Receiver<FeedEvent>> {
            anyhow::bail!("permission denied")
        }
    }

    pub(crate) fn plant_record(name: &str, timestamp: &str, soil_moisture: f64) -> serde_json::Value {
        json!({
            "timestamp": timestamp,
            "plant_name": name,
            "humidity": 50,
            "temperature": 22,
            "optimal_humidity": 50,
            "soil_moisture": soil_moisture,
            "optimal_soil_moisture": 40,
            "last_watered": "2025-05-02T07:00:00Z",
            "status": "normal"
        })
    }

    #[tokio::test]
    async fn test_starts_loading_then_ready() {
        let (feed, tx) = ManualFeed::new();
        let subscription =
            FeedSubscription::<GreenhouseMeasurement>::start(feed, "greenhouse_measurements");
        let mut view = subscription.watch();
        assert_eq!(view.borrow().state(), FeedState::Loading);

        tx.send(FeedEvent::Snapshot(json!({
            "a": plant_record("Basil", "2025-05-02T09:00:00Z", 40.0),
            "b": plant_record("Basil", "2025-05-02T10:00:00Z", 44.0),
            "c": plant_record("Mint", "2025-05-02T08:00:00Z", 38.0),
        })))
        .await
        .unwrap();

        let current = view
            .wait_for(|v| v.state() == FeedState::Ready)
            .await
            .unwrap()
            .clone();
        let selection = current.selection().unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.get("Basil").unwrap().soil_moisture, 44.0);

        subscription.stop().await;
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_no_data() {
        let (feed, tx) = ManualFeed::new();
        let subscription = FeedSubscription::<GreenhouseMeasurement>::start(feed, "greenhouse");
        let mut view = subscription.watch();

        tx.send(FeedEvent::Snapshot(serde_json::Value::Null)).await.unwrap();
        view.wait_for(|v| v.state() == FeedState::NoData).await.unwrap();
        assert_eq!(view.borrow().malformed(), 0);

        tx.send(FeedEvent::Snapshot(json!({"x": {"plant_name": "Basil"}})))
            .await
            .unwrap();
        view.wait_for(|v| v.malformed() == 1).await.unwrap();
        assert_eq!(view.borrow().state(), FeedState::NoData);

        subscription.stop().await;
    }

    #[tokio::test]
    async fn test_feed_error_is_surfaced_unchanged() {
        let (feed, tx) = ManualFeed::new();
        let subscription = FeedSubscription::<GreenhouseMeasurement>::start(feed, "greenhouse");
        let mut view = subscription.watch();

        tx.send(FeedEvent::Failed("Permission denied".to_string()))
            .await
            .unwrap();
        view.wait_for(|v| v.state() == FeedState::Error).await.unwrap();
        assert_eq!(view.borrow().error(), Some("Permission denied"));

        // A later snapshot recovers the view
        tx.send(FeedEvent::Snapshot(json!({
            "a": plant_record("Basil", "2025-05-02T09:00:00Z", 40.0)
        })))
        .await
        .unwrap();
        view.wait_for(|v| v.state() == FeedState::Ready).await.unwrap();

        subscription.stop().await;
    }

    #[tokio::test]
    async fn test_subscribe_failure_is_reported() {
        let subscription =
            FeedSubscription::<GreenhouseMeasurement>::start(Arc::new(BrokenFeed), "greenhouse");
        let mut view = subscription.watch();

        view.wait_for(|v| v.state() == FeedState::Error).await.unwrap();
        assert_eq!(view.borrow().error(), Some("permission denied"));
    }

    #[tokio::test]
    async fn test_stop_drops_the_feed_receiver() {
        let (feed, tx) = ManualFeed::new();
        let subscription = FeedSubscription::<GreenhouseMeasurement>::start(feed, "greenhouse");
        let view = subscription.watch();

        subscription.stop().await;
        tx.closed().await;
        assert!(tx.is_closed());
        assert_eq!(view.borrow().state(), FeedState::Loading);
    }
}
