// Firebase Realtime Database feed over the REST API
use crate::application::feed_repository::{FeedEvent, FeedRepository};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const FEED_BUFFER: usize = 8;

#[derive(Debug, Clone)]
pub struct FirebaseFeed {
    database_url: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    error: String,
}

impl FirebaseFeed {
    /// `request_timeout` bounds each poll, so a stalled request surfaces as a failure.
    pub fn new(database_url: String, poll_interval: Duration, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            database_url: database_url.trim_end_matches('/').to_string(),
            poll_interval,
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        let path = collection
            .trim_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}.json", self.database_url, path)
    }
}

async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .context("Failed to send request to Firebase")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // Firebase reports errors as {"error": "..."}
        let message = serde_json::from_str::<FirebaseErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        anyhow::bail!("Firebase request failed with status {}: {}", status, message);
    }

    response
        .json::<Value>()
        .await
        .context("Failed to parse Firebase response")
}

/// Poll a collection and forward it whenever its contents change.
/// Ends once the subscriber drops its receiver.
async fn poll_collection(
    client: reqwest::Client,
    url: String,
    poll_interval: Duration,
    tx: mpsc::Sender<FeedEvent>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_sent: Option<FeedEvent> = None;

    loop {
        tokio::select! {
            _ = tx.closed() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = tx.closed() => break,
            fetched = fetch_snapshot(&client, &url) => fetched,
        };

        let event = match fetched {
            Ok(snapshot) => FeedEvent::Snapshot(snapshot),
            Err(e) => {
                tracing::error!("Polling {} failed: {:#}", url, e);
                FeedEvent::Failed(format!("{:#}", e))
            }
        };

        if last_sent.as_ref() == Some(&event) {
            continue;
        }

        if tx.send(event.clone()).await.is_err() {
            break;
        }
        last_sent = Some(event);
    }

    tracing::debug!("Stopped polling {}", url);
}

#[async_trait]
impl FeedRepository for FirebaseFeed {
    async fn subscribe(&self, collection: &str) -> Result<mpsc::Receiver<FeedEvent>> {
        if collection.trim_matches('/').is_empty() {
            anyhow::bail!("Collection name must not be empty");
        }

        let url = self.collection_url(collection);
        tracing::debug!("Polling {} every {:?}", url, self.poll_interval);

        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        tokio::spawn(poll_collection(
            self.client.clone(),
            url,
            self.poll_interval,
            tx,
        ));

        Ok(rx)
    }
}
