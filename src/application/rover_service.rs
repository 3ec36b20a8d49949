// Rover service - Latest rover telemetry with supply warnings
use serde::Serialize;
use tokio::sync::watch;

use crate::application::feed_subscription::{FeedState, FeedView};
use crate::domain::rover::{RoverStatus, RoverThresholds};
use crate::domain::telemetry::TimestampedRecord;

#[derive(Debug, Clone, Serialize)]
pub struct RoverReport {
    #[serde(flatten)]
    pub status: RoverStatus,
    pub battery_low: bool,
    pub water_tank_low: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoverOverview {
    pub state: FeedState,
    pub rover: Option<RoverReport>,
    pub malformed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct RoverService {
    feed: watch::Receiver<FeedView<RoverStatus>>,
    thresholds: RoverThresholds,
}

impl RoverService {
    pub fn new(feed: watch::Receiver<FeedView<RoverStatus>>, thresholds: RoverThresholds) -> Self {
        Self { feed, thresholds }
    }

    pub fn overview(&self) -> RoverOverview {
        let view = self.feed.borrow();

        // The dashboard shows a single rover: the one that reported most recently
        let rover = view
            .selection()
            .and_then(|selection| selection.records().max_by_key(|status| status.timestamp()))
            .map(|status| RoverReport {
                status: status.clone(),
                battery_low: self.thresholds.battery_low(status),
                water_tank_low: self.thresholds.water_tank_low(status),
            });

        RoverOverview {
            state: view.state(),
            rover,
            malformed: view.malformed(),
            error: view.error().map(str::to_string),
        }
    }
}
