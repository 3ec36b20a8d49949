// Greenhouse service - Derives plant mood and insights from the latest measurements
use serde::Serialize;
use tokio::sync::watch;

use crate::application::feed_subscription::{FeedState, FeedView};
use crate::domain::greenhouse::GreenhouseMeasurement;
use crate::domain::insights::{Insight, InsightTolerances, generate_insights};
use crate::domain::status::{Severity, StatusClassifier};

#[derive(Debug, Clone, Serialize)]
pub struct PlantReport {
    #[serde(flatten)]
    pub measurement: GreenhouseMeasurement,
    pub severity: Severity,
    pub mood: String,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GreenhouseOverview {
    pub state: FeedState,
    pub plants: Vec<PlantReport>,
    pub malformed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct GreenhouseService {
    feed: watch::Receiver<FeedView<GreenhouseMeasurement>>,
    classifier: StatusClassifier,
    tolerances: InsightTolerances,
}

impl GreenhouseService {
    pub fn new(
        feed: watch::Receiver<FeedView<GreenhouseMeasurement>>,
        classifier: StatusClassifier,
        tolerances: InsightTolerances,
    ) -> Self {
        Self {
            feed,
            classifier,
            tolerances,
        }
    }

    /// Every plant's latest measurement with its derived status, ordered by plant name
    pub fn overview(&self) -> GreenhouseOverview {
        let view = self.feed.borrow();

        let plants: Vec<PlantReport> = view
            .selection()
            .map(|selection| selection.records().map(|m| self.report(m)).collect())
            .unwrap_or_default();

        GreenhouseOverview {
            state: view.state(),
            plants,
            malformed: view.malformed(),
            error: view.error().map(str::to_string),
        }
    }

    pub fn plant(&self, plant_name: &str) -> Option<PlantReport> {
        let view = self.feed.borrow();
        view.selection()?.get(plant_name).map(|m| self.report(m))
    }

    fn report(&self, measurement: &GreenhouseMeasurement) -> PlantReport {
        let severity = self.classifier.classify(&measurement.status_input());

        PlantReport {
            measurement: measurement.clone(),
            severity,
            mood: self.classifier.label(severity).to_string(),
            insights: generate_insights(measurement, &self.tolerances),
        }
    }
}
