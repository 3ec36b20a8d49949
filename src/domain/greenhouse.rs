// Greenhouse measurement domain model
use serde::{Deserialize, Serialize};

use super::status::{MetricPair, RawStatus, StatusInput};
use super::telemetry::TimestampedRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenhouseMeasurement {
    pub timestamp: String,
    pub plant_name: String,
    pub humidity: f64,
    pub temperature: f64,
    pub optimal_humidity: f64,
    pub soil_moisture: f64,
    pub optimal_soil_moisture: f64,
    #[serde(default)]
    pub last_watered: Option<String>,
    #[serde(default)]
    pub status: RawStatus,
}

impl GreenhouseMeasurement {
    pub fn humidity_pair(&self) -> MetricPair {
        MetricPair::new(self.humidity, self.optimal_humidity)
    }

    pub fn soil_moisture_pair(&self) -> MetricPair {
        MetricPair::new(self.soil_moisture, self.optimal_soil_moisture)
    }

    /// Classifier input: humidity and soil moisture against their targets
    pub fn status_input(&self) -> StatusInput {
        StatusInput::new(
            vec![self.humidity_pair(), self.soil_moisture_pair()],
            self.status,
        )
    }
}

impl TimestampedRecord for GreenhouseMeasurement {
    fn entity_id(&self) -> &str {
        &self.plant_name
    }

    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}
