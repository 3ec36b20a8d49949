// Rover status domain model
use serde::{Deserialize, Serialize};

use super::telemetry::TimestampedRecord;

/// Entity id used when the feed does not name the rover
pub const DEFAULT_ROVER_ID: &str = "rover";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoverState {
    Charging,
    Navigating,
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverStatus {
    #[serde(default = "default_rover_id")]
    pub rover_id: String,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub battery_level: f64,
    pub water_tank_level: f64,
    pub state: RoverState,
}

fn default_rover_id() -> String {
    DEFAULT_ROVER_ID.to_string()
}

impl TimestampedRecord for RoverStatus {
    fn entity_id(&self) -> &str {
        &self.rover_id
    }

    fn raw_timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Supply levels at or below which the rover needs attention, in percent
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoverThresholds {
    pub low_battery: f64,
    pub low_water_tank: f64,
}

impl Default for RoverThresholds {
    fn default() -> Self {
        Self {
            low_battery: 30.0,
            low_water_tank: 25.0,
        }
    }
}

impl RoverThresholds {
    pub fn battery_low(&self, status: &RoverStatus) -> bool {
        status.battery_level <= self.low_battery
    }

    pub fn water_tank_low(&self, status: &RoverStatus) -> bool {
        status.water_tank_level <= self.low_water_tank
    }
}
