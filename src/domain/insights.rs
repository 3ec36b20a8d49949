// Advisory insights for a greenhouse measurement
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::greenhouse::GreenhouseMeasurement;

/// Tolerance band around optimal values and the accepted temperature range
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightTolerances {
    pub band: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
}

impl Default for InsightTolerances {
    fn default() -> Self {
        Self {
            band: 5.0,
            temperature_min: 18.0,
            temperature_max: 28.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    HumidityHigh,
    HumidityLow,
    HumidityOk,
    SoilWet,
    SoilDry,
    SoilOk,
    TemperatureOutOfRange,
    TemperatureOk,
}

impl Insight {
    pub fn message(&self) -> &'static str {
        match self {
            Insight::HumidityHigh => "Humidity is a bit high, improve air circulation",
            Insight::HumidityLow => "Air is too dry, consider misting or increasing humidity",
            Insight::HumidityOk => "Humidity levels are perfect",
            Insight::SoilWet => "Soil is too wet, reduce watering frequency",
            Insight::SoilDry => "Soil is dry, water soon to prevent stress",
            Insight::SoilOk => "Soil moisture is right on track",
            Insight::TemperatureOutOfRange => "Temperature is outside ideal range",
            Insight::TemperatureOk => "Temperature is suitable for growth",
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

enum Band {
    Above,
    Below,
    Within,
}

fn band_of(value: f64, optimal: f64, tolerance: f64) -> Band {
    if value > optimal + tolerance {
        Band::Above
    } else if value < optimal - tolerance {
        Band::Below
    } else {
        Band::Within
    }
}

/// One insight per metric, always in the order humidity, soil moisture, temperature.
pub fn generate_insights(
    measurement: &GreenhouseMeasurement,
    tolerances: &InsightTolerances,
) -> Vec<Insight> {
    let humidity = match band_of(
        measurement.humidity,
        measurement.optimal_humidity,
        tolerances.band,
    ) {
        Band::Above => Insight::HumidityHigh,
        Band::Below => Insight::HumidityLow,
        Band::Within => Insight::HumidityOk,
    };

    let soil = match band_of(
        measurement.soil_moisture,
        measurement.optimal_soil_moisture,
        tolerances.band,
    ) {
        Band::Above => Insight::SoilWet,
        Band::Below => Insight::SoilDry,
        Band::Within => Insight::SoilOk,
    };

    let temperature = if measurement.temperature < tolerances.temperature_min
        || measurement.temperature > tolerances.temperature_max
    {
        Insight::TemperatureOutOfRange
    } else {
        Insight::TemperatureOk
    };

    vec![humidity, soil, temperature]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::RawStatus;

    fn measurement(humidity: f64, soil_moisture: f64, temperature: f64) -> GreenhouseMeasurement {
        GreenhouseMeasurement {
            timestamp: "2025-05-02T09:30:00Z".to_string(),
            plant_name: "Basil".to_string(),
            humidity,
            temperature,
            optimal_humidity: 60.0,
            soil_moisture,
            optimal_soil_moisture: 45.0,
            last_watered: None,
            status: RawStatus::Normal,
        }
    }

    #[test]
    fn test_all_in_range() {
        let insights = generate_insights(&measurement(60.0, 45.0, 22.0), &InsightTolerances::default());
        assert_eq!(
            insights,
            vec![Insight::HumidityOk, Insight::SoilOk, Insight::TemperatureOk]
        );
    }

    #[test]
    fn test_hot_temperature_is_reported_last() {
        let insights = generate_insights(&measurement(60.0, 45.0, 30.0), &InsightTolerances::default());
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[2], Insight::TemperatureOutOfRange);
        assert_eq!(insights[2].to_string(), "Temperature is outside ideal range");
    }

    #[test]
    fn test_high_and_low_bands() {
        let tolerances = InsightTolerances::default();

        let insights = generate_insights(&measurement(66.0, 39.0, 17.0), &tolerances);
        assert_eq!(
            insights,
            vec![Insight::HumidityHigh, Insight::SoilDry, Insight::TemperatureOutOfRange]
        );

        let insights = generate_insights(&measurement(54.0, 51.0, 28.0), &tolerances);
        assert_eq!(
            insights,
            vec![Insight::HumidityLow, Insight::SoilWet, Insight::TemperatureOk]
        );
    }

    #[test]
    fn test_band_edges_are_in_range() {
        let insights = generate_insights(&measurement(65.0, 40.0, 18.0), &InsightTolerances::default());
        assert_eq!(
            insights,
            vec![Insight::HumidityOk, Insight::SoilOk, Insight::TemperatureOk]
        );
    }

    #[test]
    fn test_serializes_as_message() {
        let value = serde_json::to_value(Insight::SoilDry).unwrap();
        assert_eq!(value, serde_json::json!("Soil is dry, water soon to prevent stress"));
    }
}
