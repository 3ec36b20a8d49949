// Status classification: deviation from optimal values to a severity level
use serde::{Deserialize, Serialize};

/// Status flag as stored in the feed by the sensor node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawStatus {
    #[default]
    Normal,
    Warning,
}

/// Derived severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Nominal,
    Advisory,
    Stressed,
}

/// A measured value and the target it is judged against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPair {
    pub value: f64,
    pub optimal: f64,
}

impl MetricPair {
    pub fn new(value: f64, optimal: f64) -> Self {
        Self { value, optimal }
    }

    pub fn deviation(&self) -> f64 {
        (self.value - self.optimal).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusInput {
    pub metrics: Vec<MetricPair>,
    pub raw_status: RawStatus,
}

impl StatusInput {
    pub fn new(metrics: Vec<MetricPair>, raw_status: RawStatus) -> Self {
        Self {
            metrics,
            raw_status,
        }
    }

    /// Largest deviation across all pairs, 0 when there are none. NaN deviations are ignored.
    pub fn max_deviation(&self) -> f64 {
        self.metrics
            .iter()
            .map(MetricPair::deviation)
            .fold(0.0, f64::max)
    }
}

/// Deviation thresholds, in the metric's own units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub stressed: f64,
    pub advisory: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            stressed: 15.0,
            advisory: 8.0,
        }
    }
}

/// Display names for each severity level
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeverityLabels {
    pub nominal: String,
    pub advisory: String,
    pub stressed: String,
}

impl Default for SeverityLabels {
    fn default() -> Self {
        Self {
            nominal: "happy".to_string(),
            advisory: "okay".to_string(),
            stressed: "stressed".to_string(),
        }
    }
}

impl SeverityLabels {
    pub fn label(&self, severity: Severity) -> &str {
        match severity {
            Severity::Nominal => &self.nominal,
            Severity::Advisory => &self.advisory,
            Severity::Stressed => &self.stressed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusClassifier {
    thresholds: StatusThresholds,
    labels: SeverityLabels,
}

impl StatusClassifier {
    pub fn new(thresholds: StatusThresholds, labels: SeverityLabels) -> Self {
        Self { thresholds, labels }
    }

    pub fn classify(&self, input: &StatusInput) -> Severity {
        let deviation = input.max_deviation();

        if input.raw_status == RawStatus::Warning || deviation >= self.thresholds.stressed {
            Severity::Stressed
        } else if deviation >= self.thresholds.advisory {
            Severity::Advisory
        } else {
            Severity::Nominal
        }
    }

    pub fn label(&self, severity: Severity) -> &str {
        self.labels.label(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pairs: &[(f64, f64)], raw_status: RawStatus) -> StatusInput {
        StatusInput::new(
            pairs.iter().map(|&(v, o)| MetricPair::new(v, o)).collect(),
            raw_status,
        )
    }

    #[test]
    fn test_large_soil_deviation_is_stressed() {
        let classifier = StatusClassifier::default();
        let reading = input(&[(50.0, 50.0), (70.0, 40.0)], RawStatus::Normal);

        assert_eq!(reading.max_deviation(), 30.0);
        assert_eq!(classifier.classify(&reading), Severity::Stressed);
        assert_eq!(classifier.label(Severity::Stressed), "stressed");
    }

    #[test]
    fn test_on_target_is_nominal() {
        let classifier = StatusClassifier::default();
        let reading = input(&[(50.0, 50.0), (40.0, 40.0)], RawStatus::Normal);

        assert_eq!(classifier.classify(&reading), Severity::Nominal);
        assert_eq!(classifier.label(Severity::Nominal), "happy");
    }

    #[test]
    fn test_threshold_boundaries() {
        let classifier = StatusClassifier::default();

        let cases = [
            (7.9, Severity::Nominal),
            (8.0, Severity::Advisory),
            (14.9, Severity::Advisory),
            (15.0, Severity::Stressed),
        ];
        for (deviation, expected) in cases {
            let reading = input(&[(40.0 - deviation, 40.0)], RawStatus::Normal);
            assert_eq!(classifier.classify(&reading), expected, "deviation {deviation}");
        }
    }

    #[test]
    fn test_warning_flag_overrides_deviation() {
        let classifier = StatusClassifier::default();
        let reading = input(&[(40.0, 40.0)], RawStatus::Warning);
        assert_eq!(classifier.classify(&reading), Severity::Stressed);

        let no_metrics = input(&[], RawStatus::Warning);
        assert_eq!(classifier.classify(&no_metrics), Severity::Stressed);
    }

    #[test]
    fn test_no_metrics_is_nominal() {
        let classifier = StatusClassifier::default();
        assert_eq!(classifier.classify(&input(&[], RawStatus::Normal)), Severity::Nominal);
    }

    #[test]
    fn test_monotonic_in_deviation() {
        let classifier = StatusClassifier::default();

        for raw_status in [RawStatus::Normal, RawStatus::Warning] {
            let mut previous = Severity::Nominal;
            for step in 0..=60 {
                let deviation = step as f64 * 0.5;
                let reading = input(&[(55.0, 55.0), (40.0 + deviation, 40.0)], raw_status);
                let severity = classifier.classify(&reading);
                assert!(severity >= previous, "severity dropped at deviation {deviation}");
                previous = severity;
            }
        }
    }

    #[test]
    fn test_nan_deviation_is_ignored() {
        let classifier = StatusClassifier::default();
        let reading = input(&[(f64::NAN, 40.0), (49.0, 40.0)], RawStatus::Normal);
        assert_eq!(classifier.classify(&reading), Severity::Advisory);
    }

    #[test]
    fn test_custom_thresholds_and_labels() {
        let classifier = StatusClassifier::new(
            StatusThresholds {
                stressed: 4.0,
                advisory: 2.0,
            },
            SeverityLabels {
                nominal: "normal".to_string(),
                advisory: "watch".to_string(),
                stressed: "warning".to_string(),
            },
        );

        let reading = input(&[(43.0, 40.0)], RawStatus::Normal);
        let severity = classifier.classify(&reading);
        assert_eq!(severity, Severity::Advisory);
        assert_eq!(classifier.label(severity), "watch");
    }
}
