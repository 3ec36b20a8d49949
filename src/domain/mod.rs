// Domain layer - Readings, status classification and insights
pub mod greenhouse;
pub mod insights;
pub mod rover;
pub mod status;
pub mod telemetry;
