pub mod log;
pub mod metrics;
pub mod pattern;
pub mod sample;

pub use log::LogManager;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use pattern::PatternBuilder;
pub use sample::{TelemetryFrame, TelemetrySample};
