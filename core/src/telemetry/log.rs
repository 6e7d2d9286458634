use crate::prelude::AnalysisError;
use log::{debug, info, warn};

/// Per-flight logging facade; every line carries the flight id.
pub struct LogManager {
    flight_id: String,
}

impl LogManager {
    pub fn for_flight(flight_id: &str) -> Self {
        Self {
            flight_id: flight_id.to_string(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.flight_id, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.flight_id, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.flight_id, message);
    }

    /// Recoverable errors are absorbed by the engine and only reported here.
    pub fn skipped(&self, error: &AnalysisError) {
        debug!("[{}] skipped: {}", self.flight_id, error);
    }
}
