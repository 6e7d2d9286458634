//! Geodesy and approach-detection core for offline flight-data analysis.
//!
//! The modules cover spherical n-vector geometry, the airport/runway reference
//! model, the validated telemetry model, and the per-flight detection engine
//! that turns one flight's samples into approach records.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod reference;
pub mod telemetry;

pub use prelude::{AnalysisConfig, AnalysisError, AnalysisResult};
