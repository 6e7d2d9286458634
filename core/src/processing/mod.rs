pub mod engine;
pub mod risk;
pub mod selection;
pub mod window;

pub use engine::{ApproachDetectionEngine, FlightAnalysis};
pub use risk::{RiskAssessment, RiskLevel};
pub use selection::{cross_track_to_center_line, detect_airport, detect_runway};
pub use window::{ApproachRecord, Exceedances, LandingOutcome, SampleSpan, WindowMetrics};
