use serde::{Deserialize, Serialize};

pub const APPROACH_MIN_IAS: f64 = 55.0;
pub const APPROACH_MAX_IAS: f64 = 75.0;
pub const APPROACH_MAX_HEADING_ERROR: f64 = 10.0;
pub const APPROACH_MIN_VSI: f64 = -1000.0;
pub const APPROACH_MAX_CROSSTRACK_ERROR: f64 = 50.0;
/// Statute miles.
pub const APPROACH_MIN_DISTANCE: f64 = 0.1;
/// Statute miles.
pub const AIRPORT_SEARCH_RADIUS: f64 = 3.0;
pub const APPROACH_CEILING_AGL: f64 = 1000.0;
pub const APPROACH_MIN_ALTITUDE_AGL: f64 = 500.0;
pub const APPROACH_FINAL_MAX_ALTITUDE_AGL: f64 = 150.0;
pub const APPROACH_FINAL_MIN_ALTITUDE_AGL: f64 = 50.0;
pub const FULL_STOP_SPEED_INDICATOR: f64 = 35.0;
pub const FULL_STOP_CONFIRM_SAMPLES: usize = 3;
pub const TOUCH_AND_GO_ELEVATION_INDICATOR: f64 = 5.0;
pub const AGL_WINDOW_SAMPLES: usize = 5;
pub const RUNWAY_SELECTION_INDICATOR: f64 = 20.0;

/// What happens to an approach window that is abandoned before touchdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoAroundPolicy {
    /// Emit the window as a `go-around` record.
    #[default]
    Record,
    /// Drop the window and hand its approach id back.
    Discard,
}

/// Thresholds and policies shared by every stage of the detection engine.
///
/// Units: feet for altitudes and cross-track, statute miles for airport
/// distances, knots for airspeeds, ft/min for vertical speed, degrees for
/// headings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub approach_min_ias: f64,
    pub approach_max_ias: f64,
    pub approach_max_heading_error: f64,
    pub approach_min_vsi: f64,
    pub approach_max_crosstrack_error: f64,
    pub approach_min_distance: f64,
    pub airport_search_radius: f64,
    pub approach_ceiling_agl: f64,
    pub approach_min_altitude_agl: f64,
    pub approach_final_max_altitude_agl: f64,
    pub approach_final_min_altitude_agl: f64,
    pub full_stop_speed_indicator: f64,
    pub full_stop_confirm_samples: usize,
    pub touch_and_go_elevation_indicator: f64,
    pub agl_window_samples: usize,
    pub runway_selection_indicator: f64,
    pub go_around_policy: GoAroundPolicy,
    pub resume_after_touch_and_go: bool,
    pub continue_after_full_stop: bool,
    /// Abort the flight once more than this many samples were malformed.
    /// `None` skips malformed samples without limit.
    pub max_malformed_samples: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            approach_min_ias: APPROACH_MIN_IAS,
            approach_max_ias: APPROACH_MAX_IAS,
            approach_max_heading_error: APPROACH_MAX_HEADING_ERROR,
            approach_min_vsi: APPROACH_MIN_VSI,
            approach_max_crosstrack_error: APPROACH_MAX_CROSSTRACK_ERROR,
            approach_min_distance: APPROACH_MIN_DISTANCE,
            airport_search_radius: AIRPORT_SEARCH_RADIUS,
            approach_ceiling_agl: APPROACH_CEILING_AGL,
            approach_min_altitude_agl: APPROACH_MIN_ALTITUDE_AGL,
            approach_final_max_altitude_agl: APPROACH_FINAL_MAX_ALTITUDE_AGL,
            approach_final_min_altitude_agl: APPROACH_FINAL_MIN_ALTITUDE_AGL,
            full_stop_speed_indicator: FULL_STOP_SPEED_INDICATOR,
            full_stop_confirm_samples: FULL_STOP_CONFIRM_SAMPLES,
            touch_and_go_elevation_indicator: TOUCH_AND_GO_ELEVATION_INDICATOR,
            agl_window_samples: AGL_WINDOW_SAMPLES,
            runway_selection_indicator: RUNWAY_SELECTION_INDICATOR,
            go_around_policy: GoAroundPolicy::Record,
            resume_after_touch_and_go: true,
            continue_after_full_stop: true,
            max_malformed_samples: None,
        }
    }
}

impl AnalysisConfig {
    pub fn ias_in_range(&self, ias: f64) -> bool {
        ias >= self.approach_min_ias && ias <= self.approach_max_ias
    }

    pub fn in_final_gate(&self, agl: f64) -> bool {
        agl >= self.approach_final_min_altitude_agl && agl <= self.approach_final_max_altitude_agl
    }
}

/// Common error type for the geometry layer and the detection engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("malformed sample {index}: missing {field}")]
    MalformedSample { index: usize, field: &'static str },
    #[error("no airport within search radius at sample {index}")]
    NoCandidateAirport { index: usize },
    #[error("no runway at {airport} matches at sample {index}")]
    NoRunwayMatch { airport: String, index: usize },
    #[error("arithmetic failure: {0}")]
    Arithmetic(String),
    #[error("telemetry series is empty")]
    EmptyTelemetry,
    #[error("{count} malformed samples exceed the limit of {limit}")]
    TooManyMalformed { count: usize, limit: usize },
    #[error("reference data holds no airports")]
    EmptyReferenceData,
    #[error("runway references unknown airport {0}")]
    UnknownAirport(String),
    #[error("airport {0} loaded twice")]
    DuplicateAirport(String),
}

impl AnalysisError {
    /// Recoverable errors abandon the current candidate; everything else
    /// fails the flight.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::MalformedSample { .. }
                | AnalysisError::NoCandidateAirport { .. }
                | AnalysisError::NoRunwayMatch { .. }
        )
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
