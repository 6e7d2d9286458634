use crate::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// One runway end. Identity is `(airport_code, runway_code)`; the owning
/// [`Airport`](crate::reference::Airport) is referenced by code only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    pub airport_code: String,
    pub runway_code: String,
    /// Touchdown-zone elevation, feet MSL.
    pub elevation: f64,
    pub magnetic_heading: f64,
    pub true_heading: f64,
    pub center_point: GeoPoint,
}

impl Runway {
    pub fn new(
        airport_code: impl Into<String>,
        runway_code: impl Into<String>,
        elevation: f64,
        magnetic_heading: f64,
        true_heading: f64,
        center_point: GeoPoint,
    ) -> Self {
        Self {
            airport_code: airport_code.into(),
            runway_code: runway_code.into(),
            elevation,
            magnetic_heading,
            true_heading,
            center_point,
        }
    }
}
