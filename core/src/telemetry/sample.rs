use crate::math::GeoPoint;
use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// One recorded row as handed over by a loader. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryFrame {
    pub time: Option<f64>,
    pub msl_altitude: Option<f64>,
    pub indicated_airspeed: Option<f64>,
    pub vertical_airspeed: Option<f64>,
    pub heading: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub groundspeed: Option<f64>,
    #[serde(rename = "eng_1_rpm")]
    pub engine_rpm: Option<f64>,
}

/// A validated telemetry sample.
///
/// Units: seconds, feet MSL, knots, ft/min, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub time: f64,
    pub msl_altitude: f64,
    pub indicated_airspeed: f64,
    pub vertical_airspeed: f64,
    pub heading: f64,
    pub position: GeoPoint,
    pub groundspeed: f64,
    pub engine_rpm: Option<f64>,
}

fn required(value: Option<f64>, index: usize, field: &'static str) -> AnalysisResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::MalformedSample { index, field }),
    }
}

impl TelemetryFrame {
    /// Checks that every required field is present and finite.
    pub fn validate(&self, index: usize) -> AnalysisResult<TelemetrySample> {
        Ok(TelemetrySample {
            time: required(self.time, index, "time")?,
            msl_altitude: required(self.msl_altitude, index, "msl_altitude")?,
            indicated_airspeed: required(self.indicated_airspeed, index, "indicated_airspeed")?,
            vertical_airspeed: required(self.vertical_airspeed, index, "vertical_airspeed")?,
            heading: required(self.heading, index, "heading")?,
            position: GeoPoint::new(
                required(self.latitude, index, "latitude")?,
                required(self.longitude, index, "longitude")?,
            ),
            groundspeed: required(self.groundspeed, index, "groundspeed")?,
            engine_rpm: self.engine_rpm.filter(|v| v.is_finite()),
        })
    }
}

impl From<&TelemetrySample> for TelemetryFrame {
    fn from(sample: &TelemetrySample) -> Self {
        Self {
            time: Some(sample.time),
            msl_altitude: Some(sample.msl_altitude),
            indicated_airspeed: Some(sample.indicated_airspeed),
            vertical_airspeed: Some(sample.vertical_airspeed),
            heading: Some(sample.heading),
            latitude: Some(sample.position.latitude),
            longitude: Some(sample.position.longitude),
            groundspeed: Some(sample.groundspeed),
            engine_rpm: sample.engine_rpm,
        }
    }
}

impl TelemetrySample {
    /// True when the position is the (0, 0) placeholder recorders emit
    /// before acquiring a GPS fix.
    pub fn lacks_position_fix(&self) -> bool {
        self.position.latitude == 0.0 && self.position.longitude == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_frame() -> TelemetryFrame {
        TelemetryFrame {
            time: Some(12.0),
            msl_altitude: Some(1345.0),
            indicated_airspeed: Some(65.0),
            vertical_airspeed: Some(-500.0),
            heading: Some(172.0),
            latitude: Some(47.9),
            longitude: Some(-97.2),
            groundspeed: Some(63.0),
            engine_rpm: None,
        }
    }

    #[test]
    fn complete_frame_validates() {
        let sample = complete_frame().validate(0).unwrap();
        assert_eq!(sample.position, GeoPoint::new(47.9, -97.2));
        assert_eq!(sample.engine_rpm, None);
        assert_eq!(TelemetryFrame::from(&sample), complete_frame());
    }

    #[test]
    fn missing_or_nan_fields_are_malformed() {
        let mut frame = complete_frame();
        frame.heading = None;
        assert_eq!(
            frame.validate(7),
            Err(AnalysisError::MalformedSample {
                index: 7,
                field: "heading"
            })
        );

        let mut frame = complete_frame();
        frame.groundspeed = Some(f64::NAN);
        assert!(matches!(
            frame.validate(2),
            Err(AnalysisError::MalformedSample {
                field: "groundspeed",
                ..
            })
        ));
    }
}
