use crate::math::constants::{knots_to_meters_per_second, MEAN_EARTH_RADIUS};
use crate::math::heading::normalize_360;
use crate::math::GeoPoint;
use crate::telemetry::sample::{TelemetryFrame, TelemetrySample};

/// Deterministic dead-reckoning flight builder.
///
/// Each leg emits one sample per step at the current state and then advances
/// the position along the current heading. Altitude never drops below the
/// ground elevation; a leg that reaches the ground reports zero vertical speed
/// from then on.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    samples: Vec<TelemetrySample>,
    position: GeoPoint,
    heading: f64,
    msl_altitude: f64,
    ground_elevation: f64,
    time: f64,
    step: f64,
}

impl PatternBuilder {
    /// Starts on the ground at `msl_altitude`, which also becomes the ground
    /// elevation.
    pub fn new(start: GeoPoint, heading: f64, msl_altitude: f64) -> Self {
        Self {
            samples: Vec::new(),
            position: start,
            heading: normalize_360(heading),
            msl_altitude,
            ground_elevation: msl_altitude,
            time: 0.0,
            step: 1.0,
        }
    }

    /// Seconds between samples.
    pub fn with_step(mut self, seconds: f64) -> Self {
        self.step = seconds;
        self
    }

    pub fn with_ground_elevation(mut self, elevation: f64) -> Self {
        self.ground_elevation = elevation;
        self.msl_altitude = self.msl_altitude.max(elevation);
        self
    }

    /// Stationary samples.
    pub fn hold(self, count: usize) -> Self {
        self.leg(count, 0.0, 0.0, 0.0)
    }

    /// `count` samples with speed ramping linearly from `from_kt` to `to_kt`
    /// and a constant commanded vertical speed in ft/min.
    pub fn leg(mut self, count: usize, from_kt: f64, to_kt: f64, vsi: f64) -> Self {
        for i in 0..count {
            let fraction = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            let speed = from_kt + (to_kt - from_kt) * fraction;
            let on_ground = self.msl_altitude <= self.ground_elevation;
            let reported_vsi = if on_ground && vsi < 0.0 { 0.0 } else { vsi };

            self.samples.push(TelemetrySample {
                time: self.time,
                msl_altitude: self.msl_altitude,
                indicated_airspeed: speed,
                vertical_airspeed: reported_vsi,
                heading: self.heading,
                position: self.position,
                groundspeed: speed,
                engine_rpm: None,
            });

            let distance = knots_to_meters_per_second(speed) * self.step;
            if distance > 0.0 {
                self.position =
                    self.position
                        .destination_point(distance, self.heading, MEAN_EARTH_RADIUS);
            }
            self.msl_altitude = (self.msl_altitude + vsi * self.step / 60.0).max(self.ground_elevation);
            self.time += self.step;
        }
        self
    }

    /// Instant heading change.
    pub fn turn_to(mut self, heading: f64) -> Self {
        self.heading = normalize_360(heading);
        self
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn msl_altitude(&self) -> f64 {
        self.msl_altitude
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn frames(&self) -> Vec<TelemetryFrame> {
        self.samples.iter().map(TelemetryFrame::from).collect()
    }
}
