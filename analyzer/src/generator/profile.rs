use crate::loader::FlightLog;
use approachcore::math::GeoPoint;
use approachcore::reference::{Airport, AirportDirectory, Runway};
use approachcore::telemetry::{PatternBuilder, TelemetryFrame};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating synthetic closed-pattern flights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub airport_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub field_elevation: f64,
    pub flights: usize,
    pub seed: u64,
    /// Peak airspeed noise, kt.
    pub speed_jitter: f64,
    /// Peak vertical-speed noise, ft/min.
    pub vsi_jitter: f64,
    /// Peak heading noise, degrees.
    pub heading_jitter: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            airport_code: "KDMO".to_string(),
            latitude: 47.95,
            longitude: -97.18,
            field_elevation: 845.0,
            flights: 1,
            seed: 7,
            speed_jitter: 1.5,
            vsi_jitter: 40.0,
            heading_jitter: 1.0,
        }
    }
}

impl GeneratorConfig {
    fn field(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Single-airport reference set with one north/south runway pair at the
/// field center.
pub fn demo_directory(config: &GeneratorConfig) -> anyhow::Result<AirportDirectory> {
    let mut directory = AirportDirectory::new();
    directory.add_airport(Airport::new(
        config.airport_code.as_str(),
        "Demo Field",
        "Demo",
        "ND",
        config.field(),
        config.field_elevation,
    ))?;
    for (code, heading) in [("36", 0.0), ("18", 180.0)] {
        directory.add_runway(Runway::new(
            config.airport_code.as_str(),
            code,
            config.field_elevation,
            if heading == 0.0 { 360.0 } else { heading },
            heading,
            config.field(),
        ))?;
    }
    Ok(directory)
}

fn climb_out(pattern: PatternBuilder) -> PatternBuilder {
    pattern.leg(60, 80.0, 80.0, 900.0)
}

fn downwind_and_final(pattern: PatternBuilder) -> PatternBuilder {
    pattern
        .turn_to(180.0)
        .leg(126, 90.0, 90.0, 0.0)
        .turn_to(0.0)
        .leg(90, 65.0, 65.0, -600.0)
}

/// Noise-free closed pattern: departure, touch-and-go, second circuit, full
/// stop.
pub fn canonical_pattern(config: &GeneratorConfig) -> PatternBuilder {
    let first = climb_out(
        PatternBuilder::new(config.field(), 0.0, config.field_elevation)
            .hold(5)
            .leg(10, 0.0, 60.0, 0.0),
    );
    let touch_and_go = climb_out(downwind_and_final(first).leg(8, 55.0, 60.0, 0.0));
    downwind_and_final(touch_and_go)
        .leg(20, 65.0, 10.0, 0.0)
        .hold(5)
}

fn jitter(rng: &mut StdRng, peak: f64) -> f64 {
    if peak > 0.0 {
        rng.gen_range(-peak..peak)
    } else {
        0.0
    }
}

/// Canonical pattern with seeded instrument noise on airspeed, vertical speed
/// and heading. Position and altitude are left exact.
pub fn build_pattern_flight(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<TelemetryFrame> {
    canonical_pattern(config)
        .frames()
        .into_iter()
        .map(|mut frame| {
            let moving = frame.groundspeed.is_some_and(|gs| gs > 0.0);
            if moving {
                frame.indicated_airspeed = frame.indicated_airspeed.map(|v| v + jitter(rng, config.speed_jitter));
                frame.heading = frame
                    .heading
                    .map(|v| (v + jitter(rng, config.heading_jitter)).rem_euclid(360.0));
            }
            frame.vertical_airspeed = frame.vertical_airspeed.map(|v| {
                if v != 0.0 {
                    v + jitter(rng, config.vsi_jitter)
                } else {
                    v
                }
            });
            frame
        })
        .collect()
}

/// One flight per configured count, each with its own RNG derived from the
/// base seed.
pub fn build_demo_flights(config: &GeneratorConfig) -> Vec<FlightLog> {
    (0..config.flights)
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
            FlightLog {
                flight_id: format!("demo-{:02}", index),
                frames: build_pattern_flight(config, &mut rng),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approachcore::reference::AirportLookup;

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig::default();
        let first = build_demo_flights(&config);
        let second = build_demo_flights(&config);
        assert_eq!(first[0].frames, second[0].frames);

        let other = build_demo_flights(&GeneratorConfig {
            seed: 99,
            ..Default::default()
        });
        assert_ne!(first[0].frames, other[0].frames);
    }

    #[test]
    fn jitter_keeps_geometry_exact() {
        let config = GeneratorConfig::default();
        let clean = canonical_pattern(&config).frames();
        let mut rng = StdRng::seed_from_u64(3);
        let noisy = build_pattern_flight(&config, &mut rng);

        assert_eq!(clean.len(), noisy.len());
        for (a, b) in clean.iter().zip(&noisy) {
            assert_eq!(a.latitude, b.latitude);
            assert_eq!(a.msl_altitude, b.msl_altitude);
            let speed_error = (a.indicated_airspeed.unwrap() - b.indicated_airspeed.unwrap()).abs();
            assert!(speed_error <= config.speed_jitter);
        }
        assert_eq!(noisy[0].indicated_airspeed, Some(0.0));
    }

    #[test]
    fn demo_directory_has_both_runway_ends() {
        let directory = demo_directory(&GeneratorConfig::default()).unwrap();
        let airport = directory.airport("KDMO").unwrap();
        assert_eq!(airport.runways().len(), 2);
        assert_eq!(airport.runway("36").unwrap().magnetic_heading, 360.0);
        assert_eq!(airport.runway("18").unwrap().true_heading, 180.0);
    }

    #[test]
    fn flight_ids_are_numbered() {
        let flights = build_demo_flights(&GeneratorConfig {
            flights: 2,
            ..Default::default()
        });
        let ids: Vec<_> = flights.iter().map(|f| f.flight_id.as_str()).collect();
        assert_eq!(ids, vec!["demo-00", "demo-01"]);
    }
}
