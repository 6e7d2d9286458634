use crate::math::constants::{meters_to_feet, meters_to_miles, MEAN_EARTH_RADIUS};
use crate::math::{unsigned_heading_difference, GeoPoint};
use crate::prelude::AnalysisResult;
use crate::reference::{Airport, Runway};

/// Nearest airport and its great-circle distance in statute miles.
#[derive(Debug, Clone, Copy)]
pub struct AirportMatch<'a> {
    pub airport: &'a Airport,
    pub distance_miles: f64,
}

/// Runway picked for the current position and heading.
#[derive(Debug, Clone, Copy)]
pub struct RunwayMatch<'a> {
    pub runway: &'a Runway,
    /// Unsigned difference between aircraft heading and magnetic runway heading.
    pub heading_difference: f64,
    /// Signed distance to the extended centerline in feet, positive right.
    pub crosstrack_feet: f64,
}

/// Linear scan for the airport closest to `position`.
///
/// Ties keep the airport encountered first, so results depend only on load order.
pub fn detect_airport<'a>(airports: &'a [Airport], position: &GeoPoint) -> Option<AirportMatch<'a>> {
    let mut nearest: Option<AirportMatch<'a>> = None;
    for airport in airports {
        let distance_miles = meters_to_miles(position.distance_meters(&airport.center_point));
        if nearest.map_or(true, |n| distance_miles < n.distance_miles) {
            nearest = Some(AirportMatch {
                airport,
                distance_miles,
            });
        }
    }
    nearest
}

/// Signed distance from `position` to the runway's extended centerline, feet.
pub fn cross_track_to_center_line(position: &GeoPoint, runway: &Runway) -> AnalysisResult<f64> {
    let meters =
        position.cross_track_distance_to(&runway.center_point, runway.true_heading, MEAN_EARTH_RADIUS)?;
    Ok(meters_to_feet(meters))
}

/// True when the runway's reference point still lies ahead along its own
/// direction, i.e. the aircraft has not yet passed it.
pub fn is_approaching(position: &GeoPoint, runway: &Runway) -> bool {
    let bearing = position.bearing_to(&runway.center_point);
    unsigned_heading_difference(bearing, runway.true_heading) < 90.0
}

/// Picks the runway of `airport` the aircraft is lined up for.
///
/// Candidates must be within `tolerance` degrees of the aircraft heading and
/// still ahead of it. The smallest heading difference wins, then the smallest
/// cross-track magnitude (parallel runways), then load order.
pub fn detect_runway<'a>(
    airport: &'a Airport,
    position: &GeoPoint,
    heading: f64,
    tolerance: f64,
) -> AnalysisResult<Option<RunwayMatch<'a>>> {
    let mut best: Option<RunwayMatch<'a>> = None;

    for runway in airport.runways() {
        let heading_difference = unsigned_heading_difference(runway.magnetic_heading, heading);
        if heading_difference > tolerance || !is_approaching(position, runway) {
            continue;
        }

        let crosstrack_feet = cross_track_to_center_line(position, runway)?;
        let better = match best {
            None => true,
            Some(current) => {
                heading_difference < current.heading_difference
                    || (heading_difference == current.heading_difference
                        && crosstrack_feet.abs() < current.crosstrack_feet.abs())
            }
        };
        if better {
            best = Some(RunwayMatch {
                runway,
                heading_difference,
                crosstrack_feet,
            });
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::FEET_PER_METER;
    use crate::reference::{AirportDirectory, AirportLookup};
    use approx::assert_abs_diff_eq;

    fn directory() -> AirportDirectory {
        let mut directory = AirportDirectory::new();
        let mut first = Airport::new("KAAA", "Alpha", "A", "ND", GeoPoint::new(40.0, -100.0), 1000.0);
        let twin = Airport::new("KBBB", "Bravo", "B", "ND", GeoPoint::new(40.0, -100.0), 1000.0);
        let far = Airport::new("KCCC", "Charlie", "C", "ND", GeoPoint::new(41.0, -100.0), 900.0);
        first.push_runway(Runway::new("KAAA", "36", 1000.0, 360.0, 0.0, GeoPoint::new(40.0, -100.0)));
        first.push_runway(Runway::new("KAAA", "18", 1000.0, 180.0, 180.0, GeoPoint::new(40.0, -100.0)));
        first.push_runway(Runway::new("KAAA", "35L", 1000.0, 350.0, 350.0, GeoPoint::new(40.0, -100.01)));
        first.push_runway(Runway::new("KAAA", "35R", 1000.0, 350.0, 350.0, GeoPoint::new(40.0, -99.99)));
        directory.add_airport(first).unwrap();
        directory.add_airport(twin).unwrap();
        directory.add_airport(far).unwrap();
        directory
    }

    #[test]
    fn nearest_airport_wins_and_ties_keep_load_order() {
        let directory = directory();
        let near_first = detect_airport(directory.airports(), &GeoPoint::new(40.01, -100.0)).unwrap();
        assert_eq!(near_first.airport.code, "KAAA");
        assert_abs_diff_eq!(near_first.distance_miles, 0.691, epsilon = 0.01);

        let near_far = detect_airport(directory.airports(), &GeoPoint::new(40.9, -100.0)).unwrap();
        assert_eq!(near_far.airport.code, "KCCC");
        assert!(detect_airport(&[], &GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn runway_matching_heading_and_ahead_is_selected() {
        let directory = directory();
        let airport = directory.airport("KAAA").unwrap();
        let south = GeoPoint::new(39.98, -100.0);

        let found = detect_runway(airport, &south, 2.0, 20.0).unwrap().unwrap();
        assert_eq!(found.runway.runway_code, "36");
        assert_eq!(found.heading_difference, 2.0);
        assert_abs_diff_eq!(found.crosstrack_feet, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn runway_behind_the_aircraft_is_not_selected() {
        let directory = directory();
        let airport = directory.airport("KAAA").unwrap();
        let north = GeoPoint::new(40.02, -100.0);
        assert!(detect_runway(airport, &north, 0.0, 5.0).unwrap().is_none());
    }

    #[test]
    fn parallel_runways_resolve_by_crosstrack() {
        let directory = directory();
        let airport = directory.airport("KAAA").unwrap();
        let south_of_right_runway = GeoPoint::new(39.98, -99.99);
        let found = detect_runway(airport, &south_of_right_runway, 350.0, 5.0)
            .unwrap()
            .unwrap();
        assert_eq!(found.runway.runway_code, "35R");
    }

    #[test]
    fn centerline_offset_is_reported_in_feet() {
        let runway = Runway::new("KAAA", "36", 1000.0, 360.0, 0.0, GeoPoint::new(40.0, -100.0));
        let east = GeoPoint::new(40.0, -100.0).destination_point(
            100.0 / FEET_PER_METER,
            90.0,
            MEAN_EARTH_RADIUS,
        );
        let offset = cross_track_to_center_line(&east, &runway).unwrap();
        assert_abs_diff_eq!(offset, 100.0, epsilon = 0.01);
    }
}
