/// Mean earth radius in meters; the default radius of every spherical computation.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

pub const FEET_PER_METER: f64 = 3.280_84;
pub const METERS_PER_STATUTE_MILE: f64 = 1_609.344;
pub const METERS_PER_SECOND_PER_KNOT: f64 = 0.514_444;

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_STATUTE_MILE
}

pub fn knots_to_meters_per_second(knots: f64) -> f64 {
    knots * METERS_PER_SECOND_PER_KNOT
}
