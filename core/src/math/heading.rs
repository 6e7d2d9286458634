/// Smallest angle between two compass headings, in [0, 180].
pub fn unsigned_heading_difference(a: f64, b: f64) -> f64 {
    180.0 - ((a - b).rem_euclid(360.0) - 180.0).abs()
}

/// Turn from `initial` to `final_heading` along the shorter way round the
/// compass, in (-180, 180]. Positive means clockwise.
pub fn signed_heading_difference(initial: f64, final_heading: f64) -> f64 {
    let diff = (final_heading - initial).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Folds any heading into [0, 360).
pub fn normalize_360(heading: f64) -> f64 {
    heading.rem_euclid(360.0)
}
