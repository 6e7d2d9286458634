use crate::math::constants::MEAN_EARTH_RADIUS;
use crate::math::vector3d::Vector3d;
use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point on a spherical earth, latitude/longitude in degrees.
///
/// Computations convert to n-vectors (unit normals to the sphere) and work in
/// vector space, which avoids the singularities of spherical trigonometry at
/// the poles and the antimeridian. Ranges are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Second half of a great-circle path definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEnd {
    Point(GeoPoint),
    /// Initial compass bearing in degrees from the path start.
    Bearing(f64),
}

impl From<GeoPoint> for PathEnd {
    fn from(point: GeoPoint) -> Self {
        PathEnd::Point(point)
    }
}

impl From<f64> for PathEnd {
    fn from(bearing: f64) -> Self {
        PathEnd::Bearing(bearing)
    }
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_vector(&self) -> Vector3d {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        Vector3d::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    pub fn from_vector(v: &Vector3d) -> GeoPoint {
        let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt());
        let lon = v.y.atan2(v.x);
        GeoPoint::new(lat.to_degrees(), lon.to_degrees())
    }

    /// Normal of the great circle obtained by heading from this point on `bearing`.
    pub fn great_circle(&self, bearing: f64) -> Vector3d {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let theta = bearing.to_radians();

        Vector3d::new(
            lon.sin() * theta.cos() - lat.sin() * lon.cos() * theta.sin(),
            -lon.cos() * theta.cos() - lat.sin() * lon.sin() * theta.sin(),
            lat.cos() * theta.sin(),
        )
    }

    /// Great-circle distance in the unit of `radius`.
    pub fn distance_to(&self, other: &GeoPoint, radius: f64) -> f64 {
        self.to_vector().angle_to(&other.to_vector(), None) * radius
    }

    /// Great-circle distance in meters on the mean earth radius.
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        self.distance_to(other, MEAN_EARTH_RADIUS)
    }

    /// Initial compass bearing to `other` in [0, 360).
    ///
    /// Coincident points (and points at a pole) yield 0 rather than NaN.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        let p1 = self.to_vector();
        let p2 = other.to_vector();

        let through_other = p1.cross(&p2);
        let through_pole = p1.cross(&Vector3d::north_pole());

        let bearing = through_other
            .angle_to(&through_pole, Some(&p1))
            .to_degrees();
        (bearing + 360.0) % 360.0
    }

    pub fn midpoint_to(&self, other: &GeoPoint) -> GeoPoint {
        let mid = self.to_vector().plus(&other.to_vector()).unit();
        GeoPoint::from_vector(&mid)
    }

    /// Point reached after travelling `distance` (unit of `radius`) along the
    /// great circle leaving this point on `bearing`.
    pub fn destination_point(&self, distance: f64, bearing: f64, radius: f64) -> GeoPoint {
        let delta = distance / radius;
        let circle = self.great_circle(bearing);
        let start = self.to_vector();

        let parallel = start.times(delta.cos());
        let perpendicular = circle.cross(&start).times(delta.sin());

        GeoPoint::from_vector(&parallel.plus(&perpendicular).unit())
    }

    /// Signed distance to the great circle through `path_start` and `path_end`.
    ///
    /// Negative left of the path, positive right of it, in the unit of
    /// `radius`. A path whose two points coincide (or are antipodal) has no
    /// defined great circle and is an arithmetic error.
    pub fn cross_track_distance_to(
        &self,
        path_start: &GeoPoint,
        path_end: impl Into<PathEnd>,
        radius: f64,
    ) -> AnalysisResult<f64> {
        let p = self.to_vector();

        let circle = match path_end.into() {
            PathEnd::Point(end) => path_start.to_vector().cross(&end.to_vector()),
            PathEnd::Bearing(bearing) => path_start.great_circle(bearing),
        };
        if circle.is_zero() {
            return Err(AnalysisError::Arithmetic(format!(
                "no great circle through {} on the given path",
                path_start
            )));
        }

        let alpha = circle.angle_to(&p, Some(&p.cross(&circle)));
        let sign = if alpha < 0.0 { -1.0 } else { 1.0 };
        let alpha = sign * std::f64::consts::FRAC_PI_2 - alpha;

        Ok(alpha * radius)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
