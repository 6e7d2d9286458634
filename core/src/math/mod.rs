pub mod constants;
pub mod geo_point;
pub mod heading;
pub mod stats;
pub mod vector3d;

pub use geo_point::GeoPoint;
pub use heading::{signed_heading_difference, unsigned_heading_difference};
pub use stats::Extent;
pub use vector3d::Vector3d;
