pub mod reference;
pub mod telemetry;

pub use reference::load_directory;
pub use telemetry::{collect_flight_paths, load_flight, FlightLog};
