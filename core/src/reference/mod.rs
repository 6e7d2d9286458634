pub mod airport;
pub mod directory;
pub mod runway;

pub use airport::Airport;
pub use directory::{AirportDirectory, AirportLookup};
pub use runway::Runway;
