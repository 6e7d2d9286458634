use crate::prelude::{AnalysisError, AnalysisResult};
use crate::reference::{Airport, Runway};
use std::collections::HashMap;

/// Read-only access the detection engine needs from reference data.
pub trait AirportLookup {
    fn airport(&self, code: &str) -> Option<&Airport>;

    /// All airports in stable load order.
    fn airports(&self) -> &[Airport];
}

/// Arena of airports keyed by code.
///
/// Built once at load time; afterwards it is only read, so one directory can
/// be shared by reference across concurrent flight analyses.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
    index: HashMap<String, usize>,
}

impl AirportDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_airport(&mut self, airport: Airport) -> AnalysisResult<()> {
        if self.index.contains_key(&airport.code) {
            return Err(AnalysisError::DuplicateAirport(airport.code));
        }
        self.index.insert(airport.code.clone(), self.airports.len());
        self.airports.push(airport);
        Ok(())
    }

    /// Appends a runway to the airport named by `runway.airport_code`.
    pub fn add_runway(&mut self, runway: Runway) -> AnalysisResult<()> {
        let slot = *self
            .index
            .get(&runway.airport_code)
            .ok_or_else(|| AnalysisError::UnknownAirport(runway.airport_code.clone()))?;
        self.airports[slot].push_runway(runway);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn runway_count(&self) -> usize {
        self.airports.iter().map(|a| a.runways().len()).sum()
    }
}

impl AirportLookup for AirportDirectory {
    fn airport(&self, code: &str) -> Option<&Airport> {
        self.index.get(code).map(|&slot| &self.airports[slot])
    }

    fn airports(&self) -> &[Airport] {
        &self.airports
    }
}
