use crate::math::GeoPoint;
use crate::reference::Runway;
use serde::{Deserialize, Serialize};

/// Airport reference record owning its runways by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub center_point: GeoPoint,
    /// Field elevation, feet MSL.
    pub elevation: f64,
    runways: Vec<Runway>,
}

impl Airport {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        center_point: GeoPoint,
        elevation: f64,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
            center_point,
            elevation,
            runways: Vec::new(),
        }
    }

    /// Runways in load order.
    pub fn runways(&self) -> &[Runway] {
        &self.runways
    }

    pub fn runway(&self, runway_code: &str) -> Option<&Runway> {
        self.runways.iter().find(|r| r.runway_code == runway_code)
    }

    pub(crate) fn push_runway(&mut self, runway: Runway) {
        self.runways.push(runway);
    }
}
