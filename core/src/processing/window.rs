use crate::math::Extent;
use crate::prelude::AnalysisConfig;
use crate::processing::risk::RiskAssessment;
use crate::reference::{Airport, Runway};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an approach ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandingOutcome {
    FullStop,
    TouchAndGo,
    GoAround,
    /// Telemetry ended while the window was still open.
    Incomplete,
}

impl LandingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingOutcome::FullStop => "full-stop",
            LandingOutcome::TouchAndGo => "touch-and-go",
            LandingOutcome::GoAround => "go-around",
            LandingOutcome::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for LandingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter extents over a span of approach samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub ias: Extent,
    pub vsi: Extent,
    /// Signed, degrees from the magnetic runway heading.
    pub heading_error: Extent,
    /// Signed, feet from the extended centerline.
    pub crosstrack: Extent,
    /// Feet to the runway reference point.
    pub distance: Extent,
    /// Feet above the runway elevation.
    pub agl: Extent,
}

impl WindowMetrics {
    fn push(&mut self, observation: &Observation) {
        self.ias.push(observation.ias);
        self.vsi.push(observation.vsi);
        self.heading_error.push(observation.heading_error);
        self.crosstrack.push(observation.crosstrack);
        self.distance.push(observation.distance);
        self.agl.push(observation.agl);
    }
}

/// Values of the final-gate samples that broke a stability condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Exceedances {
    pub heading_error: Extent,
    pub crosstrack: Extent,
    pub ias: Extent,
    pub vsi: Extent,
}

/// Inclusive range of telemetry row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpan {
    pub start: usize,
    pub end: usize,
}

/// One closed approach. Never modified after the engine emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachRecord {
    pub flight_id: String,
    pub approach_id: u32,
    pub airport_code: String,
    pub runway_code: String,
    pub outcome: LandingOutcome,
    pub approach_start: usize,
    pub approach_end: usize,
    pub landing_start: Option<usize>,
    pub landing_end: Option<usize>,
    pub start_time: f64,
    pub end_time: f64,
    pub approach: WindowMetrics,
    pub final_gate: WindowMetrics,
    pub unstable: bool,
    pub unstable_spans: Vec<SampleSpan>,
    pub exceedances: Exceedances,
    pub risk: RiskAssessment,
}

/// Per-sample values the engine feeds into an open window.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Observation {
    pub index: usize,
    pub time: f64,
    pub ias: f64,
    pub vsi: f64,
    pub heading_error: f64,
    pub crosstrack: f64,
    pub distance: f64,
    pub agl: f64,
}

/// Accumulator for the approach currently being tracked.
pub(crate) struct ApproachWindow<'a> {
    pub approach_id: u32,
    pub airport: &'a Airport,
    pub runway: &'a Runway,
    start_index: usize,
    start_time: f64,
    last_index: usize,
    last_time: f64,
    landing_start: Option<usize>,
    approach: WindowMetrics,
    final_gate: WindowMetrics,
    exceedances: Exceedances,
    unstable_spans: Vec<SampleSpan>,
    open_span: Option<SampleSpan>,
}

impl<'a> ApproachWindow<'a> {
    pub fn open(approach_id: u32, airport: &'a Airport, runway: &'a Runway, index: usize, time: f64) -> Self {
        Self {
            approach_id,
            airport,
            runway,
            start_index: index,
            start_time: time,
            last_index: index,
            last_time: time,
            landing_start: None,
            approach: WindowMetrics::default(),
            final_gate: WindowMetrics::default(),
            exceedances: Exceedances::default(),
            unstable_spans: Vec::new(),
            open_span: None,
        }
    }

    pub fn observe(&mut self, observation: &Observation, config: &AnalysisConfig) {
        self.last_index = observation.index;
        self.last_time = observation.time;
        self.approach.push(observation);

        if !config.in_final_gate(observation.agl) {
            return;
        }
        self.final_gate.push(observation);

        let heading_ok = observation.heading_error.abs() <= config.approach_max_heading_error;
        let crosstrack_ok = observation.crosstrack.abs() <= config.approach_max_crosstrack_error;
        let ias_ok = config.ias_in_range(observation.ias);
        let vsi_ok = observation.vsi >= config.approach_min_vsi;

        if !heading_ok {
            self.exceedances.heading_error.push(observation.heading_error);
        }
        if !crosstrack_ok {
            self.exceedances.crosstrack.push(observation.crosstrack);
        }
        if !ias_ok {
            self.exceedances.ias.push(observation.ias);
        }
        if !vsi_ok {
            self.exceedances.vsi.push(observation.vsi);
        }

        if heading_ok && crosstrack_ok && ias_ok && vsi_ok {
            self.flush_span();
        } else {
            match self.open_span.as_mut() {
                Some(span) => span.end = observation.index,
                None => {
                    self.open_span = Some(SampleSpan {
                        start: observation.index,
                        end: observation.index,
                    })
                }
            }
        }
    }

    pub fn mark_landing(&mut self, index: usize) {
        self.flush_span();
        self.landing_start = Some(index);
    }

    pub fn has_landed(&self) -> bool {
        self.landing_start.is_some()
    }

    fn flush_span(&mut self) {
        if let Some(span) = self.open_span.take() {
            self.unstable_spans.push(span);
        }
    }

    pub fn close(
        mut self,
        flight_id: &str,
        outcome: LandingOutcome,
        index: usize,
        time: f64,
    ) -> ApproachRecord {
        self.flush_span();
        let (approach_end, landing_end, end_time) = match self.landing_start {
            Some(_) => (self.last_index, Some(index), time),
            None => (index.max(self.last_index), None, time),
        };

        let risk = RiskAssessment::grade(
            self.final_gate.ias.mean(),
            self.final_gate.vsi.mean(),
            self.final_gate.crosstrack.mean(),
        );

        ApproachRecord {
            flight_id: flight_id.to_string(),
            approach_id: self.approach_id,
            airport_code: self.airport.code.clone(),
            runway_code: self.runway.runway_code.clone(),
            outcome,
            approach_start: self.start_index,
            approach_end,
            landing_start: self.landing_start,
            landing_end,
            start_time: self.start_time,
            end_time: end_time.max(self.last_time),
            approach: self.approach,
            final_gate: self.final_gate,
            unstable: !self.unstable_spans.is_empty(),
            unstable_spans: self.unstable_spans,
            exceedances: self.exceedances,
            risk,
        }
    }
}
