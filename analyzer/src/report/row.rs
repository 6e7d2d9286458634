use approachcore::math::Extent;
use approachcore::processing::{ApproachRecord, RiskLevel, SampleSpan};
use serde::Serialize;

/// Flat CSV rendering of one approach record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachRow {
    pub flight_id: String,
    pub approach_id: u32,
    pub airport_code: String,
    pub runway_code: String,
    pub outcome: &'static str,
    pub approach_start: usize,
    pub approach_end: usize,
    pub landing_start: Option<usize>,
    pub landing_end: Option<usize>,
    pub start_time: f64,
    pub end_time: f64,
    pub ias_min: Option<f64>,
    pub ias_max: Option<f64>,
    pub vsi_min: Option<f64>,
    pub vsi_max: Option<f64>,
    pub heading_error_min: Option<f64>,
    pub heading_error_max: Option<f64>,
    pub crosstrack_min: Option<f64>,
    pub crosstrack_max: Option<f64>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub agl_min: Option<f64>,
    pub agl_max: Option<f64>,
    pub final_samples: usize,
    pub final_ias_mean: Option<f64>,
    pub final_vsi_mean: Option<f64>,
    pub final_crosstrack_mean: Option<f64>,
    pub final_heading_error_max: Option<f64>,
    pub final_agl_min: Option<f64>,
    pub unstable: bool,
    pub unstable_spans: String,
    pub heading_exceedances: usize,
    pub crosstrack_exceedances: usize,
    pub ias_exceedances: usize,
    pub vsi_exceedances: usize,
    pub ias_risk: Option<u8>,
    pub vsi_risk: Option<u8>,
    pub crosstrack_risk: Option<u8>,
    pub overall_risk: Option<u8>,
}

fn spans_to_string(spans: &[SampleSpan]) -> String {
    spans
        .iter()
        .map(|span| format!("{}-{}", span.start, span.end))
        .collect::<Vec<_>>()
        .join(";")
}

fn level(risk: Option<RiskLevel>) -> Option<u8> {
    risk.map(|r| r.level())
}

fn abs_max(extent: &Extent) -> Option<f64> {
    match (extent.min, extent.max) {
        (Some(min), Some(max)) => Some(min.abs().max(max.abs())),
        _ => None,
    }
}

impl From<&ApproachRecord> for ApproachRow {
    fn from(record: &ApproachRecord) -> Self {
        let approach = &record.approach;
        let gate = &record.final_gate;
        Self {
            flight_id: record.flight_id.clone(),
            approach_id: record.approach_id,
            airport_code: record.airport_code.clone(),
            runway_code: record.runway_code.clone(),
            outcome: record.outcome.as_str(),
            approach_start: record.approach_start,
            approach_end: record.approach_end,
            landing_start: record.landing_start,
            landing_end: record.landing_end,
            start_time: record.start_time,
            end_time: record.end_time,
            ias_min: approach.ias.min,
            ias_max: approach.ias.max,
            vsi_min: approach.vsi.min,
            vsi_max: approach.vsi.max,
            heading_error_min: approach.heading_error.min,
            heading_error_max: approach.heading_error.max,
            crosstrack_min: approach.crosstrack.min,
            crosstrack_max: approach.crosstrack.max,
            distance_min: approach.distance.min,
            distance_max: approach.distance.max,
            agl_min: approach.agl.min,
            agl_max: approach.agl.max,
            final_samples: gate.ias.count,
            final_ias_mean: gate.ias.mean(),
            final_vsi_mean: gate.vsi.mean(),
            final_crosstrack_mean: gate.crosstrack.mean(),
            final_heading_error_max: abs_max(&gate.heading_error),
            final_agl_min: gate.agl.min,
            unstable: record.unstable,
            unstable_spans: spans_to_string(&record.unstable_spans),
            heading_exceedances: record.exceedances.heading_error.count,
            crosstrack_exceedances: record.exceedances.crosstrack.count,
            ias_exceedances: record.exceedances.ias.count,
            vsi_exceedances: record.exceedances.vsi.count,
            ias_risk: level(record.risk.ias),
            vsi_risk: level(record.risk.vsi),
            crosstrack_risk: level(record.risk.crosstrack),
            overall_risk: level(record.risk.overall()),
        }
    }
}
