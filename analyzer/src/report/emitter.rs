use crate::report::row::ApproachRow;
use crate::workflow::runner::{FailedFlight, RunReport};
use anyhow::Context;
use approachcore::processing::{FlightAnalysis, LandingOutcome};
use approachcore::telemetry::MetricsSnapshot;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const AGGREGATE_FILE: &str = "approaches.csv";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub flight_id: String,
    pub takeoffs: usize,
    pub approaches: usize,
    pub full_stops: usize,
    pub touch_and_goes: usize,
    pub go_arounds: usize,
    pub incomplete: usize,
    pub skipped_samples: usize,
}

impl From<&FlightAnalysis> for FlightSummary {
    fn from(analysis: &FlightAnalysis) -> Self {
        let count = |outcome: LandingOutcome| {
            analysis
                .approaches
                .iter()
                .filter(|record| record.outcome == outcome)
                .count()
        };
        Self {
            flight_id: analysis.flight_id.clone(),
            takeoffs: analysis.takeoffs,
            approaches: analysis.approaches.len(),
            full_stops: count(LandingOutcome::FullStop),
            touch_and_goes: count(LandingOutcome::TouchAndGo),
            go_arounds: count(LandingOutcome::GoAround),
            incomplete: count(LandingOutcome::Incomplete),
            skipped_samples: analysis.skipped_samples,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub flights: Vec<FlightSummary>,
    pub failures: Vec<FailedFlight>,
    pub metrics: MetricsSnapshot,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        Self {
            flights: report.analyses.iter().map(FlightSummary::from).collect(),
            failures: report.failures.clone(),
            metrics: report.metrics,
        }
    }
}

/// Writes approach rows and the run summary below one output directory, or
/// only logs them when writing is disabled.
pub struct ReportEmitter {
    output: PathBuf,
    write: bool,
}

impl ReportEmitter {
    pub fn new(output: impl Into<PathBuf>, write: bool) -> Self {
        Self {
            output: output.into(),
            write,
        }
    }

    pub fn flight_path(&self, flight_id: &str) -> PathBuf {
        self.output.join(format!("{}.approaches.csv", flight_id))
    }

    pub fn emit(&self, report: &RunReport) -> anyhow::Result<()> {
        if self.write {
            fs::create_dir_all(&self.output)
                .with_context(|| format!("creating output directory {}", self.output.display()))?;
        }

        let mut all_rows = Vec::new();
        for analysis in &report.analyses {
            let rows: Vec<ApproachRow> = analysis.approaches.iter().map(ApproachRow::from).collect();
            self.emit_rows(&self.flight_path(&analysis.flight_id), &rows)?;
            all_rows.extend(rows);
        }
        self.emit_rows(&self.output.join(AGGREGATE_FILE), &all_rows)?;
        self.emit_summary(&RunSummary::from(report))
    }

    fn emit_rows(&self, path: &Path, rows: &[ApproachRow]) -> anyhow::Result<()> {
        if !self.write {
            for row in rows {
                log::info!("{}", serde_json::to_string(row)?);
            }
            return Ok(());
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating report {}", path.display()))?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("writing report {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing report {}", path.display()))?;
        log::debug!("wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    fn emit_summary(&self, summary: &RunSummary) -> anyhow::Result<()> {
        if !self.write {
            log::info!("summary: {}", serde_json::to_string(summary)?);
            return Ok(());
        }

        let path = self.output.join(SUMMARY_FILE);
        let file = File::create(&path).with_context(|| format!("creating summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, summary)
            .with_context(|| format!("writing summary {}", path.display()))?;
        Ok(())
    }
}
