use crate::loader::telemetry::flight_id;
use crate::loader::{load_flight, FlightLog};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use approachcore::processing::{ApproachDetectionEngine, FlightAnalysis};
use approachcore::reference::AirportDirectory;
use approachcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// Something the runner can turn into a flight log.
pub trait FlightSource: Sync {
    fn flight_id(&self) -> String;
    fn load(&self) -> anyhow::Result<FlightLog>;
}

impl FlightSource for FlightLog {
    fn flight_id(&self) -> String {
        self.flight_id.clone()
    }

    fn load(&self) -> anyhow::Result<FlightLog> {
        Ok(self.clone())
    }
}

impl FlightSource for PathBuf {
    fn flight_id(&self) -> String {
        flight_id(self)
    }

    fn load(&self) -> anyhow::Result<FlightLog> {
        load_flight(self)
    }
}

/// A flight that could not be loaded or analysed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFlight {
    pub flight_id: String,
    pub error: String,
}

pub struct RunReport {
    pub analyses: Vec<FlightAnalysis>,
    pub failures: Vec<FailedFlight>,
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    pub fn approach_count(&self) -> usize {
        self.analyses.iter().map(|a| a.approaches.len()).sum()
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Analyses every source on the worker pool. A source that fails to load
    /// or analyse is logged and reported without stopping the run; results
    /// keep input order.
    pub fn execute<S: FlightSource>(&self, directory: &AirportDirectory, sources: &[S]) -> anyhow::Result<RunReport> {
        let metrics = MetricsRecorder::new();
        let engine = ApproachDetectionEngine::new(directory, self.config.thresholds.clone())
            .context("building approach detection engine")?
            .with_metrics(&metrics);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .context("building analysis worker pool")?;

        let results: Vec<Result<FlightAnalysis, FailedFlight>> = pool.install(|| {
            sources
                .par_iter()
                .map(|source| {
                    let flight = source.load().map_err(|err| FailedFlight {
                        flight_id: source.flight_id(),
                        error: format!("{:#}", err),
                    })?;
                    engine
                        .analyze(&flight.flight_id, &flight.frames)
                        .map_err(|err| FailedFlight {
                            flight_id: flight.flight_id.clone(),
                            error: err.to_string(),
                        })
                })
                .collect()
        });

        let mut analyses = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(failure) => {
                    log::error!("flight {} failed: {}", failure.flight_id, failure.error);
                    metrics.record_failure();
                    failures.push(failure);
                }
            }
        }

        Ok(RunReport {
            analyses,
            failures,
            metrics: metrics.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_demo_flights, demo_directory, GeneratorConfig};
    use approachcore::processing::LandingOutcome;
    use approachcore::telemetry::TelemetryFrame;

    #[test]
    fn runner_analyzes_flights_in_order() {
        let generator = GeneratorConfig {
            flights: 3,
            ..Default::default()
        };
        let directory = demo_directory(&generator).unwrap();
        let mut flights = build_demo_flights(&generator);
        flights.push(FlightLog {
            flight_id: "empty".into(),
            frames: vec![TelemetryFrame::default(); 3],
        });

        let runner = Runner::new(WorkflowConfig {
            jobs: 2,
            ..Default::default()
        });
        let report = runner.execute(&directory, &flights).unwrap();

        let ids: Vec<_> = report.analyses.iter().map(|a| a.flight_id.as_str()).collect();
        assert_eq!(ids, vec!["demo-00", "demo-01", "demo-02"]);
        for analysis in &report.analyses {
            let outcomes: Vec<_> = analysis.approaches.iter().map(|r| r.outcome).collect();
            assert_eq!(outcomes, vec![LandingOutcome::TouchAndGo, LandingOutcome::FullStop]);
            assert_eq!(analysis.takeoffs, 2);
        }
        assert_eq!(report.approach_count(), 6);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].flight_id, "empty");
        assert_eq!(report.metrics.flights, 4);
        assert_eq!(report.metrics.failed_flights, 1);
        assert_eq!(report.metrics.approaches, 6);
    }

    #[test]
    fn unreadable_files_do_not_stop_the_run() {
        let generator = GeneratorConfig::default();
        let directory = demo_directory(&generator).unwrap();
        let runner = Runner::new(WorkflowConfig::default());

        let report = runner
            .execute(&directory, &[PathBuf::from("/nonexistent/flight.csv")])
            .unwrap();
        assert!(report.analyses.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].flight_id, "flight");
        assert!(report.failures[0].error.contains("opening telemetry"));
    }

    #[test]
    fn empty_reference_data_fails_the_run() {
        let runner = Runner::new(WorkflowConfig::default());
        let flights: Vec<FlightLog> = Vec::new();
        assert!(runner.execute(&AirportDirectory::new(), &flights).is_err());
    }
}
