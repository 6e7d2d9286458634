use anyhow::{anyhow, Context};
use approachcore::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Driver settings for one analysis run, loadable from YAML.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub airports: Option<PathBuf>,
    pub runways: Option<PathBuf>,
    /// Telemetry files or directories scanned for `*.csv`.
    pub flights: Vec<PathBuf>,
    pub output: PathBuf,
    /// Worker threads; 0 lets rayon pick.
    pub jobs: usize,
    pub write_reports: bool,
    pub thresholds: AnalysisConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            airports: None,
            runways: None,
            flights: Vec::new(),
            output: PathBuf::from("output"),
            jobs: 0,
            write_reports: true,
            thresholds: AnalysisConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the workflow file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub airports: Option<PathBuf>,
    pub runways: Option<PathBuf>,
    pub flights: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub no_write: bool,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.airports.is_some() {
            self.airports = overrides.airports;
        }
        if overrides.runways.is_some() {
            self.runways = overrides.runways;
        }
        if !overrides.flights.is_empty() {
            self.flights = overrides.flights;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if let Some(jobs) = overrides.jobs {
            self.jobs = jobs;
        }
        if overrides.no_write {
            self.write_reports = false;
        }
        self
    }

    pub fn reference_paths(&self) -> anyhow::Result<(&Path, &Path)> {
        let airports = self
            .airports
            .as_deref()
            .ok_or_else(|| anyhow!("no airports file configured"))?;
        let runways = self
            .runways
            .as_deref()
            .ok_or_else(|| anyhow!("no runways file configured"))?;
        Ok((airports, runways))
    }
}
