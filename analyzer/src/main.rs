use anyhow::bail;
use clap::Parser;
use generator::profile::{build_demo_flights, demo_directory, GeneratorConfig};
use loader::{collect_flight_paths, load_directory};
use report::ReportEmitter;
use std::path::PathBuf;
use workflow::config::{Overrides, WorkflowConfig};
use workflow::runner::{RunReport, Runner};

mod generator;
mod loader;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline approach and landing analyzer for flight-data logs")]
struct Args {
    /// Telemetry CSV files or directories of them
    flights: Vec<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long)]
    airports: Option<PathBuf>,
    #[arg(long)]
    runways: Option<PathBuf>,
    /// Directory for approach reports and the run summary
    #[arg(long)]
    output: Option<PathBuf>,
    /// Worker threads (0 = one per core)
    #[arg(long)]
    jobs: Option<usize>,
    /// Log approach rows instead of writing report files
    #[arg(long, default_value_t = false)]
    no_write: bool,
    /// Analyze generated traffic-pattern flights instead of recorded logs
    #[arg(long, default_value_t = false)]
    demo: bool,
    #[arg(long, default_value_t = 1)]
    demo_flights: usize,
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn run_demo(runner: &Runner, args: &Args) -> anyhow::Result<RunReport> {
    let generator = GeneratorConfig {
        flights: args.demo_flights,
        seed: args.seed,
        ..Default::default()
    };
    let directory = demo_directory(&generator)?;
    runner.execute(&directory, &build_demo_flights(&generator))
}

fn run_recorded(runner: &Runner, config: &WorkflowConfig) -> anyhow::Result<RunReport> {
    let (airports, runways) = config.reference_paths()?;
    let directory = load_directory(airports, runways)?;
    let paths = collect_flight_paths(&config.flights)?;
    if paths.is_empty() {
        bail!("no telemetry files to analyze");
    }
    log::info!("analyzing {} flights", paths.len());
    runner.execute(&directory, &paths)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .apply(Overrides {
        airports: args.airports.clone(),
        runways: args.runways.clone(),
        flights: args.flights.clone(),
        output: args.output.clone(),
        jobs: args.jobs,
        no_write: args.no_write,
    });

    let runner = Runner::new(workflow_config.clone());
    let report = if args.demo {
        run_demo(&runner, &args)?
    } else {
        run_recorded(&runner, &workflow_config)?
    };

    ReportEmitter::new(&workflow_config.output, workflow_config.write_reports).emit(&report)?;

    println!(
        "Analyzed {} flights -> approaches {}, failed {}",
        report.analyses.len(),
        report.approach_count(),
        report.failures.len()
    );
    Ok(())
}
