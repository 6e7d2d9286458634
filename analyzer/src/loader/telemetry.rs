use anyhow::{bail, Context};
use approachcore::telemetry::TelemetryFrame;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// One flight's raw telemetry, named by its source file.
#[derive(Debug, Clone)]
pub struct FlightLog {
    pub flight_id: String,
    pub frames: Vec<TelemetryFrame>,
}

/// Raw CSV row. Blank or unparsable cells become `None` and are left for the
/// engine to reject.
#[derive(Debug, Deserialize)]
struct TelemetryRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    time: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    msl_altitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    indicated_airspeed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vertical_airspeed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    heading: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    groundspeed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    eng_1_rpm: Option<f64>,
}

impl From<TelemetryRow> for TelemetryFrame {
    fn from(row: TelemetryRow) -> Self {
        Self {
            time: row.time,
            msl_altitude: row.msl_altitude,
            indicated_airspeed: row.indicated_airspeed,
            vertical_airspeed: row.vertical_airspeed,
            heading: row.heading,
            latitude: row.latitude,
            longitude: row.longitude,
            groundspeed: row.groundspeed,
            engine_rpm: row.eng_1_rpm,
        }
    }
}

/// Reads every row into a frame. Rows the CSV layer cannot split become empty
/// frames so sample indices keep matching file rows.
pub fn read_frames(reader: impl Read) -> anyhow::Result<Vec<TelemetryFrame>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().context("reading telemetry header")?;
    if !headers.iter().any(|h| h == "time") {
        bail!("telemetry header has no time column");
    }

    let mut frames = Vec::new();
    for (row_index, result) in csv_reader.deserialize::<TelemetryRow>().enumerate() {
        match result {
            Ok(row) => frames.push(row.into()),
            Err(err) => {
                log::debug!("telemetry row {} unreadable: {}", row_index + 1, err);
                frames.push(TelemetryFrame::default());
            }
        }
    }
    Ok(frames)
}

/// Flight id of a telemetry file: its file stem.
pub fn flight_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_flight(path: &Path) -> anyhow::Result<FlightLog> {
    let file = File::open(path).with_context(|| format!("opening telemetry {}", path.display()))?;
    let frames = read_frames(file).with_context(|| format!("reading telemetry {}", path.display()))?;
    Ok(FlightLog {
        flight_id: flight_id(path),
        frames,
    })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Expands directories into their `*.csv` files in sorted order; plain files
/// are kept as given.
pub fn collect_flight_paths(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("scanning flight directory {}", input.display()))?
            {
                let path = entry
                    .with_context(|| format!("scanning flight directory {}", input.display()))?
                    .path();
                if path.is_file() && is_csv(&path) {
                    found.push(path);
                }
            }
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}
