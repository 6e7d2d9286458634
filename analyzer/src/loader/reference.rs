use anyhow::Context;
use approachcore::math::GeoPoint;
use approachcore::reference::{Airport, AirportDirectory, Runway};
use approachcore::AnalysisError;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AirportRow {
    code: String,
    name: String,
    city: String,
    state: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct RunwayRow {
    airport_code: String,
    runway_code: String,
    elevation: f64,
    magnetic_heading: f64,
    true_heading: f64,
    latitude: f64,
    longitude: f64,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader)
}

/// Adds every airport row to `directory`, returning the number read.
pub fn read_airports(reader: impl Read, directory: &mut AirportDirectory) -> anyhow::Result<usize> {
    let mut count = 0;
    for (row_index, result) in csv_reader(reader).deserialize::<AirportRow>().enumerate() {
        let row = result.with_context(|| format!("parsing airport row {}", row_index + 1))?;
        directory.add_airport(Airport::new(
            row.code,
            row.name,
            row.city,
            row.state,
            GeoPoint::new(row.latitude, row.longitude),
            row.elevation,
        ))?;
        count += 1;
    }
    Ok(count)
}

/// Attaches every runway row to its airport, returning the number read.
pub fn read_runways(reader: impl Read, directory: &mut AirportDirectory) -> anyhow::Result<usize> {
    let mut count = 0;
    for (row_index, result) in csv_reader(reader).deserialize::<RunwayRow>().enumerate() {
        let row = result.with_context(|| format!("parsing runway row {}", row_index + 1))?;
        directory.add_runway(Runway::new(
            row.airport_code,
            row.runway_code,
            row.elevation,
            row.magnetic_heading,
            row.true_heading,
            GeoPoint::new(row.latitude, row.longitude),
        ))?;
        count += 1;
    }
    Ok(count)
}

pub fn load_directory(airports: &Path, runways: &Path) -> anyhow::Result<AirportDirectory> {
    let mut directory = AirportDirectory::new();

    let file = File::open(airports)
        .with_context(|| format!("opening airports file {}", airports.display()))?;
    read_airports(file, &mut directory)
        .with_context(|| format!("loading airports from {}", airports.display()))?;
    if directory.is_empty() {
        return Err(AnalysisError::EmptyReferenceData)
            .with_context(|| format!("loading airports from {}", airports.display()));
    }

    let file = File::open(runways)
        .with_context(|| format!("opening runways file {}", runways.display()))?;
    read_runways(file, &mut directory)
        .with_context(|| format!("loading runways from {}", runways.display()))?;

    log::info!(
        "loaded {} airports with {} runways",
        directory.len(),
        directory.runway_count()
    );
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approachcore::reference::AirportLookup;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const AIRPORTS: &str = "code,name,city,state,latitude,longitude,elevation\n\
        KGFK, Grand Forks Intl, Grand Forks, ND, 47.9493, -97.1761, 845\n\
        KFAR,Hector Intl,Fargo,ND,46.9207,-96.8158,902\n";
    const RUNWAYS: &str = "airport_code,runway_code,elevation,magnetic_heading,true_heading,latitude,longitude\n\
        KGFK,17R,844,170,171.5,47.9493,-97.1761\n\
        KGFK,35L,844,350,351.5,47.9493,-97.1761\n\
        KFAR,18,900,180,181.0,46.9207,-96.8158\n";

    #[test]
    fn reads_airports_and_runways() {
        let mut directory = AirportDirectory::new();
        assert_eq!(read_airports(AIRPORTS.as_bytes(), &mut directory).unwrap(), 2);
        assert_eq!(read_runways(RUNWAYS.as_bytes(), &mut directory).unwrap(), 3);

        let gfk = directory.airport("KGFK").unwrap();
        assert_eq!(gfk.name, "Grand Forks Intl");
        assert_eq!(gfk.elevation, 845.0);
        let codes: Vec<_> = gfk.runways().iter().map(|r| r.runway_code.as_str()).collect();
        assert_eq!(codes, vec!["17R", "35L"]);
        assert_eq!(directory.runway_count(), 3);
    }

    #[test]
    fn runway_for_unknown_airport_is_fatal() {
        let mut directory = AirportDirectory::new();
        read_airports(AIRPORTS.as_bytes(), &mut directory).unwrap();
        let stray = "airport_code,runway_code,elevation,magnetic_heading,true_heading,latitude,longitude\n\
            KXXX,09,100,90,90,0.0,0.0\n";
        let err = read_runways(stray.as_bytes(), &mut directory).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::UnknownAirport("KXXX".into()))
        );
    }

    #[test]
    fn duplicate_airport_is_fatal() {
        let doubled = format!("{}KFAR,Hector Intl,Fargo,ND,46.9207,-96.8158,902\n", AIRPORTS);
        let mut directory = AirportDirectory::new();
        let err = read_airports(doubled.as_bytes(), &mut directory).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::DuplicateAirport("KFAR".into()))
        );
    }

    #[test]
    fn load_directory_rejects_empty_airport_file() {
        let mut airports = NamedTempFile::new().unwrap();
        airports
            .write_all(b"code,name,city,state,latitude,longitude,elevation\n")
            .unwrap();
        let mut runways = NamedTempFile::new().unwrap();
        runways.write_all(RUNWAYS.as_bytes()).unwrap();

        let err = load_directory(airports.path(), runways.path()).unwrap_err();
        assert!(err.root_cause().to_string().contains("no airports"));
    }

    #[test]
    fn load_directory_reads_files() {
        let mut airports = NamedTempFile::new().unwrap();
        airports.write_all(AIRPORTS.as_bytes()).unwrap();
        let mut runways = NamedTempFile::new().unwrap();
        runways.write_all(RUNWAYS.as_bytes()).unwrap();

        let directory = load_directory(airports.path(), runways.path()).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.airport("KFAR").unwrap().runway("18").is_some());
    }
}
