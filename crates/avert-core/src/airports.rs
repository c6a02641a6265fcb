//! Airport table loading.
//!
//! The table is a CSV file with at least the columns `icao`, `name`, `lat`
//! and `lon`. Extra columns are ignored. A bad row never aborts the load:
//! it is set aside as a [`RejectedRow`] so callers can report it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AvertError, Result};
use crate::models::AirportRecord;

const REQUIRED_COLUMNS: [&str; 4] = ["icao", "name", "lat", "lon"];

/// A row that could not be turned into an [`AirportRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based line number in the source, when known
    pub line: Option<u64>,
    pub reason: String,
}

/// Airports accepted from a table plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportTable {
    pub airports: Vec<AirportRecord>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Deserialize)]
struct RawAirportRow {
    icao: Option<String>,
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl RawAirportRow {
    fn into_record(self) -> std::result::Result<AirportRecord, String> {
        let icao = self.icao.unwrap_or_default();
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(format!("Airport '{icao}' is missing lat/lon"));
        };
        let name = self.name.unwrap_or_else(|| icao.clone());

        let record = AirportRecord::new(icao, name, lat, lon);
        let errors = record.validate();
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors.join("; "))
        }
    }
}

/// Load the airport table from a CSV file.
pub fn load_airports(path: impl AsRef<Path>) -> Result<AirportTable> {
    let file = File::open(path)?;
    load_airports_from_reader(file)
}

/// Load the airport table from any CSV source.
///
/// Fails if a required column is missing or if no row survives validation.
/// Repeated codes keep the first occurrence.
pub fn load_airports_from_reader<R: Read>(reader: R) -> Result<AirportTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(column)) {
            return Err(AvertError::MissingColumn(column));
        }
    }
    let headers = csv::StringRecord::from(
        headers
            .iter()
            .map(|h| h.to_ascii_lowercase())
            .collect::<Vec<_>>(),
    );

    let mut table = AirportTable::default();
    let mut seen = HashSet::new();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                table.rejected.push(RejectedRow {
                    line: e.position().map(|p| p.line()),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line());

        let parsed = record
            .deserialize::<RawAirportRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(RawAirportRow::into_record);

        match parsed {
            Ok(airport) => {
                if seen.insert(airport.icao.to_ascii_uppercase()) {
                    table.airports.push(airport);
                } else {
                    table.rejected.push(RejectedRow {
                        line,
                        reason: format!("Duplicate airport code '{}'", airport.icao),
                    });
                }
            }
            Err(reason) => table.rejected.push(RejectedRow { line, reason }),
        }
    }

    if table.airports.is_empty() {
        return Err(AvertError::EmptyAirportTable);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_table() {
        let csv = "icao,name,lat,lon\n\
                   VOBL,Kempegowda International,13.1979,77.7063\n\
                   VOMM,Chennai International,12.9941,80.1709\n";
        let table = load_airports_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.airports.len(), 2);
        assert!(table.rejected.is_empty());
        assert_eq!(table.airports[0].icao, "VOBL");
        assert_eq!(table.airports[1].name, "Chennai International");
        assert_eq!(table.airports[1].lon, 80.1709);
    }

    #[test]
    fn test_extra_columns_and_header_case_are_tolerated() {
        let csv = "ICAO,Name,elevation_ft,Lat,Lon\n VOHS , Rajiv Gandhi ,2024, 17.2403 ,78.4294\n";
        let table = load_airports_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.airports.len(), 1);
        assert_eq!(table.airports[0].icao, "VOHS");
        assert_eq!(table.airports[0].name, "Rajiv Gandhi");
        assert_eq!(table.airports[0].lat, 17.2403);
    }

    #[test]
    fn test_bad_rows_are_rejected_not_fatal() {
        let csv = "icao,name,lat,lon\n\
                   VOBL,Kempegowda,13.1979,77.7063\n\
                   MISS,Missing coords,,\n\
                   TEXT,Bad number,north,77.0\n\
                   FAR,Off the map,95.0,77.0\n\
                   ,No code,12.0,77.0\n\
                   VOBL,Duplicate,13.0,77.0\n";
        let table = load_airports_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.airports.len(), 1);
        assert_eq!(table.rejected.len(), 5);
        assert_eq!(table.rejected[0].line, Some(3));
        assert!(table.rejected[0].reason.contains("missing lat/lon"));
        assert!(table.rejected[4].reason.contains("Duplicate"));
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "icao,name,lat\nVOBL,Kempegowda,13.1979\n";
        let err = load_airports_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AvertError::MissingColumn("lon")));
    }

    #[test]
    fn test_table_without_valid_rows_is_error() {
        let csv = "icao,name,lat,lon\nBAD,Nowhere,,\n";
        let err = load_airports_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AvertError::EmptyAirportTable));

        let header_only = "icao,name,lat,lon\n";
        assert!(load_airports_from_reader(header_only.as_bytes()).is_err());
    }
}
