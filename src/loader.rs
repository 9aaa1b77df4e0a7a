//! Loading and normalization of ride-history exports.
//!
//! A load either yields every row of the file as a [`RideRecord`] or fails
//! as a whole. Rows whose drop-off precedes their begin time are kept with a
//! duration of zero.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::config::ColumnMapping;
use crate::error::LoadError;
use crate::parser::{parse_amount, parse_timestamp, ride_duration};
use crate::record::RideRecord;

/// Loads every ride from the CSV file at `path` using `mapping`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_rides(path: &Path, mapping: &ColumnMapping) -> Result<Vec<RideRecord>, LoadError> {
    let file = open(path)?;
    read_from(file, mapping, path)
}

/// Loads every ride from `path`, choosing the column layout from its header row.
///
/// When no known layout matches, the error names the first column the
/// current export layout is missing.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_rides_detected(path: &Path) -> Result<(Vec<RideRecord>, ColumnMapping), LoadError> {
    let mut rdr = csv_reader(open(path)?);
    let headers = rdr
        .headers()
        .map_err(|e| csv_error(e, path, 0))?
        .clone();

    let names: Vec<&str> = headers.iter().collect();
    let mapping = match ColumnMapping::detect(names.iter().copied()) {
        Some(mapping) => mapping,
        None => {
            let fallback = ColumnMapping::rider_export();
            let column = fallback
                .missing_column(names.iter().copied())
                .unwrap_or_default();
            return Err(LoadError::Schema {
                column: column.to_string(),
            });
        }
    };
    debug!(fare_column = %mapping.fare, "Detected export layout");

    let rides = read_records(&mut rdr, &headers, &mapping, path)?;
    Ok((rides, mapping))
}

/// Reads rides from any CSV source, e.g. an in-memory buffer.
pub fn read_rides<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
) -> Result<Vec<RideRecord>, LoadError> {
    read_from(reader, mapping, Path::new("<input>"))
}

fn open(path: &Path) -> Result<File, LoadError> {
    debug!("Opening ride export");
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}

fn read_from<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
    path: &Path,
) -> Result<Vec<RideRecord>, LoadError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| csv_error(e, path, 0))?
        .clone();

    read_records(&mut rdr, &headers, mapping, path)
}

/// Column positions of the mapped fields within a header row.
struct ColumnIndex {
    begin_time: usize,
    dropoff_time: usize,
    fare: usize,
    status: usize,
    city: usize,
    distance: usize,
    product_type: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::Schema {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            begin_time: position(&mapping.begin_time)?,
            dropoff_time: position(&mapping.dropoff_time)?,
            fare: position(&mapping.fare)?,
            status: position(&mapping.status)?,
            city: position(&mapping.city)?,
            distance: position(&mapping.distance)?,
            product_type: position(&mapping.product_type)?,
        })
    }
}

fn read_records<R: Read>(
    rdr: &mut csv::Reader<R>,
    headers: &StringRecord,
    mapping: &ColumnMapping,
    path: &Path,
) -> Result<Vec<RideRecord>, LoadError> {
    let index = ColumnIndex::resolve(headers, mapping)?;
    let mut rides = Vec::new();
    let mut inverted = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| csv_error(e, path, row))?;
        let ride = normalize(&record, &index, mapping, row)?;

        if ride.begin_time > ride.dropoff_time {
            inverted += 1;
            warn!(row, "Drop-off precedes begin time, duration forced to zero");
        }

        rides.push(ride);
    }

    info!(rides = rides.len(), inverted, "Ride export loaded");
    Ok(rides)
}

fn normalize(
    record: &StringRecord,
    index: &ColumnIndex,
    mapping: &ColumnMapping,
    row: usize,
) -> Result<RideRecord, LoadError> {
    let cell = |i: usize| record.get(i).unwrap_or_default();

    let timestamp = |i: usize, column: &str| {
        let value = cell(i);
        parse_timestamp(value).map_err(|e| LoadError::parse(row, column, value, e))
    };
    let amount = |i: usize, column: &str| {
        let value = cell(i);
        parse_amount(value).map_err(|e| LoadError::parse(row, column, value, e))
    };

    let begin_time = timestamp(index.begin_time, &mapping.begin_time)?;
    let dropoff_time = timestamp(index.dropoff_time, &mapping.dropoff_time)?;

    Ok(RideRecord {
        duration_seconds: ride_duration(&begin_time, &dropoff_time),
        begin_time,
        dropoff_time,
        fare_amount: amount(index.fare, &mapping.fare)?,
        distance: amount(index.distance, &mapping.distance)?,
        status: cell(index.status).to_string(),
        city: cell(index.city).to_string(),
        product_type: cell(index.product_type).to_string(),
    })
}

fn csv_error(err: csv::Error, path: &Path, row: usize) -> LoadError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => LoadError::parse(row, "<record>", "", message),
    }
}
