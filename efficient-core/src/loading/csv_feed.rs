//! Readers for the headerless, variable-width CSV feeds
//!
//! Road rows: `label, lon1, lat1, ..., lonN, latN, altitude, length`
//! Route rows: `label, lon1, lat1, ..., lonN, latN, start_name, end_name`

use std::fs::File;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use geo::Point;
use log::warn;

use super::records::{FeedKind, FeedSource, IngestRecord};
use crate::Error;

/// Reads every well-formed row of a feed file. Malformed rows are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened
pub fn read_feed(source: &FeedSource) -> Result<Vec<IngestRecord>, Error> {
    let file = File::open(&source.path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", source.path.display(), e),
        )
    })?;
    Ok(read_feed_from(file, source.kind))
}

pub fn read_feed_from<R: Read>(reader: R, kind: FeedKind) -> Vec<IngestRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let parsed = match row {
            Ok(row) => parse_row(&row, kind),
            Err(e) => {
                warn!("Unreadable {kind:?} row {}: {e}", row_idx + 1);
                continue;
            }
        };
        match parsed {
            Some(record) => records.push(record),
            None => warn!("Skipping malformed {kind:?} row {}", row_idx + 1),
        }
    }
    records
}

fn is_number(field: &str) -> bool {
    field.parse::<f64>().is_ok()
}

/// Parses `lon, lat` pairs; needs at least two pairs
fn parse_points(fields: &[&str]) -> Option<Vec<Point<f64>>> {
    if fields.len() < 4 || fields.len() % 2 != 0 {
        return None;
    }
    fields
        .chunks_exact(2)
        .map(|pair| {
            let lon = pair[0].parse::<f64>().ok()?;
            let lat = pair[1].parse::<f64>().ok()?;
            Some(Point::new(lon, lat))
        })
        .collect()
}

fn parse_row(row: &StringRecord, kind: FeedKind) -> Option<IngestRecord> {
    let fields: Vec<&str> = row.iter().collect();
    let n = fields.len();
    if n < 6 {
        return None;
    }
    let (tail_a, tail_b) = (fields[n - 2], fields[n - 1]);
    let points = parse_points(&fields[1..n - 2])?;

    match kind {
        FeedKind::Roads => {
            (is_number(tail_a) && is_number(tail_b)).then_some(IngestRecord::Road { points })
        }
        FeedKind::Metro | FeedKind::BusA | FeedKind::BusB => {
            let named = |s: &str| !s.is_empty() && !is_number(s);
            (named(tail_a) && named(tail_b)).then(|| IngestRecord::Route {
                mode: kind.mode(),
                points,
                start_name: tail_a.to_string(),
                end_name: tail_b.to_string(),
            })
        }
    }
}
