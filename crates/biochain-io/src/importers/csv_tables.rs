//! Positional readers for the individual CSV tables.
//!
//! Each reader takes any `io::Read`, skips the header line and parses the
//! leading columns of every row. A row that cannot be parsed is reported to
//! the diagnostics with its line number and counted as skipped; the
//! remaining rows are still returned.

use anyhow::Result;
use biochain_core::units::{Kilometers, Megagrams};
use biochain_core::{ArcRecord, Diagnostics, LoadStats, SiteId, SourceRecord};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::str::FromStr;

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

fn field<T: FromStr>(record: &StringRecord, index: usize, name: &str) -> Result<T, String> {
    let raw = record
        .get(index)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {name} column"))?;
    raw.parse()
        .map_err(|_| format!("invalid {name} '{raw}'"))
}

/// Drive `parse` over every data row, routing row failures into `diag`.
fn read_rows<R, T, F>(
    input: R,
    diag: &mut Diagnostics,
    stats: &mut LoadStats,
    mut parse: F,
) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&StringRecord) -> Result<T, String>,
{
    let mut rows = Vec::new();
    for record in reader(input).records() {
        let record = record?;
        match parse(&record) {
            Ok(row) => rows.push(row),
            Err(message) => {
                diag.add_error_at_line("parse", &message, line_of(&record));
                stats.skipped_lines += 1;
            }
        }
    }
    Ok(rows)
}

/// `id, supply` rows
pub fn parse_sources<R: Read>(
    input: R,
    diag: &mut Diagnostics,
    stats: &mut LoadStats,
) -> Result<Vec<SourceRecord>> {
    read_rows(input, diag, stats, |record| {
        Ok(SourceRecord {
            id: SiteId::new(field(record, 0, "id")?),
            supply: Megagrams(field(record, 1, "supply")?),
        })
    })
}

/// `id` rows; anything after the first column is ignored
pub fn parse_ids<R: Read>(
    input: R,
    diag: &mut Diagnostics,
    stats: &mut LoadStats,
) -> Result<Vec<SiteId>> {
    read_rows(input, diag, stats, |record| {
        Ok(SiteId::new(field(record, 0, "id")?))
    })
}

/// `origin, destination, distance, rate` rows
pub fn parse_arcs<R: Read>(
    input: R,
    diag: &mut Diagnostics,
    stats: &mut LoadStats,
) -> Result<Vec<ArcRecord>> {
    read_rows(input, diag, stats, |record| {
        Ok(ArcRecord {
            origin: SiteId::new(field(record, 0, "origin")?),
            destination: SiteId::new(field(record, 1, "destination")?),
            distance: Kilometers(field(record, 2, "distance")?),
            rate: field(record, 3, "rate")?,
        })
    })
}
