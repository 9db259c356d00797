//! CSV breakdown of the tally per package.

use crate::allocation::format_sessions;
use crate::tally::PackageTally;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    package: &'a str,
    minutes_low: u32,
    minutes_high: u32,
    sessions_low: String,
    sessions_high: String,
}

impl<'a> From<&'a PackageTally> for CsvRow<'a> {
    fn from(tally: &'a PackageTally) -> Self {
        CsvRow {
            package: &tally.title,
            minutes_low: tally.minutes_low,
            minutes_high: tally.minutes_high,
            sessions_low: format_sessions(tally.sessions_low),
            sessions_high: format_sessions(tally.sessions_high),
        }
    }
}

/// Write package tallies as CSV (with headers) to any writer
pub fn write_tally_csv<W: Write>(writer: W, tallies: &[PackageTally]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for tally in tallies {
        writer.serialize(CsvRow::from(tally))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write package tallies to a CSV file, replacing any previous report
pub fn write_tally_report(path: &Path, tallies: &[PackageTally]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_tally_csv(file, tallies)?;
    tracing::info!("Wrote tally report for {} packages to {:?}", tallies.len(), path);
    Ok(())
}
