//! CSV and console output.
//!
//! Writers take any [`Write`] sink so they can target files or in-memory
//! buffers; the `*_file` helpers create parent directories first.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path as FsPath;

use serde::Serialize;

use rating_core::types::{Path, RatioStatus};
use rating_engine::{ScenarioResult, SummaryRow};

use crate::error::{CliError, Result};

/// Long-format record of one year of one retained path.
#[derive(Debug, Serialize)]
struct PathRecord {
    path: usize,
    seed: u64,
    year: usize,
    revenue: f64,
    ebitda: f64,
    debt: f64,
    coverage: f64,
    leverage: f64,
    breach: bool,
    leak_active: bool,
    effective_severity: f64,
    ratio_status: RatioStatus,
    downgraded: bool,
}

#[derive(Debug, Serialize)]
struct HistogramRecord {
    year: usize,
    count: usize,
}

/// Writes one row per scenario.
pub fn write_summary<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record(SummaryRow::HEADERS)?;
    }
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes retained paths in long format, one row per path-year.
///
/// `downgraded` is true from the triggering year onwards.
pub fn write_sample_paths<W: Write>(writer: W, paths: &[Path]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (index, path) in paths.iter().enumerate() {
        let downgrade_year = path.downgrade_year();
        for year in path.years() {
            csv.serialize(PathRecord {
                path: index,
                seed: path.seed(),
                year: year.year,
                revenue: year.revenue,
                ebitda: year.ebitda,
                debt: year.debt,
                coverage: year.coverage,
                leverage: year.leverage,
                breach: year.breach,
                leak_active: year.leak_active,
                effective_severity: year.effective_severity,
                ratio_status: year.ratio_status,
                downgraded: downgrade_year.is_some_and(|d| year.year >= d),
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

/// Writes the count of downgrades triggered in each year.
pub fn write_histogram<W: Write>(writer: W, result: &ScenarioResult) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for (index, count) in result.downgrade_year_histogram().into_iter().enumerate() {
        csv.serialize(HistogramRecord {
            year: index + 1,
            count,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Opens `path` for writing, creating missing parent directories.
pub fn create_output(path: &FsPath) -> Result<BufWriter<File>> {
    if path.as_os_str().is_empty() {
        return Err(CliError::InvalidArgument(
            "output path cannot be empty".to_string(),
        ));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Console table of summary rows.
pub fn format_summary_table(rows: &[SummaryRow]) -> String {
    let parameter = rows.first().map_or("value", |r| r.parameter);
    let mut table = format!(
        "{:>18} {:>10} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
        parameter, "severity", "P(downgrade)", "P(<=window)", "std err", "mean year", "leak share"
    );
    for row in rows {
        let mean_year = row
            .mean_downgrade_year
            .map_or_else(|| "-".to_string(), |y| format!("{:.2}", y));
        table.push_str(&format!(
            "{:>18.4} {:>10.4} {:>12.4} {:>12.4} {:>10.4} {:>10} {:>10.4}\n",
            row.value,
            row.severity,
            row.downgrade_probability,
            row.downgrade_probability_within_window,
            row.std_error,
            mean_year,
            row.leak_share,
        ));
    }
    table
}
