//! Writers for finished analyses: a flat CSV table of per-frame parameters and a JSON
//! document carrying records, mapping and metadata together.

use crate::core::models::analysis::TrajectoryAnalysis;
use crate::core::models::geometry::{GeometryParameter, GeometryRecord};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const CSV_HEADER: [&str; 8] = [
    "frame",
    "time_fs",
    "time_ps",
    "twist_angle",
    "ring_planarity",
    "ring_acceptor_angle",
    "donor_acceptor_distance",
    "donor_pyramidalization",
];

fn csv_row(record: &GeometryRecord) -> Vec<String> {
    let mut row = Vec::with_capacity(CSV_HEADER.len());
    row.push(record.frame_index.to_string());
    row.push(format!("{:.2}", record.time_fs));
    row.push(format!("{:.6}", record.time_ps));
    for parameter in GeometryParameter::ALL {
        row.push(match record.value(parameter) {
            Some(value) => format!("{:.4}", value),
            None => "NaN".to_string(),
        });
    }
    row
}

/// Writes one CSV row per record, failed frames included with `NaN` parameters.
pub fn write_csv<W: Write>(records: &[GeometryRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.write_record(csv_row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[GeometryRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Pretty-printed JSON of the whole analysis. Undefined values become `null`.
pub fn write_json<W: Write>(analysis: &TrajectoryAnalysis, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, analysis)?;
    Ok(())
}

pub fn to_json_string(analysis: &TrajectoryAnalysis) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn write_csv_to_path(records: &[GeometryRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(records, BufWriter::new(file))
}

pub fn write_json_to_path(analysis: &TrajectoryAnalysis, path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(analysis, &mut writer)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
