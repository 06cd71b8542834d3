//! CSV export of the full patient census.
//!
//! Fixed 13-column header, one row per active and archived record, cells
//! double-quoted. Missing optional fields render as a literal "N/A" so the
//! spreadsheet stays rectangular.

use crate::constants::{CSV_HEADER, MISSING_FIELD};
use crate::patient::PatientRecord;

fn cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn optional(value: Option<&String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => cell(v),
        _ => cell(MISSING_FIELD),
    }
}

fn row(record: &PatientRecord) -> String {
    [
        cell(record.id.as_str()),
        cell(&record.name),
        cell(&record.age.to_string()),
        cell(&record.gender),
        cell(&record.symptoms),
        cell(record.priority.label()),
        cell(&record.registered_at.format("%d/%m/%Y %H:%M:%S").to_string()),
        cell(record.current_step.id()),
        optional(record.vitals.temperature.as_ref()),
        optional(record.vitals.blood_pressure.as_ref()),
        optional(record.vitals.heart_rate.as_ref()),
        optional(record.vitals.oxygen_saturation.as_ref()),
        optional(record.vitals.pain_level.as_ref()),
    ]
    .join(",")
}

/// Renders the census (active then archived) as CSV text.
pub fn export_csv(active: &[PatientRecord], archived: &[PatientRecord]) -> String {
    let mut lines = Vec::with_capacity(1 + active.len() + archived.len());
    lines.push(CSV_HEADER.join(","));
    lines.extend(active.iter().map(row));
    lines.extend(archived.iter().map(row));
    lines.join("\n")
}
