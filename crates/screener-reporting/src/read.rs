//! Reading an exported CSV report back into rows.

use std::path::Path;

use csv::StringRecord;
use screener_core::{JobLevel, Remark};

use crate::export::COLUMNS;
use crate::{LIST_SEPARATOR, ReportError, ReportRow};

fn csv_error(err: csv::Error) -> ReportError {
    let line = err.position().map_or(1, |pos| pos.line() as usize);
    ReportError::Parse {
        line,
        message: err.to_string(),
    }
}

fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(LIST_SEPARATOR).map(str::to_string).collect()
    }
}

fn parse_number(cell: &str, column: &str, line: usize) -> Result<f64, ReportError> {
    cell.trim().parse().map_err(|_| ReportError::Parse {
        line,
        message: format!("`{cell}` is not a number in column {column}"),
    })
}

fn row_from_cells(cells: &StringRecord, line: usize) -> Result<ReportRow, ReportError> {
    if cells.len() != COLUMNS.len() {
        return Err(ReportError::Parse {
            line,
            message: format!("expected {} fields, found {}", COLUMNS.len(), cells.len()),
        });
    }
    let parse_err = |message: String| ReportError::Parse { line, message };

    Ok(ReportRow {
        candidate: cells[0].to_string(),
        job_level: cells[1].parse::<JobLevel>().map_err(parse_err)?,
        score: parse_number(&cells[2], COLUMNS[2], line)?,
        remark: cells[3].parse::<Remark>().map_err(parse_err)?,
        missing_must_have: split_list(&cells[4]),
        good_to_have: split_list(&cells[5]),
        preferred_tools: split_list(&cells[6]),
        certifications: split_list(&cells[7]),
        domains: split_list(&cells[8]),
        other_traits: split_list(&cells[9]),
        experience_years: parse_number(&cells[10], COLUMNS[10], line)?,
        education: cells[11].to_lowercase(),
        red_flags: split_list(&cells[12]),
    })
}

/// Parse a CSV report produced by [`export_results`](crate::export_results).
///
/// The header must match [`COLUMNS`] exactly. Education comes back in its
/// lowercase keyword form.
pub fn parse_report(content: &str) -> Result<Vec<ReportRow>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let header = reader.headers().map_err(csv_error)?;
    if header.is_empty() {
        return Err(ReportError::Parse {
            line: 1,
            message: "empty report".into(),
        });
    }
    if header.iter().ne(COLUMNS.iter().copied()) {
        return Err(ReportError::Parse {
            line: 1,
            message: format!("unexpected header: {}", header.iter().collect::<Vec<_>>().join(",")),
        });
    }

    reader
        .records()
        .map(|record| {
            let record = record.map_err(csv_error)?;
            let line = record.position().map_or(0, |pos| pos.line() as usize);
            row_from_cells(&record, line)
        })
        .collect()
}

pub fn read_report(path: &Path) -> Result<Vec<ReportRow>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_report(&content)
}
