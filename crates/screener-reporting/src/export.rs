use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{ReportError, ReportRow, Summary};

/// Report header, in display order.
pub const COLUMNS: [&str; 13] = [
    "Candidate",
    "Job Level",
    "Match %",
    "Remarks",
    "Missing Must-Have",
    "Matched Good-To-Have",
    "Preferred Tools",
    "Certifications",
    "Domains",
    "Other Traits",
    "Experience (Years)",
    "Education",
    "Red Flags",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Csv,
            ExportFormat::Json,
            ExportFormat::Markdown,
            ExportFormat::Text,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// Guess the format from an output path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::all().iter().copied().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!(
                "unknown export format `{other}` (expected csv, json, markdown or text)"
            )),
        }
    }
}

/// Render `rows` in `format` and write them to `path`, creating parent
/// directories as needed.
pub fn export_results(
    rows: &[ReportRow],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render(rows, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), format = %format, rows = rows.len(), "report written");
    Ok(())
}

pub fn render(rows: &[ReportRow], format: ExportFormat) -> Result<String, ReportError> {
    Ok(match format {
        ExportFormat::Csv => export_csv(rows)?,
        ExportFormat::Json => export_json(rows)?,
        ExportFormat::Markdown => export_markdown(rows),
        ExportFormat::Text => export_text(rows),
    })
}

fn export_csv(rows: &[ReportRow]) -> Result<String, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn export_json(rows: &[ReportRow]) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(rows)?;
    out.push('\n');
    Ok(out)
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn summary_line(rows: &[ReportRow]) -> String {
    let s = Summary::from_rows(rows);
    format!(
        "{} candidates | {} strong match | {} moderate | {} weak | {} disqualified",
        s.total, s.strong, s.moderate, s.weak, s.disqualified
    )
}

fn export_markdown(rows: &[ReportRow]) -> String {
    let mut out = String::from("# Screening Results\n\n");
    out.push_str(&summary_line(rows));
    out.push_str("\n\n");

    out.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(COLUMNS.len())));
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| md_escape(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

fn export_text(rows: &[ReportRow]) -> String {
    let mut out = String::from("Screening Results\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&summary_line(rows));
    out.push_str("\n\n");
    out.push_str(&render_table(rows, |_, _, cell| cell));
    out
}

/// Fixed-width table of `rows` under the [`COLUMNS`] header.
///
/// Widths are measured on the raw cell text; `decorate` then receives each
/// padded body cell with its row and column index (e.g. to add color
/// without breaking alignment).
pub fn render_table<F>(rows: &[ReportRow], decorate: F) -> String
where
    F: Fn(&ReportRow, usize, String) -> String,
{
    let body: Vec<Vec<String>> = rows.iter().map(ReportRow::cells).collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |cell: &str, width: usize| {
        let fill = width.saturating_sub(cell.chars().count());
        format!("{cell}{}", " ".repeat(fill))
    };

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (row, cells) in rows.iter().zip(body) {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, w))| decorate(row, col, pad(cell, *w)))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_row;

    #[test]
    fn format_parsing_and_extensions() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("html".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.JSON")),
            Some(ExportFormat::Json)
        );
        assert_eq!(ExportFormat::from_path(Path::new("out/report")), None);
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let mut row = sample_row();
        row.candidate = "say \"hi\".txt".into();
        row.good_to_have = vec!["two\nlines".into()];
        let csv = render(&[row], ExportFormat::Csv).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\".txt\",senior,"));
        assert!(csv.contains(",\"two\nlines\","));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let csv = render(&[sample_row(), sample_row()], ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Candidate,Job Level,Match %,Remarks,"));
        assert!(lines[0].ends_with("Education,Red Flags"));
        assert_eq!(
            lines[1],
            "jane_doe.pdf,senior,25.0,Weak,performance testing,,\"jira, postman\",istqb,,led,5.0,B.Tech,"
        );
    }

    #[test]
    fn json_uses_field_names() {
        let json = render(&[sample_row()], ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["candidate"], "jane_doe.pdf");
        assert_eq!(value[0]["job_level"], "senior");
        assert_eq!(value[0]["remark"], "Weak");
        assert_eq!(value[0]["preferred_tools"][1], "postman");
    }

    #[test]
    fn markdown_table_escapes_pipes() {
        let mut row = sample_row();
        row.candidate = "a|b.pdf".into();
        let md = render(&[row], ExportFormat::Markdown).unwrap();
        assert!(md.contains("| Candidate | Job Level |"));
        assert!(md.contains("| a\\|b.pdf | senior |"));
        assert!(md.contains("1 candidates | 0 strong match"));
    }

    #[test]
    fn table_columns_align() {
        let mut long = sample_row();
        long.candidate = "a_much_longer_candidate_name.docx".into();
        let table = render_table(&[sample_row(), long], |_, _, cell| cell);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        let level_col = lines[0].find("Job Level").unwrap();
        assert_eq!(&lines[2][level_col..level_col + 6], "senior");
        assert_eq!(&lines[3][level_col..level_col + 6], "senior");
    }

    #[test]
    fn decorate_sees_every_body_cell() {
        let table = render_table(&[sample_row()], |_, col, cell| {
            if col == 3 { format!("<{}>", cell.trim_end()) } else { cell }
        });
        assert!(table.contains("<Weak>"));
    }

    #[test]
    fn export_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("nested").join("report.csv");
        export_results(&[sample_row()], ExportFormat::Csv, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
