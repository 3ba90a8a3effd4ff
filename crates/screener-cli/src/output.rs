use std::io::Write;

use owo_colors::OwoColorize;
use screener_core::{Remark, RequirementsProfile};
use screener_ingest::DocumentKind;
use screener_reporting::{ReportRow, Summary, render_table, title_case};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

const REMARK_COL: usize = 3;
const RED_FLAGS_COL: usize = 12;

fn paint_remark(remark: Remark, cell: String) -> String {
    match remark {
        Remark::StrongMatch => cell.green().bold().to_string(),
        Remark::Moderate => cell.yellow().to_string(),
        Remark::Weak => cell.dimmed().to_string(),
        Remark::Disqualified => cell.red().bold().to_string(),
    }
}

/// Print warnings collected while gathering inputs.
pub fn print_warnings(w: &mut dyn Write, warnings: &[String], color: ColorMode) -> std::io::Result<()> {
    for warning in warnings {
        if color.enabled() {
            writeln!(w, "{} {}", "warning:".yellow().bold(), warning)?;
        } else {
            writeln!(w, "warning: {}", warning)?;
        }
    }
    Ok(())
}

/// Print the report table, one line per candidate.
pub fn print_report(w: &mut dyn Write, rows: &[ReportRow], color: ColorMode) -> std::io::Result<()> {
    if rows.is_empty() {
        writeln!(w, "No candidates screened.")?;
        return Ok(());
    }

    let table = render_table(rows, |row, col, cell| {
        if !color.enabled() {
            return cell;
        }
        match col {
            REMARK_COL => paint_remark(row.remark, cell),
            RED_FLAGS_COL if !row.red_flags.is_empty() => cell.red().to_string(),
            _ => cell,
        }
    });
    write!(w, "{}", table)
}

/// Print remark totals after the table.
pub fn print_summary(w: &mut dyn Write, rows: &[ReportRow], color: ColorMode) -> std::io::Result<()> {
    let s = Summary::from_rows(rows);

    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    writeln!(w, "  Candidates screened: {}", s.total)?;
    let lines = [
        (Remark::StrongMatch, s.strong),
        (Remark::Moderate, s.moderate),
        (Remark::Weak, s.weak),
        (Remark::Disqualified, s.disqualified),
    ];
    for (remark, count) in lines {
        if count == 0 {
            continue;
        }
        let label = format!("{}:", remark);
        if color.enabled() {
            writeln!(w, "  {} {}", paint_remark(remark, label), count)?;
        } else {
            writeln!(w, "  {} {}", label, count)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the effective (normalized, defaults filled in) profile as TOML.
pub fn print_profile(
    w: &mut dyn Write,
    source: &str,
    profile: &RequirementsProfile,
    color: ColorMode,
) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(profile)?;
    if color.enabled() {
        writeln!(w, "{}", format!("# effective profile from {}", source).dimmed())?;
    } else {
        writeln!(w, "# effective profile from {}", source)?;
    }
    write!(w, "{}", rendered)?;
    Ok(())
}

/// Everything `inspect` shows about one document.
pub struct Inspection<'a> {
    pub filename: &'a str,
    pub kind: DocumentKind,
    pub text_chars: usize,
    pub experience_mentions: &'a [f64],
    pub row: &'a ReportRow,
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Print a dry-run breakdown of one candidate without writing a report.
pub fn print_inspection(w: &mut dyn Write, inspection: &Inspection<'_>, color: ColorMode) -> std::io::Result<()> {
    let row = inspection.row;

    if color.enabled() {
        writeln!(
            w,
            "{} {} ({}, {} characters of text)\n",
            "INSPECT:".bold().cyan(),
            inspection.filename.bold(),
            inspection.kind.as_str(),
            inspection.text_chars
        )?;
    } else {
        writeln!(
            w,
            "INSPECT: {} ({}, {} characters of text)\n",
            inspection.filename,
            inspection.kind.as_str(),
            inspection.text_chars
        )?;
    }

    let mentions: Vec<String> = inspection
        .experience_mentions
        .iter()
        .map(|m| screener_reporting::format_number(*m))
        .collect();
    let fields = [
        ("Experience mentions", if mentions.is_empty() { "-".to_string() } else { mentions.join(", ") }),
        ("Experience (years)", screener_reporting::format_number(row.experience_years)),
        ("Job level", row.job_level.to_string()),
        ("Education", title_case(&row.education)),
        ("Missing must-have", list_or_dash(&row.missing_must_have)),
        ("Good-to-have", list_or_dash(&row.good_to_have)),
        ("Preferred tools", list_or_dash(&row.preferred_tools)),
        ("Certifications", list_or_dash(&row.certifications)),
        ("Domains", list_or_dash(&row.domains)),
        ("Other traits", list_or_dash(&row.other_traits)),
        ("Red flags", list_or_dash(&row.red_flags)),
    ];
    for (label, value) in &fields {
        writeln!(w, "  {:<20} {}", format!("{}:", label), value)?;
    }

    let verdict = format!("{} ({})", screener_reporting::format_number(row.score), row.remark);
    if color.enabled() {
        writeln!(w, "  {:<20} {}", "Match %:", paint_remark(row.remark, verdict))?;
    } else {
        writeln!(w, "  {:<20} {}", "Match %:", verdict)?;
    }
    Ok(())
}
