use screener_core::{RequirementsProfile, assess};
use screener_ingest::{StagingArea, Upload, extract_upload_text};

use crate::{ReportError, ReportRow, Summary};

/// Progress notifications emitted while a batch is screened.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    Screening {
        index: usize,
        total: usize,
        filename: &'a str,
    },
    Screened {
        index: usize,
        total: usize,
        row: &'a ReportRow,
    },
}

/// Score already-extracted, lowercased text for one candidate.
pub fn screen_text(candidate: &str, text: &str, profile: &RequirementsProfile) -> ReportRow {
    ReportRow::from_assessment(candidate, &assess(text, profile))
}

/// Screen every upload, in order, and return one row per upload.
///
/// Candidates are independent: an upload that cannot be staged or read is
/// scored as empty text and the batch carries on. Only failing to create the
/// staging directory itself is an error. The staging directory is removed
/// before this returns.
pub fn build_report<F>(
    uploads: &[Upload],
    profile: &RequirementsProfile,
    mut on_progress: F,
) -> Result<Vec<ReportRow>, ReportError>
where
    F: FnMut(ProgressEvent<'_>),
{
    let staging = StagingArea::new().map_err(ReportError::Staging)?;
    let total = uploads.len();
    let mut rows = Vec::with_capacity(total);

    for (index, upload) in uploads.iter().enumerate() {
        on_progress(ProgressEvent::Screening {
            index,
            total,
            filename: &upload.filename,
        });

        let text = extract_upload_text(&staging, index, upload);
        if text.is_empty() {
            tracing::debug!(file = %upload.filename, "no text extracted");
        }
        let row = screen_text(&upload.filename, &text, profile);

        on_progress(ProgressEvent::Screened {
            index,
            total,
            row: &row,
        });
        rows.push(row);
    }

    let summary = Summary::from_rows(&rows);
    tracing::info!(
        total = summary.total,
        strong = summary.strong,
        moderate = summary.moderate,
        weak = summary.weak,
        disqualified = summary.disqualified,
        "batch screened"
    );
    Ok(rows)
}
