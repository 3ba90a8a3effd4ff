use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod archive;
pub mod docx;
pub mod staging;

pub use archive::{ArchiveExpansion, expand_archive, is_archive_name};
pub use staging::StagingArea;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF extraction error: {0}")]
    Pdf(#[from] screener_core::BackendError),
    #[error("DOCX extraction error: {0}")]
    Docx(String),
    #[error("text file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("archive error: {0}")]
    Archive(String),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of screener-ingest)")]
    NoPdfSupport,
}

/// Document format, decided by file extension alone (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Unsupported,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "txt" => DocumentKind::Txt,
            _ => DocumentKind::Unsupported,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .map(|n| Self::from_name(&n.to_string_lossy()))
            .unwrap_or(DocumentKind::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
            DocumentKind::Unsupported => "unsupported",
        }
    }
}

/// One uploaded candidate file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(display_name(path), bytes))
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_name(&self.filename)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Uploads gathered from the command-line inputs, plus anything worth telling
/// the user about (unreadable paths, archive size limits).
#[derive(Debug, Default)]
pub struct InputBatch {
    pub uploads: Vec<Upload>,
    pub warnings: Vec<String>,
}

/// Read every input path into uploads, expanding archives in place.
///
/// An unreadable file still yields an upload (with no bytes) so the candidate
/// appears in the report with empty text. An archive that cannot be read or
/// opened contributes only a warning.
pub fn read_inputs(paths: &[PathBuf], max_archive_size: u64) -> InputBatch {
    let mut batch = InputBatch::default();

    for path in paths {
        let name = display_name(path);
        let upload = match Upload::from_path(path) {
            Ok(upload) => upload,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not read input");
                batch.warnings.push(format!("{}: {}", path.display(), e));
                if !is_archive_name(&name) {
                    batch.uploads.push(Upload::new(name, Vec::new()));
                }
                continue;
            }
        };

        if !is_archive_name(&upload.filename) {
            batch.uploads.push(upload);
            continue;
        }

        match expand_archive(&upload, max_archive_size) {
            Ok(expansion) => {
                batch.uploads.extend(expansion.uploads);
                batch
                    .warnings
                    .extend(expansion.warnings.into_iter().map(|w| format!("{name}: {w}")));
            }
            Err(e) => {
                tracing::warn!(archive = %name, error = %e, "skipping unreadable archive");
                batch.warnings.push(format!("{name}: {e}"));
            }
        }
    }

    batch
}

/// Extract lowercased text from the document at `path`.
///
/// Dispatches on the file extension:
/// - `.pdf` → lopdf backend (requires `pdf` feature)
/// - `.docx` → `word/document.xml` runs
/// - `.txt` → strict UTF-8
/// - anything else → empty text
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    let text = match DocumentKind::from_path(path) {
        DocumentKind::Pdf => extract_pdf(path)?,
        DocumentKind::Docx => docx::extract_docx(path)?,
        DocumentKind::Txt => String::from_utf8(std::fs::read(path)?)?,
        DocumentKind::Unsupported => {
            tracing::debug!(file = %path.display(), "unsupported extension, no text");
            String::new()
        }
    };
    Ok(text.to_lowercase())
}

/// [`extract_text`], with every failure logged and turned into empty text.
pub fn extract_text_or_empty(path: &Path) -> String {
    match extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "text extraction failed, scoring as empty");
            String::new()
        }
    }
}

/// Stage `upload` as the `index`th file of the batch and extract its text.
///
/// Never fails: a staging error degrades to empty text like any other
/// extraction failure.
pub fn extract_upload_text(staging: &StagingArea, index: usize, upload: &Upload) -> String {
    match staging.stage(index, upload) {
        Ok(path) => extract_text_or_empty(&path),
        Err(e) => {
            tracing::warn!(file = %upload.filename, error = %e, "failed to stage upload, scoring as empty");
            String::new()
        }
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    use screener_core::PdfBackend;

    let backend = screener_pdf_lopdf::LopdfBackend::default();
    Ok(backend.extract_text(path)?)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn kind_detection_is_case_insensitive() {
        assert_eq!(DocumentKind::from_name("CV.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_name("cv.Docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_name("notes.txt"), DocumentKind::Txt);
        assert_eq!(DocumentKind::from_name("photo.jpg"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_name("README"), DocumentKind::Unsupported);
    }

    #[test]
    fn txt_is_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cv.txt", "Selenium and API Testing, 5 Years".as_bytes());
        assert_eq!(extract_text(&path).unwrap(), "selenium and api testing, 5 years");
    }

    #[test]
    fn invalid_utf8_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cv.txt", &[0x66, 0x6f, 0xff, 0xfe]);
        assert!(matches!(extract_text(&path), Err(IngestError::Encoding(_))));
        assert_eq!(extract_text_or_empty(&path), "");
    }

    #[test]
    fn zero_byte_file_is_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cv.txt", b"");
        assert_eq!(extract_text(&path).unwrap(), "");
    }

    #[test]
    fn unsupported_extension_is_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cv.rtf", b"{\\rtf1 Selenium}");
        assert_eq!(extract_text(&path).unwrap(), "");
    }

    #[test]
    fn docx_text_is_extracted_and_lowercased() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = docx::tests::docx_bytes(&["Bachelor of Science", "Selenium"]);
        let path = write(dir.path(), "cv.docx", &bytes);
        assert_eq!(extract_text(&path).unwrap(), "bachelor of science\nselenium\n");
    }

    #[test]
    fn corrupt_documents_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write(dir.path(), "cv.pdf", b"%PDF-1.4 truncated");
        let docx = write(dir.path(), "cv.docx", b"definitely not a zip");
        assert!(extract_text(&pdf).is_err());
        assert!(extract_text(&docx).is_err());
        assert_eq!(extract_text_or_empty(&pdf), "");
        assert_eq!(extract_text_or_empty(&docx), "");
    }

    #[test]
    fn upload_text_goes_through_staging() {
        let staging = StagingArea::new().unwrap();
        let upload = Upload::new("Jane.TXT", b"Cypress".to_vec());
        assert_eq!(extract_upload_text(&staging, 0, &upload), "cypress");
    }

    #[test]
    fn unreadable_input_still_yields_an_upload() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "a.txt", b"selenium");
        let missing = dir.path().join("missing.pdf");
        let missing_archive = dir.path().join("missing.zip");

        let batch = read_inputs(&[good, missing, missing_archive], 0);
        let names: Vec<_> = batch.uploads.iter().map(|u| u.filename.as_str()).collect();
        assert_eq!(names, ["a.txt", "missing.pdf"]);
        assert!(batch.uploads[1].bytes.is_empty());
        assert_eq!(batch.warnings.len(), 2);
    }
}
