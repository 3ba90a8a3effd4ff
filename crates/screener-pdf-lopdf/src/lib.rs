use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;

use screener_core::{BackendError, PdfBackend};

/// lopdf-based implementation of [`PdfBackend`].
///
/// This crate isolates the PDF library so the rest of the workspace only
/// sees the [`PdfBackend`] trait. Pages are read in page-number order and
/// joined with newlines.
///
/// lopdf can panic on some malformed content streams; those panics are
/// caught and reported as [`BackendError::ExtractionError`] so a single bad
/// file cannot take down a batch.
#[derive(Debug, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }

    fn extract_document(&self, document: &Document) -> Result<String, BackendError> {
        let mut pages_text = Vec::new();

        for page_number in document.get_pages().keys() {
            let text = document
                .extract_text(&[*page_number])
                .map_err(|e| BackendError::ExtractionError(format!("page {page_number}: {e}")))?;
            pages_text.push(text);
        }

        Ok(pages_text.join("\n"))
    }
}

impl PdfBackend for LopdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let document =
                Document::load(path).map_err(|e| BackendError::OpenError(e.to_string()))?;
            self.extract_document(&document)
        }));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic in PDF parser".into());
                Err(BackendError::ExtractionError(message))
            }
        }
    }
}
