use flate2::read::GzDecoder;
use std::io::Read;
use tar::Archive;

use crate::{DocumentKind, IngestError, Upload};

/// Result of archive expansion, including any warnings (e.g. size limit reached).
#[derive(Debug, Default)]
pub struct ArchiveExpansion {
    pub uploads: Vec<Upload>,
    pub warnings: Vec<String>,
}

/// Returns true if the filename looks like a supported archive.
pub fn is_archive_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".zip") || lower.ends_with(".tar.gz") || lower.ends_with(".tgz")
}

/// Returns true if the entry would be screened once staged.
fn is_screenable(name: &str) -> bool {
    DocumentKind::from_name(name) != DocumentKind::Unsupported
}

/// Skip rules shared by both archive formats. `None` means keep the entry
/// and yields its basename.
fn entry_basename(name_str: &str) -> Option<String> {
    if name_str.contains("__MACOSX") {
        return None;
    }
    if name_str.split(['/', '\\']).any(|part| part == "..") || name_str.starts_with('/') {
        return None;
    }
    let basename = name_str.rsplit(['/', '\\']).next()?.to_string();
    if basename.is_empty() || basename.starts_with('.') {
        return None;
    }
    if !is_screenable(&basename) {
        return None;
    }
    Some(basename)
}

/// Running total against the optional size cap.
struct SizeBudget {
    max_size: u64,
    used: u64,
}

impl SizeBudget {
    fn new(max_size: u64) -> Self {
        Self { max_size, used: 0 }
    }

    /// Account for `size` more bytes; false once the cap is exceeded.
    fn take(&mut self, size: u64) -> bool {
        if self.max_size == 0 {
            return true;
        }
        self.used += size;
        self.used <= self.max_size
    }

    fn warning(&self, kept: usize) -> String {
        format!(
            "Size limit ({}MB) reached after {} files, skipping remaining",
            self.max_size / 1024 / 1024,
            kept
        )
    }
}

/// Expand an uploaded archive into one upload per screenable entry.
///
/// Supports ZIP and tar.gz. Type is detected by extension, then magic bytes.
/// `max_size` limits total expanded bytes (0 = unlimited); when the limit is
/// reached expansion stops and a warning is included in the result.
pub fn expand_archive(upload: &Upload, max_size: u64) -> Result<ArchiveExpansion, IngestError> {
    let name = upload.filename.to_lowercase();
    let data = upload.bytes.as_slice();

    let expansion = if name.ends_with(".zip") || data.starts_with(b"PK") {
        expand_zip(data, max_size)?
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") || data.starts_with(&[0x1f, 0x8b])
    {
        expand_tar_gz(data, max_size)?
    } else {
        return Err(IngestError::Archive(format!(
            "unsupported archive format: {}",
            upload.filename
        )));
    };

    tracing::debug!(
        archive = %upload.filename,
        entries = expansion.uploads.len(),
        warnings = expansion.warnings.len(),
        "expanded archive"
    );
    Ok(expansion)
}

fn expand_zip(data: &[u8], max_size: u64) -> Result<ArchiveExpansion, IngestError> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| IngestError::Archive(format!("failed to open ZIP: {e}")))?;

    let mut expansion = ArchiveExpansion::default();
    let mut budget = SizeBudget::new(max_size);

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| IngestError::Archive(format!("failed to read ZIP entry: {e}")))?;

        if file.is_dir() {
            continue;
        }
        // Skip path traversal attempts
        if file.enclosed_name().is_none() {
            continue;
        }
        let name_str = file.name().to_string();
        let Some(basename) = entry_basename(&name_str) else {
            continue;
        };

        if !budget.take(file.size()) {
            expansion.warnings.push(budget.warning(expansion.uploads.len()));
            break;
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| IngestError::Archive(format!("failed to extract {name_str}: {e}")))?;
        expansion.uploads.push(Upload::new(basename, bytes));
    }

    Ok(expansion)
}

fn expand_tar_gz(data: &[u8], max_size: u64) -> Result<ArchiveExpansion, IngestError> {
    let gz = GzDecoder::new(data);
    let mut archive = Archive::new(gz);

    let entries = archive
        .entries()
        .map_err(|e| IngestError::Archive(format!("failed to read tar.gz: {e}")))?;

    let mut expansion = ArchiveExpansion::default();
    let mut budget = SizeBudget::new(max_size);

    for entry in entries {
        let mut entry =
            entry.map_err(|e| IngestError::Archive(format!("failed to read tar entry: {e}")))?;

        if entry.header().entry_type().is_dir() {
            continue;
        }
        let name_str = entry
            .path()
            .map_err(|e| IngestError::Archive(format!("failed to read entry path: {e}")))?
            .to_string_lossy()
            .to_string();
        let Some(basename) = entry_basename(&name_str) else {
            continue;
        };

        if !budget.take(entry.size()) {
            expansion.warnings.push(budget.warning(expansion.uploads.len()));
            break;
        }

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| IngestError::Archive(format!("failed to extract {name_str}: {e}")))?;
        expansion.uploads.push(Upload::new(basename, bytes));
    }

    Ok(expansion)
}
