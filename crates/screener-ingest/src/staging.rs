use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::Upload;

/// Scoped scratch directory for one batch of uploads.
///
/// Every staged file lives under a single temp directory that is removed
/// when the `StagingArea` is dropped, including on early return or unwind.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("screener-").tempdir()?;
        tracing::debug!(dir = %dir.path().display(), "created staging area");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `upload` into the staging area as `{index}_{basename}`.
    ///
    /// The index keeps same-named uploads from overwriting each other; the
    /// basename keeps the original extension for format detection.
    pub fn stage(&self, index: usize, upload: &Upload) -> std::io::Result<PathBuf> {
        let basename = Path::new(&upload.filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let out_path = self.dir.path().join(format!("{index}_{basename}"));
        std::fs::write(&out_path, &upload.bytes)?;
        Ok(out_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_with_index_prefix_and_basename() {
        let staging = StagingArea::new().unwrap();
        let upload = Upload::new("nested/dir/Jane Doe.TXT", b"hello".to_vec());
        let path = staging.stage(3, &upload).unwrap();
        assert_eq!(path.file_name().unwrap(), "3_Jane Doe.TXT");
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn duplicate_names_do_not_collide() {
        let staging = StagingArea::new().unwrap();
        let a = staging.stage(0, &Upload::new("cv.txt", b"a".to_vec())).unwrap();
        let b = staging.stage(1, &Upload::new("cv.txt", b"b".to_vec())).unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(&a).unwrap(), b"a");
    }

    #[test]
    fn directory_removed_on_drop() {
        let staging = StagingArea::new().unwrap();
        let dir = staging.path().to_path_buf();
        staging.stage(0, &Upload::new("cv.txt", b"x".to_vec())).unwrap();
        assert!(dir.exists());
        drop(staging);
        assert!(!dir.exists());
    }
}
