//! Filesystem case sensitivity detector

use super::Detection;
use crate::engine::{Evaluate, Unit};
use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CASE_SENSITIVITY: &str = "case-sensitivity";

/// Probes whether the filesystem distinguishes path case: writes a lowercase
/// marker and checks whether its uppercase spelling resolves to the same
/// entry. Supported means case-sensitive.
pub struct CaseSensitivityDetector {
    fs: Arc<dyn FileSystem>,
    scratch_dir: PathBuf,
}

impl CaseSensitivityDetector {
    pub fn new(fs: Arc<dyn FileSystem>, scratch_dir: &Path) -> Self {
        Self {
            fs,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }
}

impl Unit for CaseSensitivityDetector {
    fn name(&self) -> &str {
        CASE_SENSITIVITY
    }
}

impl Evaluate for CaseSensitivityDetector {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        let dir = self.scratch_dir.join("case-probe");
        self.fs
            .create_dir_all(&dir)
            .context("creating case scratch dir")?;

        let lower = dir.join("marker.tmp");
        let upper = dir.join("MARKER.TMP");
        let result = match self.fs.write(&lower, "marker") {
            Err(err) => Ok(Detection::unsupported(format!(
                "writing the case marker failed: {:#}",
                err
            ))),
            Ok(()) => {
                if self.fs.exists(&upper) {
                    Ok(Detection::unsupported("paths fold case"))
                } else {
                    Ok(Detection::supported().with_detail("paths are case sensitive"))
                }
            }
        };
        self.fs.remove_dir_all(&dir).ok();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn scratch() -> PathBuf {
        PathBuf::from("/probe/scratch")
    }

    #[test]
    fn case_sensitive_filesystem_is_supported() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let detector = CaseSensitivityDetector::new(fs.clone(), &scratch());

        let detection = detector.evaluate(&[]).unwrap();
        assert!(detection.supported);
        assert!(!fs.exists(&scratch().join("case-probe")));
    }

    #[test]
    fn caseless_filesystem_is_unsupported() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new().case_insensitive());
        let detector = CaseSensitivityDetector::new(fs, &scratch());

        let detection = detector.evaluate(&[]).unwrap();
        assert!(!detection.supported);
        assert_eq!(detection.detail.as_deref(), Some("paths fold case"));
    }
}
