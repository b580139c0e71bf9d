//! Symbolic link semantics detectors

use super::Detection;
use crate::engine::{Evaluate, Unit};
use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const SYMLINK: &str = "symlink";
pub const DANGLING_SYMLINK: &str = "dangling-symlink";

const PROBE_TOKEN: &str = "symlink-probe-token";

/// Probes whether the filesystem supports creating symlinks that resolve to
/// their target's content.
pub struct SymlinkDetector {
    fs: Arc<dyn FileSystem>,
    scratch_dir: PathBuf,
}

impl SymlinkDetector {
    pub fn new(fs: Arc<dyn FileSystem>, scratch_dir: &Path) -> Self {
        Self {
            fs,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }

    fn probe(&self, dir: &Path) -> Result<Detection> {
        let target = dir.join("target.txt");
        let link = dir.join("link.txt");
        self.fs
            .write(&target, PROBE_TOKEN)
            .context("writing link target")?;

        if let Err(err) = self.fs.symlink(&target, &link) {
            debug!(error = %err, "link creation failed");
            return Ok(Detection::unsupported(format!(
                "link creation failed: {:#}",
                err
            )));
        }
        if !self.fs.is_symlink(&link) {
            return Ok(Detection::unsupported(
                "created link is not reported as a symlink",
            ));
        }
        match self.fs.read_to_string(&link) {
            Ok(content) if content == PROBE_TOKEN => {
                Ok(Detection::supported().with_detail("links resolve to their target"))
            }
            Ok(_) => Ok(Detection::unsupported("link did not resolve to its target")),
            Err(err) => Ok(Detection::unsupported(format!(
                "reading through the link failed: {:#}",
                err
            ))),
        }
    }
}

impl Unit for SymlinkDetector {
    fn name(&self) -> &str {
        SYMLINK
    }
}

impl Evaluate for SymlinkDetector {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        let dir = self.scratch_dir.join("symlink-probe");
        self.fs
            .create_dir_all(&dir)
            .context("creating symlink scratch dir")?;
        let result = self.probe(&dir);
        self.fs.remove_dir_all(&dir).ok();
        result
    }
}

/// Probes whether dangling links are observable distinctly from missing
/// paths. Requires [`SymlinkDetector`] to have succeeded first.
pub struct DanglingSymlinkDetector {
    fs: Arc<dyn FileSystem>,
    scratch_dir: PathBuf,
}

impl DanglingSymlinkDetector {
    pub fn new(fs: Arc<dyn FileSystem>, scratch_dir: &Path) -> Self {
        Self {
            fs,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }
}

impl Unit for DanglingSymlinkDetector {
    fn name(&self) -> &str {
        DANGLING_SYMLINK
    }

    fn dependencies(&self) -> Vec<String> {
        vec![SYMLINK.to_string()]
    }
}

impl Evaluate for DanglingSymlinkDetector {
    type Output = Detection;

    fn evaluate(&self, deps: &[&Detection]) -> Result<Detection> {
        let symlink = deps.first().context("missing symlink detection result")?;
        if !symlink.supported {
            return Ok(Detection::unsupported("symlinks are unavailable"));
        }

        let dir = self.scratch_dir.join("dangling-probe");
        self.fs
            .create_dir_all(&dir)
            .context("creating dangling-link scratch dir")?;

        let link = dir.join("dangling.txt");
        let result = match self.fs.symlink(Path::new("missing-target.txt"), &link) {
            Err(err) => Ok(Detection::unsupported(format!(
                "dangling link creation failed: {:#}",
                err
            ))),
            Ok(()) => {
                if self.fs.is_symlink(&link) && !self.fs.exists(&link) {
                    Ok(Detection::supported()
                        .with_detail("dangling links are distinguishable from missing paths"))
                } else {
                    Ok(Detection::unsupported(
                        "dangling links are indistinguishable from missing paths",
                    ))
                }
            }
        };
        self.fs.remove_dir_all(&dir).ok();
        result
    }
}
