//! Filesystem drivers and their manager
//!
//! A driver is a strategy for materializing entries on disk. Instead of one
//! interface ladder, a driver implements the base [`FilesystemDriver`]
//! contract plus whichever capability traits it actually has, surfaced
//! through the optional `as_*` accessors.

use crate::detectors::Detection;
use crate::engine::{
    Evaluate, EvaluationError, Evaluator, Registry, RegistryError, ResolveError, Unit,
};
use crate::fs::FileSystem;
use crate::ident::Identifier;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SYMLINK_DRIVER: &str = "symlink";
pub const COPY_DRIVER: &str = "copy";

/// Can enumerate the entries below a directory
pub trait ListEntries: Send + Sync {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Can place a source at a destination path
pub trait CreateEntry: Send + Sync {
    fn place(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Can remove an entry it placed earlier
pub trait CleanUp: Send + Sync {
    fn remove(&self, path: &Path) -> Result<()>;
}

/// Base driver contract: identity, an availability probe (via [`Evaluate`])
/// and optional capability accessors.
pub trait FilesystemDriver: Evaluate<Output = Detection> {
    fn as_lister(&self) -> Option<&dyn ListEntries> {
        None
    }

    fn as_creator(&self) -> Option<&dyn CreateEntry> {
        None
    }

    fn as_cleaner(&self) -> Option<&dyn CleanUp> {
        None
    }
}

/// Places entries as symbolic links. Only available where the filesystem
/// actually supports them.
pub struct SymlinkDriver {
    fs: Arc<dyn FileSystem>,
    scratch_dir: PathBuf,
}

impl SymlinkDriver {
    pub fn new(fs: Arc<dyn FileSystem>, scratch_dir: &Path) -> Self {
        Self {
            fs,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }
}

impl Unit for SymlinkDriver {
    fn name(&self) -> &str {
        SYMLINK_DRIVER
    }
}

impl Evaluate for SymlinkDriver {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        let dir = self.scratch_dir.join("symlink-driver-probe");
        self.fs
            .create_dir_all(&dir)
            .context("creating driver scratch dir")?;

        let target = dir.join("target.txt");
        let link = dir.join("link.txt");
        let result = match self
            .fs
            .write(&target, "driver-probe")
            .and_then(|_| self.fs.symlink(&target, &link))
        {
            Ok(()) => Ok(Detection::supported().with_detail("entries are placed as links")),
            Err(err) => Ok(Detection::unsupported(format!(
                "link placement failed: {:#}",
                err
            ))),
        };
        self.fs.remove_dir_all(&dir).ok();
        result
    }
}

impl FilesystemDriver for SymlinkDriver {
    fn as_lister(&self) -> Option<&dyn ListEntries> {
        Some(self)
    }

    fn as_creator(&self) -> Option<&dyn CreateEntry> {
        Some(self)
    }

    fn as_cleaner(&self) -> Option<&dyn CleanUp> {
        Some(self)
    }
}

impl ListEntries for SymlinkDriver {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.fs.read_dir(dir)?.into_iter().map(|e| e.path).collect())
    }
}

impl CreateEntry for SymlinkDriver {
    fn place(&self, source: &Path, destination: &Path) -> Result<()> {
        self.fs.symlink(source, destination)
    }
}

impl CleanUp for SymlinkDriver {
    fn remove(&self, path: &Path) -> Result<()> {
        self.fs.remove_file(path)
    }
}

/// Portable fallback: places entries as plain copies. No listing support.
pub struct CopyDriver {
    fs: Arc<dyn FileSystem>,
}

impl CopyDriver {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Unit for CopyDriver {
    fn name(&self) -> &str {
        COPY_DRIVER
    }
}

impl Evaluate for CopyDriver {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        Ok(Detection::supported().with_detail("entries are placed as copies"))
    }
}

impl FilesystemDriver for CopyDriver {
    fn as_creator(&self) -> Option<&dyn CreateEntry> {
        Some(self)
    }

    fn as_cleaner(&self) -> Option<&dyn CleanUp> {
        Some(self)
    }
}

impl CreateEntry for CopyDriver {
    fn place(&self, source: &Path, destination: &Path) -> Result<()> {
        self.fs.copy(source, destination)
    }
}

impl CleanUp for CopyDriver {
    fn remove(&self, path: &Path) -> Result<()> {
        self.fs.remove_file(path)
    }
}

/// Typed driver registry plus availability probing. Registration order is
/// preference order.
pub struct FilesystemDriverManager {
    registry: Registry<dyn FilesystemDriver>,
    evaluator: Evaluator<Detection>,
}

impl FilesystemDriverManager {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            evaluator: Evaluator::new(),
        }
    }

    pub fn register(
        &mut self,
        driver: Box<dyn FilesystemDriver>,
    ) -> Result<Identifier, RegistryError> {
        self.registry.register(driver)
    }

    pub fn get(&self, name: &str) -> Result<&dyn FilesystemDriver, RegistryError> {
        self.registry.get(name)
    }

    pub fn get_all(&self) -> impl Iterator<Item = &dyn FilesystemDriver> {
        self.registry.get_all()
    }

    pub fn resolve_order(&mut self) -> Result<&[Identifier], ResolveError> {
        self.registry.resolve_order()
    }

    /// Probes every driver that has no memoized availability yet.
    pub fn evaluate_all(&mut self) -> Result<(), EvaluationError> {
        self.evaluator.evaluate_all(&mut self.registry)
    }

    /// The first registered driver whose availability probe reported support.
    pub fn best_available(&mut self) -> Result<Option<&dyn FilesystemDriver>, EvaluationError> {
        self.evaluate_all()?;
        let order: Vec<Identifier> = self.registry.resolve_order()?.to_vec();
        for id in order {
            let available = self
                .evaluator
                .outcome_by_id(&id)
                .and_then(|o| o.value())
                .map(|d| d.supported)
                .unwrap_or(false);
            if available {
                return Ok(self.registry.unit_by_id(&id));
            }
        }
        Ok(None)
    }
}

impl Default for FilesystemDriverManager {
    fn default() -> Self {
        Self::new()
    }
}
