//! Composition root and named manager accessors
//!
//! The [`Container`] owns the shared I/O handles and hands out exactly one
//! instance of each manager per container. Nothing here is a process-wide
//! global; a second container gets fresh managers with fresh caches.

mod capability;
mod detector;
mod driver;

pub use capability::{CapabilityError, CapabilityManager};
pub use detector::DetectorManager;
pub use driver::{
    CleanUp, CopyDriver, CreateEntry, FilesystemDriver, FilesystemDriverManager, ListEntries,
    SymlinkDriver, COPY_DRIVER, SYMLINK_DRIVER,
};

use crate::config::EnvprobeConfig;
use crate::detectors::builtin_detectors;
use crate::fs::{FileSystem, RealFileSystem};
use crate::platform::{Platform, RealPlatform};
use std::sync::Arc;

pub struct Container {
    fs: Arc<dyn FileSystem>,
    platform: Arc<dyn Platform>,
    config: EnvprobeConfig,
    capabilities: Option<CapabilityManager>,
    drivers: Option<FilesystemDriverManager>,
}

impl Container {
    /// A container over the real filesystem and process environment.
    pub fn new(config: EnvprobeConfig) -> Self {
        Self::with_handles(
            config,
            Arc::new(RealFileSystem::new()),
            Arc::new(RealPlatform::new()),
        )
    }

    /// A container with substituted I/O handles, for tests and embedding.
    pub fn with_handles(
        config: EnvprobeConfig,
        fs: Arc<dyn FileSystem>,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            fs,
            platform,
            config,
            capabilities: None,
            drivers: None,
        }
    }

    pub fn config(&self) -> &EnvprobeConfig {
        &self.config
    }

    /// The capability manager, constructed with the builtin detector set on
    /// first access and reused afterwards.
    pub fn capability_manager(&mut self) -> &mut CapabilityManager {
        let fs = self.fs.clone();
        let platform = self.platform.clone();
        let config = self.config.clone();
        self.capabilities.get_or_insert_with(move || {
            let mut manager = CapabilityManager::with_policy(config.failure_policy);
            for detector in builtin_detectors(fs, platform, &config.scratch_dir) {
                manager
                    .register(detector)
                    .expect("builtin detector identifiers are unique");
            }
            manager
        })
    }

    /// The detector registry behind the capability manager.
    pub fn detector_manager(&mut self) -> &mut DetectorManager {
        self.capability_manager().detectors()
    }

    /// The filesystem driver manager, constructed with the builtin drivers
    /// on first access and reused afterwards.
    pub fn filesystem_driver_manager(&mut self) -> &mut FilesystemDriverManager {
        let fs = self.fs.clone();
        let config = self.config.clone();
        self.drivers.get_or_insert_with(move || {
            let mut manager = FilesystemDriverManager::new();
            manager
                .register(Box::new(SymlinkDriver::new(fs.clone(), &config.scratch_dir)))
                .expect("builtin driver identifiers are unique");
            manager
                .register(Box::new(CopyDriver::new(fs)))
                .expect("builtin driver identifiers are unique");
            manager
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Unit;
    use crate::fs::MockFileSystem;
    use crate::platform::MockPlatform;
    use std::path::PathBuf;

    fn test_container() -> Container {
        let config = EnvprobeConfig {
            scratch_dir: PathBuf::from("/probe/scratch"),
            ..EnvprobeConfig::default()
        };
        Container::with_handles(
            config,
            Arc::new(MockFileSystem::new()),
            Arc::new(MockPlatform::new().with_env("LANG", "C.UTF-8")),
        )
    }

    #[test]
    fn accessors_return_the_same_instance() {
        let mut container = test_container();

        container.capability_manager().evaluate_all().unwrap();
        // The second access must see the already-evaluated state, not a
        // fresh manager.
        assert!(container.capability_manager().supports("symlink").unwrap());
        assert_eq!(container.detector_manager().len(), 6);
    }

    #[test]
    fn two_containers_are_isolated() {
        let mut a = test_container();
        let mut b = test_container();

        a.capability_manager().invalidate();
        assert!(b.capability_manager().supports("symlink").unwrap());
        assert!(a.capability_manager().supports("symlink").unwrap());
    }

    #[test]
    fn driver_manager_carries_builtin_drivers() {
        let mut container = test_container();
        let drivers = container.filesystem_driver_manager();
        assert!(drivers.get("symlink").is_ok());
        assert!(drivers.get("copy").is_ok());

        let best = drivers.best_available().unwrap().unwrap();
        assert_eq!(best.name(), SYMLINK_DRIVER);
    }
}
