//! OS environment abstraction
//!
//! The locale and shell detectors read process environment and OS facts
//! through this trait instead of `std::env`, so tests can pin down exactly
//! what the probed environment looks like.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Broad OS family, as far as quoting and path semantics care
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Unix,
    Windows,
}

/// Abstraction over process environment and OS facts
pub trait Platform: Send + Sync {
    /// Read an environment variable
    fn env_var(&self, name: &str) -> Option<String>;

    /// The OS family the process runs on
    fn os_family(&self) -> OsFamily;

    /// Directory for scratch files
    fn temp_dir(&self) -> PathBuf;
}

pub struct RealPlatform;

impl RealPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for RealPlatform {
    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn os_family(&self) -> OsFamily {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    fn temp_dir(&self) -> PathBuf {
        env::temp_dir()
    }
}

/// Test double with a fixed environment
pub struct MockPlatform {
    vars: HashMap<String, String>,
    family: OsFamily,
    temp: PathBuf,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            family: OsFamily::Unix,
            temp: PathBuf::from("/probe/tmp"),
        }
    }

    pub fn windows(mut self) -> Self {
        self.family = OsFamily::Windows;
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_temp_dir(mut self, temp: PathBuf) -> Self {
        self.temp = temp;
        self
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn os_family(&self) -> OsFamily {
        self.family
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp.clone()
    }
}
