//! Builtin environment detectors
//!
//! Each detector is a small unit probing one environment behavior through
//! the injected [`FileSystem`](crate::fs::FileSystem) /
//! [`Platform`](crate::platform::Platform) handles. The engine wires their
//! declared dependencies; nothing here resolves order by hand.

mod case_sensitivity;
mod locale;
mod shell;
mod symlink;

pub use case_sensitivity::CaseSensitivityDetector;
pub use locale::{UnicodeLocaleDetector, UnicodePathDetector};
pub use shell::{quote_posix, quote_windows, ShellQuotingDetector};
pub use symlink::{DanglingSymlinkDetector, SymlinkDetector};

use crate::engine::Evaluate;
use crate::fs::FileSystem;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// What a detector found out about one environment behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Detection {
    pub fn supported() -> Self {
        Self {
            supported: true,
            detail: None,
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self {
            supported: false,
            detail: Some(detail.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A unit whose evaluation yields a [`Detection`].
pub trait Detector: Evaluate<Output = Detection> {}

impl<T: Evaluate<Output = Detection>> Detector for T {}

/// The builtin detector set, in registration order.
pub fn builtin_detectors(
    fs: Arc<dyn FileSystem>,
    platform: Arc<dyn Platform>,
    scratch_dir: &Path,
) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(SymlinkDetector::new(fs.clone(), scratch_dir)),
        Box::new(DanglingSymlinkDetector::new(fs.clone(), scratch_dir)),
        Box::new(CaseSensitivityDetector::new(fs.clone(), scratch_dir)),
        Box::new(UnicodeLocaleDetector::new(platform.clone())),
        Box::new(UnicodePathDetector::new(fs, scratch_dir)),
        Box::new(ShellQuotingDetector::new(platform)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_constructors() {
        let ok = Detection::supported();
        assert!(ok.supported);
        assert!(ok.detail.is_none());

        let with_detail = Detection::supported().with_detail("resolves targets");
        assert_eq!(with_detail.detail.as_deref(), Some("resolves targets"));

        let no = Detection::unsupported("links unavailable");
        assert!(!no.supported);
        assert_eq!(no.detail.as_deref(), Some("links unavailable"));
    }

    #[test]
    fn detection_serializes_compactly() {
        let json = serde_json::to_value(Detection::supported()).unwrap();
        assert_eq!(json, serde_json::json!({ "supported": true }));
    }
}
