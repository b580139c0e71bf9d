//! Locale and unicode path detectors

use super::Detection;
use crate::engine::{Evaluate, Unit};
use crate::fs::FileSystem;
use crate::platform::Platform;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const UNICODE_LOCALE: &str = "unicode-locale";
pub const UNICODE_PATH: &str = "unicode-path";

/// Locale variables in POSIX precedence order.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];

fn is_utf8_locale(value: &str) -> bool {
    let folded = value.to_lowercase();
    folded.contains("utf-8") || folded.contains("utf8")
}

/// Probes whether the active locale advertises a UTF-8 charset.
pub struct UnicodeLocaleDetector {
    platform: Arc<dyn Platform>,
}

impl UnicodeLocaleDetector {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

impl Unit for UnicodeLocaleDetector {
    fn name(&self) -> &str {
        UNICODE_LOCALE
    }
}

impl Evaluate for UnicodeLocaleDetector {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        for var in LOCALE_VARS {
            match self.platform.env_var(var) {
                Some(value) if !value.is_empty() => {
                    return Ok(if is_utf8_locale(&value) {
                        Detection::supported().with_detail(format!("{}={}", var, value))
                    } else {
                        Detection::unsupported(format!(
                            "{}={} does not advertise a UTF-8 charset",
                            var, value
                        ))
                    });
                }
                _ => continue,
            }
        }
        Ok(Detection::unsupported("no locale variables are set"))
    }
}

/// Probes whether non-ASCII file names round-trip through the filesystem.
/// Requires a unicode-capable locale.
pub struct UnicodePathDetector {
    fs: Arc<dyn FileSystem>,
    scratch_dir: PathBuf,
}

impl UnicodePathDetector {
    pub fn new(fs: Arc<dyn FileSystem>, scratch_dir: &Path) -> Self {
        Self {
            fs,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }
}

impl Unit for UnicodePathDetector {
    fn name(&self) -> &str {
        UNICODE_PATH
    }

    fn dependencies(&self) -> Vec<String> {
        vec![UNICODE_LOCALE.to_string()]
    }
}

impl Evaluate for UnicodePathDetector {
    type Output = Detection;

    fn evaluate(&self, deps: &[&Detection]) -> Result<Detection> {
        let locale = deps.first().context("missing locale detection result")?;
        if !locale.supported {
            return Ok(Detection::unsupported("locale is not unicode-capable"));
        }

        let dir = self.scratch_dir.join("unicode-probe");
        self.fs
            .create_dir_all(&dir)
            .context("creating unicode scratch dir")?;

        let path = dir.join("pröbe-ünïcode.tmp");
        let result = match self.fs.write(&path, "unicode") {
            Err(err) => Ok(Detection::unsupported(format!(
                "writing a non-ascii file name failed: {:#}",
                err
            ))),
            Ok(()) => match self.fs.read_to_string(&path) {
                Ok(content) if content == "unicode" => Ok(Detection::supported()
                    .with_detail("non-ascii file names round-trip")),
                _ => Ok(Detection::unsupported(
                    "non-ascii file name did not round-trip",
                )),
            },
        };
        self.fs.remove_dir_all(&dir).ok();
        result
    }
}
