//! Shell argument quoting detector and escaping helpers

use super::Detection;
use crate::engine::{Evaluate, Unit};
use crate::platform::{OsFamily, Platform};
use anyhow::Result;
use std::sync::Arc;

pub const SHELL_QUOTING: &str = "shell-quoting";

/// Arguments that must survive quoting for the style to count as usable.
const QUOTING_SAMPLES: &[&str] = &[
    "plain",
    "with space",
    "single'quote",
    "dollar$var",
    "semi;colon",
    "star*glob",
];

/// Wraps an argument in POSIX single quotes, breaking out embedded quotes
/// as `'\''`.
pub fn quote_posix(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('\'');
    for ch in arg.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Wraps an argument in double quotes for cmd.exe, doubling embedded quotes.
pub fn quote_windows(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for ch in arg.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}

fn quoting_covers_samples(quote: fn(&str) -> String, inner_quote: char) -> bool {
    QUOTING_SAMPLES.iter().all(|arg| {
        let quoted = quote(arg);
        quoted.len() >= arg.len() + 2
            && quoted.starts_with(inner_quote)
            && quoted.ends_with(inner_quote)
    })
}

/// Classifies the applicable argument quoting style for the host shell.
pub struct ShellQuotingDetector {
    platform: Arc<dyn Platform>,
}

impl ShellQuotingDetector {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

impl Unit for ShellQuotingDetector {
    fn name(&self) -> &str {
        SHELL_QUOTING
    }
}

impl Evaluate for ShellQuotingDetector {
    type Output = Detection;

    fn evaluate(&self, _deps: &[&Detection]) -> Result<Detection> {
        match self.platform.os_family() {
            OsFamily::Unix => {
                if !quoting_covers_samples(quote_posix, '\'') {
                    return Ok(Detection::unsupported(
                        "single-quote escaping does not cover metacharacters",
                    ));
                }
                let shell = self
                    .platform
                    .env_var("SHELL")
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "/bin/sh".to_string());
                Ok(Detection::supported()
                    .with_detail(format!("posix single-quote escaping via {}", shell)))
            }
            OsFamily::Windows => {
                if !quoting_covers_samples(quote_windows, '"') {
                    return Ok(Detection::unsupported(
                        "double-quote escaping does not cover metacharacters",
                    ));
                }
                Ok(Detection::supported().with_detail("cmd double-quote escaping"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockPlatform;

    #[test]
    fn posix_quoting_wraps_and_escapes() {
        assert_eq!(quote_posix("plain"), "'plain'");
        assert_eq!(quote_posix("with space"), "'with space'");
        assert_eq!(quote_posix("it's"), "'it'\\''s'");
        assert_eq!(quote_posix("$HOME"), "'$HOME'");
    }

    #[test]
    fn windows_quoting_doubles_embedded_quotes() {
        assert_eq!(quote_windows("plain"), "\"plain\"");
        assert_eq!(quote_windows("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn unix_platform_reports_posix_style() {
        let platform: Arc<dyn Platform> =
            Arc::new(MockPlatform::new().with_env("SHELL", "/bin/zsh"));
        let detector = ShellQuotingDetector::new(platform);

        let detection = detector.evaluate(&[]).unwrap();
        assert!(detection.supported);
        assert_eq!(
            detection.detail.as_deref(),
            Some("posix single-quote escaping via /bin/zsh")
        );
    }

    #[test]
    fn unix_platform_defaults_to_sh() {
        let platform: Arc<dyn Platform> = Arc::new(MockPlatform::new());
        let detector = ShellQuotingDetector::new(platform);

        let detection = detector.evaluate(&[]).unwrap();
        assert_eq!(
            detection.detail.as_deref(),
            Some("posix single-quote escaping via /bin/sh")
        );
    }

    #[test]
    fn windows_platform_reports_cmd_style() {
        let platform: Arc<dyn Platform> = Arc::new(MockPlatform::new().windows());
        let detector = ShellQuotingDetector::new(platform);

        let detection = detector.evaluate(&[]).unwrap();
        assert!(detection.supported);
        assert_eq!(detection.detail.as_deref(), Some("cmd double-quote escaping"));
    }
}
