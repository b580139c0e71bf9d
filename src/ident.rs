//! Stable unit identifiers
//!
//! Every registered unit is addressed by an [`Identifier`]: a normalized,
//! case-insensitive token. Normalization folds the spellings `MyDetector`,
//! `my_detector` and `my-detector` onto the same token so lookups never
//! depend on how a unit author happened to write the name.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Suffixes stripped when deriving a name from a Rust type name.
pub const STRIPPED_SUFFIXES: &[&str] = &["Detector", "Driver", "Probe", "Manager"];

/// Prefixes stripped when deriving a name from a Rust type name.
pub const STRIPPED_PREFIXES: &[&str] = &["Abstract"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid identifier: {raw:?} normalizes to an empty token")]
    InvalidIdentifier { raw: String },
}

/// A normalized, non-empty unit identifier.
///
/// Construction goes through [`Identifier::new`], so a value of this type is
/// always already normalized: lowercase, dash-delimited, with `/` retained as
/// a namespace separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Normalizes `raw` and wraps it, rejecting tokens that collapse to nothing.
    pub fn new(raw: &str) -> Result<Self, IdentifierError> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(IdentifierError::InvalidIdentifier {
                raw: raw.to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Folds `raw` into identifier form.
///
/// Rules: trim, lowercase, camel-case boundaries become `-`, runs of
/// whitespace, underscores and other punctuation collapse to a single `-`,
/// `/` is kept as a namespace separator. Idempotent: normalizing an already
/// normalized token is a no-op.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    let mut prev_lower = false;

    for ch in raw.trim().chars() {
        if ch == '/' {
            while out.ends_with('-') {
                out.pop();
            }
            if !out.is_empty() && !out.ends_with('/') {
                out.push('/');
            }
            pending_sep = false;
            prev_lower = false;
        } else if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                pending_sep = true;
            }
            if pending_sep && !out.is_empty() && !out.ends_with('/') {
                out.push('-');
            }
            pending_sep = false;
            for low in ch.to_lowercase() {
                out.push(low);
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        } else {
            pending_sep = true;
            prev_lower = false;
        }
    }

    while out.ends_with('-') || out.ends_with('/') {
        out.pop();
    }
    out
}

/// Derives a unit name from a Rust type name.
///
/// `envprobe::detectors::symlink::SymlinkDetector` becomes `symlink`: the
/// module path and any generic arguments are dropped, then the common
/// [`STRIPPED_PREFIXES`] / [`STRIPPED_SUFFIXES`] are removed before
/// normalization.
pub fn derived_name<T: ?Sized>() -> String {
    derived_name_from(
        std::any::type_name::<T>(),
        STRIPPED_PREFIXES,
        STRIPPED_SUFFIXES,
    )
}

/// Same as [`derived_name`], with caller-supplied prefix/suffix lists.
pub fn derived_name_from(type_name: &str, prefixes: &[&str], suffixes: &[&str]) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let mut base = base.rsplit("::").next().unwrap_or(base);

    for prefix in prefixes {
        if let Some(rest) = base.strip_prefix(prefix) {
            if !rest.is_empty() {
                base = rest;
                break;
            }
        }
    }
    for suffix in suffixes {
        if let Some(rest) = base.strip_suffix(suffix) {
            if !rest.is_empty() {
                base = rest;
                break;
            }
        }
    }

    normalize(base)
}
