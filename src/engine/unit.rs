//! Unit contracts and evaluation outcomes

use crate::ident::Identifier;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registrable, identifiable piece of work with declared dependencies.
///
/// The declared name and every dependency reference are normalized into an
/// [`Identifier`] at registration, so `name()` may use any spelling the
/// normalizer folds (`CamelCase`, `snake_case`, `kebab-case`).
pub trait Unit: Send + Sync {
    /// Stable name of this unit.
    fn name(&self) -> &str;

    /// Names of units that must evaluate before this one, in the order their
    /// results are passed to [`Evaluate::evaluate`].
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }
}

impl fmt::Debug for dyn Unit + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name())
            .field("dependencies", &self.dependencies())
            .finish()
    }
}

/// A unit the engine can execute.
///
/// `deps` carries one value per declared dependency, positionally, in
/// declaration order. An `Err` is recorded as this unit's failure outcome and
/// never invoked twice.
pub trait Evaluate: Unit {
    type Output: Clone;

    fn evaluate(&self, deps: &[&Self::Output]) -> Result<Self::Output>;
}

/// The memoized result of evaluating one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome<T> {
    /// The unit ran and produced a value.
    Succeeded { value: T },
    /// The unit ran and its evaluation failed.
    Failed { error: String },
    /// A transitive dependency failed; the unit was never invoked.
    FailedByDependency { dependency: Identifier },
}

impl<T> Outcome<T> {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    /// The produced value, if the unit succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    /// Short status token used in reports and logs.
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Succeeded { .. } => "succeeded",
            Outcome::Failed { .. } => "failed",
            Outcome::FailedByDependency { .. } => "failed-by-dependency",
        }
    }
}

/// How the engine reacts when a unit's evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure, skip dependents, keep evaluating independent units.
    #[default]
    Isolate,
    /// Stop the batch at the first failing unit.
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Isolate => f.write_str("isolate"),
            FailurePolicy::Abort => f.write_str("abort"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!(
                "invalid failure policy '{}', expected 'isolate' or 'abort'",
                other
            )),
        }
    }
}
