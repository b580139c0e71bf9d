//! Dependency-resolving unit execution engine
//!
//! The engine is domain-agnostic: it knows about identifiable units and their
//! declared dependencies, nothing about filesystems or locales. Concrete
//! detectors and drivers plug in through the [`Unit`] / [`Evaluate`] traits.

mod evaluator;
mod registry;
mod resolver;
mod unit;

pub use evaluator::{EvaluationError, Evaluator};
pub use registry::{Registry, RegistryError};
pub use resolver::{resolve, ResolveError};
pub use unit::{Evaluate, FailurePolicy, Outcome, Unit};
