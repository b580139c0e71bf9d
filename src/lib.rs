//! envprobe - runtime-environment capability probing
//!
//! This library registers small "detector" units that each test one
//! environment behavior (filesystem symlink semantics, locale handling,
//! shell-argument quoting), resolves their interdependencies, executes them
//! in dependency order and caches the results behind stable identifiers.
//!
//! # Core Concepts
//!
//! - **Units**: identifiable pieces of work with declared dependencies; the
//!   engine computes a valid execution order and injects each unit's
//!   dependency results when it runs
//! - **Detectors**: units whose evaluation determines whether the runtime
//!   environment supports some behavior
//! - **Capability queries**: "does this environment support X" lookups that
//!   never re-probe; every detector runs at most once per manager
//!
//! # Example Usage
//!
//! ```no_run
//! use envprobe::config::EnvprobeConfig;
//! use envprobe::manager::Container;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EnvprobeConfig::from_env()?;
//!     let mut container = Container::new(config);
//!
//!     let capabilities = container.capability_manager();
//!     if capabilities.supports("symlink")? {
//!         println!("symlinks are usable here");
//!     }
//!
//!     // The full report, in dependency order
//!     let report = capabilities.report()?;
//!     println!("{} detectors failed", report.failed_count());
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`engine`]: dependency resolution and unit execution, domain-agnostic
//! - [`detectors`]: the builtin environment detectors
//! - [`manager`]: composition root and the capability/detector/driver managers
//!
//! Detector bodies perform their I/O through the [`fs`] and [`platform`]
//! abstractions, so tests can simulate caseless or symlink-free
//! environments without touching the real filesystem.

// Public modules
pub mod cli;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod fs;
pub mod ident;
pub mod manager;
pub mod output;
pub mod platform;
pub mod progress;

// Re-export key types for convenient access
pub use config::{ConfigError, EnvprobeConfig};
pub use detectors::{builtin_detectors, Detection, Detector};
pub use engine::{
    Evaluate, EvaluationError, Evaluator, FailurePolicy, Outcome, Registry, RegistryError,
    ResolveError, Unit,
};
pub use ident::{Identifier, IdentifierError};
pub use manager::{
    CapabilityError, CapabilityManager, Container, DetectorManager, FilesystemDriver,
    FilesystemDriverManager,
};
pub use output::{OutputFormat, OutputFormatter, ProbeReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
