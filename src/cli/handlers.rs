//! Command handlers
//!
//! Each handler returns a process exit code: 0 on success, 1 when probing or
//! output failed, 2 for configuration errors. A detector reporting an
//! unsupported capability is a finding, not a tool failure.

use super::commands::{ListArgs, ProbeArgs};
use crate::config::EnvprobeConfig;
use crate::manager::Container;
use crate::output::OutputFormatter;
use std::fs;
use tracing::{error, info};

pub fn handle_probe(args: &ProbeArgs) -> i32 {
    let mut config = match EnvprobeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            return 2;
        }
    };

    if let Some(policy) = &args.policy {
        match policy.parse() {
            Ok(policy) => config.failure_policy = policy,
            Err(err) => {
                error!(error = %err, "Invalid --policy value");
                return 2;
            }
        }
    }

    let mut container = Container::new(config);
    let report = match container.capability_manager().report() {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "Probing failed");
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let rendered = match formatter.format(&report) {
        Ok(rendered) => rendered,
        Err(err) => {
            error!(error = %err, "Formatting the report failed");
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = fs::write(path, &rendered) {
                error!(path = %path.display(), error = %err, "Writing the report failed");
                return 1;
            }
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", rendered.trim_end()),
    }

    0
}

pub fn handle_list(args: &ListArgs) -> i32 {
    let config = match EnvprobeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            return 2;
        }
    };

    let mut container = Container::new(config);
    let detectors = container.detector_manager();

    let ids = if args.registration_order {
        detectors.ids().cloned().collect::<Vec<_>>()
    } else {
        match detectors.resolve_order() {
            Ok(order) => order.to_vec(),
            Err(err) => {
                error!(error = %err, "Resolving detector order failed");
                return 1;
            }
        }
    };

    for id in ids {
        match detectors.dependencies_of(&id) {
            Some(deps) if !deps.is_empty() => {
                let joined = deps
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}  (after {})", id, joined);
            }
            _ => println!("{}", id),
        }
    }

    0
}
