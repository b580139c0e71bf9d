//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { units } => {
                info!(units, "Starting evaluation");
            }
            ProgressEvent::UnitStarted { unit } => {
                debug!(unit = %unit, "Evaluating unit");
            }
            ProgressEvent::UnitSucceeded { unit, duration } => {
                debug!(
                    unit = %unit,
                    duration_ms = duration.as_millis(),
                    "Unit evaluation complete"
                );
            }
            ProgressEvent::UnitFailed { unit, error } => {
                warn!(unit = %unit, error = %error, "Unit evaluation failed");
            }
            ProgressEvent::UnitSkipped { unit, dependency } => {
                warn!(
                    unit = %unit,
                    dependency = %dependency,
                    "Unit skipped, dependency did not succeed"
                );
            }
            ProgressEvent::Completed {
                evaluated,
                failed,
                total_time,
            } => {
                if *failed > 0 {
                    info!(
                        evaluated,
                        failed,
                        total_time_ms = total_time.as_millis(),
                        "Evaluation complete with failures"
                    );
                } else {
                    info!(
                        evaluated,
                        total_time_ms = total_time.as_millis(),
                        "Evaluation complete"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Identifier;
    use std::time::Duration;

    #[test]
    fn logging_all_events() {
        let handler = LoggingHandler;
        let unit = Identifier::new("symlink").unwrap();
        let dependency = Identifier::new("scratch-dir").unwrap();

        let events = vec![
            ProgressEvent::Started { units: 4 },
            ProgressEvent::UnitStarted { unit: unit.clone() },
            ProgressEvent::UnitSucceeded {
                unit: unit.clone(),
                duration: Duration::from_millis(3),
            },
            ProgressEvent::UnitFailed {
                unit: unit.clone(),
                error: "scratch dir vanished".to_string(),
            },
            ProgressEvent::UnitSkipped {
                unit,
                dependency,
            },
            ProgressEvent::Completed {
                evaluated: 3,
                failed: 1,
                total_time: Duration::from_millis(20),
            },
            ProgressEvent::Completed {
                evaluated: 4,
                failed: 0,
                total_time: Duration::from_millis(20),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
