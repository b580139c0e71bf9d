//! Progress handler trait and events

use crate::ident::Identifier;
use std::time::Duration;

/// Events emitted while a registry's units are evaluated
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Evaluation of a resolved order started
    Started { units: usize },

    /// A unit's evaluation began
    UnitStarted { unit: Identifier },

    /// A unit's evaluation produced a value
    UnitSucceeded { unit: Identifier, duration: Duration },

    /// A unit's evaluation failed
    UnitFailed { unit: Identifier, error: String },

    /// A unit was skipped because a dependency did not succeed
    UnitSkipped {
        unit: Identifier,
        dependency: Identifier,
    },

    /// The batch finished
    Completed {
        evaluated: usize,
        failed: usize,
        total_time: Duration,
    },
}

/// Trait for observing evaluation progress
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {
        // Intentionally empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn noop_handler_ignores_events() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::Started { units: 3 });
    }

    #[test]
    fn handler_receives_each_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started { units: 2 });
        handler.on_progress(&ProgressEvent::UnitStarted { unit: id("symlink") });
        handler.on_progress(&ProgressEvent::UnitSucceeded {
            unit: id("symlink"),
            duration: Duration::from_millis(4),
        });
        handler.on_progress(&ProgressEvent::Completed {
            evaluated: 1,
            failed: 0,
            total_time: Duration::from_millis(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn event_debug_output() {
        let event = ProgressEvent::UnitSkipped {
            unit: id("needy"),
            dependency: id("broken"),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("UnitSkipped"));
        assert!(debug_str.contains("needy"));
    }
}
