//! Detector execution engine
//!
//! Walks a registry's resolved order, executing each unit exactly once with
//! the already-computed results of its dependencies injected positionally.
//! Outcomes are memoized: re-running `evaluate_all` on an unchanged registry
//! invokes nothing. A unit failure is contained to its own subgraph under the
//! default [`FailurePolicy::Isolate`]; dependents of a failed unit are
//! recorded as failed-by-dependency without ever being invoked.

use super::registry::Registry;
use super::resolver::ResolveError;
use super::unit::{Evaluate, FailurePolicy, Outcome};
use crate::ident::Identifier;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Only raised under [`FailurePolicy::Abort`].
    #[error("unit `{unit}` failed: {error}")]
    Aborted { unit: Identifier, error: String },
}

pub struct Evaluator<T> {
    policy: FailurePolicy,
    progress: Box<dyn ProgressHandler>,
    outcomes: HashMap<Identifier, Outcome<T>>,
}

impl<T: Clone> Evaluator<T> {
    pub fn new() -> Self {
        Self::with_policy(FailurePolicy::default())
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self {
            policy,
            progress: Box::new(NoOpHandler),
            outcomes: HashMap::new(),
        }
    }

    pub fn with_progress(mut self, handler: Box<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Evaluates every unit that does not yet have a memoized outcome, in
    /// dependency order.
    pub fn evaluate_all<U>(&mut self, registry: &mut Registry<U>) -> Result<(), EvaluationError>
    where
        U: ?Sized + Evaluate<Output = T>,
    {
        let start = Instant::now();
        let order: Vec<Identifier> = registry.resolve_order()?.to_vec();
        self.progress.on_progress(&ProgressEvent::Started {
            units: order.len(),
        });

        let mut evaluated = 0usize;
        let mut failed = 0usize;

        for id in order {
            if self.outcomes.contains_key(&id) {
                debug!(unit = %id, "outcome already memoized, skipping");
                continue;
            }

            let deps: Vec<Identifier> = registry
                .dependencies_of(&id)
                .map(|d| d.to_vec())
                .unwrap_or_default();

            let mut dep_values: Vec<T> = Vec::with_capacity(deps.len());
            let mut blocked: Option<Identifier> = None;
            for dep in &deps {
                match self.outcomes.get(dep) {
                    Some(Outcome::Succeeded { value }) => dep_values.push(value.clone()),
                    _ => {
                        blocked = Some(dep.clone());
                        break;
                    }
                }
            }

            if let Some(dependency) = blocked {
                self.progress.on_progress(&ProgressEvent::UnitSkipped {
                    unit: id.clone(),
                    dependency: dependency.clone(),
                });
                self.outcomes
                    .insert(id, Outcome::FailedByDependency { dependency });
                failed += 1;
                continue;
            }

            self.progress
                .on_progress(&ProgressEvent::UnitStarted { unit: id.clone() });
            let unit_start = Instant::now();
            let result = {
                let unit = registry
                    .unit_by_id(&id)
                    .expect("identifier from resolved order is registered");
                let refs: Vec<&T> = dep_values.iter().collect();
                unit.evaluate(&refs)
            };
            evaluated += 1;

            match result {
                Ok(value) => {
                    self.progress.on_progress(&ProgressEvent::UnitSucceeded {
                        unit: id.clone(),
                        duration: unit_start.elapsed(),
                    });
                    self.outcomes.insert(id, Outcome::Succeeded { value });
                }
                Err(err) => {
                    let error = format!("{:#}", err);
                    self.progress.on_progress(&ProgressEvent::UnitFailed {
                        unit: id.clone(),
                        error: error.clone(),
                    });
                    self.outcomes
                        .insert(id.clone(), Outcome::Failed { error: error.clone() });
                    failed += 1;

                    if self.policy == FailurePolicy::Abort {
                        return Err(EvaluationError::Aborted { unit: id, error });
                    }
                }
            }
        }

        self.progress.on_progress(&ProgressEvent::Completed {
            evaluated,
            failed,
            total_time: start.elapsed(),
        });
        Ok(())
    }

    /// Memoized outcome for any spelling of a unit name.
    pub fn outcome(&self, name: &str) -> Option<&Outcome<T>> {
        Identifier::new(name)
            .ok()
            .and_then(|id| self.outcomes.get(&id))
    }

    pub fn outcome_by_id(&self, id: &Identifier) -> Option<&Outcome<T>> {
        self.outcomes.get(id)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&Identifier, &Outcome<T>)> {
        self.outcomes.iter()
    }

    /// Explicit invalidation: clears every memoized outcome so the next
    /// `evaluate_all` re-runs the full set.
    pub fn reset(&mut self) {
        self.outcomes.clear();
    }
}

impl<T: Clone> Default for Evaluator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::unit::Unit;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubUnit {
        name: &'static str,
        deps: &'static [&'static str],
        value: Result<u32, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl StubUnit {
        fn ok(name: &'static str, deps: &'static [&'static str], value: u32) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    deps,
                    value: Ok(value),
                    calls: calls.clone(),
                }),
                calls,
            )
        }

        fn failing(name: &'static str, error: &'static str) -> Box<Self> {
            Box::new(Self {
                name,
                deps: &[],
                value: Err(error),
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    impl Unit for StubUnit {
        fn name(&self) -> &str {
            self.name
        }

        fn dependencies(&self) -> Vec<String> {
            self.deps.iter().map(|d| d.to_string()).collect()
        }
    }

    impl Evaluate for StubUnit {
        type Output = u32;

        fn evaluate(&self, deps: &[&u32]) -> anyhow::Result<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.value {
                Ok(v) => Ok(v + deps.iter().copied().sum::<u32>()),
                Err(e) => Err(anyhow!(e)),
            }
        }
    }

    #[test]
    fn dependency_values_are_injected_in_order() {
        let mut registry: Registry<StubUnit> = Registry::new();
        registry.register(StubUnit::ok("sum", &["one", "two"], 0).0).unwrap();
        registry.register(StubUnit::ok("one", &[], 1).0).unwrap();
        registry.register(StubUnit::ok("two", &[], 2).0).unwrap();

        let mut evaluator = Evaluator::new();
        evaluator.evaluate_all(&mut registry).unwrap();

        assert_eq!(evaluator.outcome("sum").unwrap().value(), Some(&3));
    }

    #[test]
    fn second_run_reuses_memoized_outcomes() {
        let mut registry: Registry<StubUnit> = Registry::new();
        let (unit, calls) = StubUnit::ok("counted", &[], 5);
        registry.register(unit).unwrap();

        let mut evaluator = Evaluator::new();
        evaluator.evaluate_all(&mut registry).unwrap();
        evaluator.evaluate_all(&mut registry).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(evaluator.outcome("counted").unwrap().value(), Some(&5));
    }

    #[test]
    fn reset_forces_reevaluation() {
        let mut registry: Registry<StubUnit> = Registry::new();
        let (unit, calls) = StubUnit::ok("counted", &[], 5);
        registry.register(unit).unwrap();

        let mut evaluator = Evaluator::new();
        evaluator.evaluate_all(&mut registry).unwrap();
        evaluator.reset();
        evaluator.evaluate_all(&mut registry).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dependent_of_failed_unit_is_never_invoked() {
        let mut registry: Registry<StubUnit> = Registry::new();
        registry.register(StubUnit::failing("broken", "boom")).unwrap();
        let (dependent, dependent_calls) = StubUnit::ok("needy", &["broken"], 1);
        registry.register(dependent).unwrap();
        let (sibling, sibling_calls) = StubUnit::ok("independent", &[], 9);
        registry.register(sibling).unwrap();

        let mut evaluator = Evaluator::new();
        evaluator.evaluate_all(&mut registry).unwrap();

        assert_eq!(dependent_calls.load(Ordering::SeqCst), 0);
        match evaluator.outcome("needy").unwrap() {
            Outcome::FailedByDependency { dependency } => {
                assert_eq!(dependency.as_str(), "broken");
            }
            other => panic!("expected failed-by-dependency, got {:?}", other),
        }

        // Independent branches still evaluate.
        assert_eq!(sibling_calls.load(Ordering::SeqCst), 1);
        assert_eq!(evaluator.outcome("independent").unwrap().value(), Some(&9));
    }

    #[test]
    fn transitive_dependents_are_skipped_too() {
        let mut registry: Registry<StubUnit> = Registry::new();
        registry.register(StubUnit::failing("root", "boom")).unwrap();
        registry.register(StubUnit::ok("mid", &["root"], 1).0).unwrap();
        registry.register(StubUnit::ok("leaf", &["mid"], 1).0).unwrap();

        let mut evaluator = Evaluator::new();
        evaluator.evaluate_all(&mut registry).unwrap();

        match evaluator.outcome("leaf").unwrap() {
            Outcome::FailedByDependency { dependency } => {
                assert_eq!(dependency.as_str(), "mid");
            }
            other => panic!("expected failed-by-dependency, got {:?}", other),
        }
    }

    #[test]
    fn abort_policy_stops_the_batch() {
        let mut registry: Registry<StubUnit> = Registry::new();
        registry.register(StubUnit::failing("broken", "boom")).unwrap();
        let (later, later_calls) = StubUnit::ok("later", &[], 1);
        registry.register(later).unwrap();

        let mut evaluator = Evaluator::with_policy(FailurePolicy::Abort);
        let err = evaluator.evaluate_all(&mut registry).unwrap_err();

        match err {
            EvaluationError::Aborted { unit, error } => {
                assert_eq!(unit.as_str(), "broken");
                assert!(error.contains("boom"));
            }
            other => panic!("expected abort, got {:?}", other),
        }
        // The failure outcome is still recorded; the rest never ran.
        assert!(evaluator.outcome("broken").is_some());
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
        assert!(evaluator.outcome("later").is_none());
    }

    #[test]
    fn resolution_errors_surface_before_any_evaluation() {
        let mut registry: Registry<StubUnit> = Registry::new();
        let (unit, calls) = StubUnit::ok("needy", &["missing"], 1);
        registry.register(unit).unwrap();

        let mut evaluator = Evaluator::new();
        let err = evaluator.evaluate_all(&mut registry).unwrap_err();
        assert!(matches!(err, EvaluationError::Resolve(ResolveError::UnknownDependency { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
