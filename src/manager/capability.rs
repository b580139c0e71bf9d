//! Capability queries over the detector registry

use super::detector::DetectorManager;
use crate::detectors::{Detection, Detector};
use crate::engine::{
    EvaluationError, Evaluator, FailurePolicy, Outcome, RegistryError,
};
use crate::ident::Identifier;
use crate::output::{ProbeRecord, ProbeReport};
use crate::progress::LoggingHandler;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Owns the detector registry and its evaluation state. "Does this
/// environment support X" questions come here; detectors run lazily on the
/// first query and are never re-invoked until [`CapabilityManager::invalidate`].
pub struct CapabilityManager {
    detectors: DetectorManager,
    evaluator: Evaluator<Detection>,
}

impl CapabilityManager {
    pub fn new() -> Self {
        Self::with_policy(FailurePolicy::default())
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self {
            detectors: DetectorManager::new(),
            evaluator: Evaluator::with_policy(policy).with_progress(Box::new(LoggingHandler)),
        }
    }

    /// The underlying typed detector registry.
    pub fn detectors(&mut self) -> &mut DetectorManager {
        &mut self.detectors
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) -> Result<Identifier, RegistryError> {
        self.detectors.register(detector)
    }

    /// Runs every detector that does not yet have a memoized outcome.
    pub fn evaluate_all(&mut self) -> Result<(), EvaluationError> {
        self.evaluator.evaluate_all(self.detectors.registry_mut())
    }

    /// Whether the environment supports the named capability. Failed and
    /// dependency-skipped detectors count as unsupported; querying an
    /// unregistered name is an error.
    pub fn supports(&mut self, name: &str) -> Result<bool, CapabilityError> {
        Ok(self
            .outcome(name)?
            .value()
            .map(|detection| detection.supported)
            .unwrap_or(false))
    }

    /// The explicit outcome for the named detector, evaluating lazily.
    pub fn outcome(&mut self, name: &str) -> Result<&Outcome<Detection>, CapabilityError> {
        // Surface NotFound before evaluating the whole set.
        self.detectors.get(name)?;
        self.evaluate_all()?;
        let id = Identifier::new(name).map_err(RegistryError::from)?;
        self.evaluator
            .outcome_by_id(&id)
            .ok_or(CapabilityError::Registry(RegistryError::NotFound(id)))
    }

    /// Evaluates everything and assembles a report in resolved order.
    pub fn report(&mut self) -> Result<ProbeReport, CapabilityError> {
        self.evaluate_all()?;
        let order: Vec<Identifier> = self
            .detectors
            .resolve_order()
            .map_err(EvaluationError::from)?
            .to_vec();

        let results = order
            .iter()
            .filter_map(|id| {
                self.evaluator.outcome_by_id(id).map(|outcome| ProbeRecord {
                    id: id.clone(),
                    outcome: outcome.clone(),
                })
            })
            .collect();
        Ok(ProbeReport::new(results))
    }

    /// Explicit invalidation: the next query re-runs every detector.
    pub fn invalidate(&mut self) {
        self.evaluator.reset();
    }
}

impl Default for CapabilityManager {
    fn default() -> Self {
        Self::new()
    }
}
