//! Typed detector registry

use crate::detectors::Detector;
use crate::engine::{Registry, RegistryError, ResolveError};
use crate::ident::Identifier;

/// Typed lookup over the generic registry mechanism; adds no resolution
/// logic of its own.
pub struct DetectorManager {
    registry: Registry<dyn Detector>,
}

impl DetectorManager {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) -> Result<Identifier, RegistryError> {
        self.registry.register(detector)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Detector, RegistryError> {
        self.registry.get(name)
    }

    pub fn get_all(&self) -> impl Iterator<Item = &dyn Detector> {
        self.registry.get_all()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Identifier> {
        self.registry.ids()
    }

    pub fn dependencies_of(&self, id: &Identifier) -> Option<&[Identifier]> {
        self.registry.dependencies_of(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn resolve_order(&mut self) -> Result<&[Identifier], ResolveError> {
        self.registry.resolve_order()
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry<dyn Detector> {
        &mut self.registry
    }
}

impl Default for DetectorManager {
    fn default() -> Self {
        Self::new()
    }
}
