//! Unit registry
//!
//! Owns the set of registered units for one manager. Registration order is
//! preserved (it is the tie-breaker for independent units during resolution)
//! and the resolved execution order is memoized until the unit set changes.

use super::resolver::{self, ResolveError};
use super::unit::Unit;
use crate::ident::{Identifier, IdentifierError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("duplicate identifier `{0}`")]
    DuplicateIdentifier(Identifier),

    #[error("no unit registered under `{0}`")]
    NotFound(Identifier),
}

struct Entry<U: ?Sized> {
    id: Identifier,
    deps: Vec<Identifier>,
    unit: Box<U>,
}

/// Insertion-ordered store of units, generic over the unit trait object so
/// concrete managers keep a typed `get` without re-implementing any
/// resolution logic.
pub struct Registry<U: ?Sized> {
    entries: Vec<Entry<U>>,
    index: HashMap<Identifier, usize>,
    order: Option<Vec<Identifier>>,
}

impl<U: ?Sized + Unit> Registry<U> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            order: None,
        }
    }

    /// Registers a unit under its normalized identifier.
    ///
    /// Fails if the identifier (or any declared dependency name) normalizes
    /// to an empty token, or if the identifier is already taken. Invalidates
    /// the memoized execution order.
    pub fn register(&mut self, unit: Box<U>) -> Result<Identifier, RegistryError> {
        let id = Identifier::new(unit.name())?;
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentifier(id));
        }

        let deps = unit
            .dependencies()
            .iter()
            .map(|dep| Identifier::new(dep))
            .collect::<Result<Vec<_>, _>>()?;

        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(Entry {
            id: id.clone(),
            deps,
            unit,
        });
        self.order = None;
        Ok(id)
    }

    /// Looks a unit up by any spelling of its name.
    pub fn get(&self, name: &str) -> Result<&U, RegistryError> {
        let id = Identifier::new(name)?;
        self.index
            .get(&id)
            .map(|&i| &*self.entries[i].unit)
            .ok_or(RegistryError::NotFound(id))
    }

    /// All units in registration order.
    pub fn get_all(&self) -> impl Iterator<Item = &U> {
        self.entries.iter().map(|e| &*e.unit)
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn contains(&self, name: &str) -> bool {
        Identifier::new(name)
            .map(|id| self.index.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared dependencies of a registered unit.
    pub fn dependencies_of(&self, id: &Identifier) -> Option<&[Identifier]> {
        self.index.get(id).map(|&i| self.entries[i].deps.as_slice())
    }

    pub(crate) fn unit_by_id(&self, id: &Identifier) -> Option<&U> {
        self.index.get(id).map(|&i| &*self.entries[i].unit)
    }

    /// The dependency-respecting execution order, computed on first request
    /// and memoized until the next registration.
    pub fn resolve_order(&mut self) -> Result<&[Identifier], ResolveError> {
        if self.order.is_none() {
            let nodes: Vec<(&Identifier, &[Identifier])> = self
                .entries
                .iter()
                .map(|e| (&e.id, e.deps.as_slice()))
                .collect();
            self.order = Some(resolver::resolve(&nodes)?);
        }
        Ok(self.order.as_deref().expect("resolved order computed above"))
    }
}

impl<U: ?Sized + Unit> Default for Registry<U> {
    fn default() -> Self {
        Self::new()
    }
}
