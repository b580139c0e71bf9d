//! Dependency graph resolution
//!
//! Depth-first topological sort over registered units. Units are visited in
//! registration order, which keeps the output deterministic: independent
//! units surface in the order they were registered, dependents always after
//! all of their dependencies.

use crate::ident::Identifier;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("unit `{unit}` depends on unknown unit `{dependency}`")]
    UnknownDependency {
        unit: Identifier,
        dependency: Identifier,
    },

    #[error("circular dependency detected: {}", join_path(.path))]
    CircularDependency { path: Vec<Identifier> },
}

fn join_path(path: &[Identifier]) -> String {
    path.iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Computes an execution order in which every unit appears after all of its
/// dependencies. `nodes` pairs each identifier with its declared dependency
/// identifiers, in registration order.
pub fn resolve<'a>(
    nodes: &'a [(&'a Identifier, &'a [Identifier])],
) -> Result<Vec<Identifier>, ResolveError> {
    let mut walk = Walk {
        nodes,
        index: nodes
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.as_str(), i))
            .collect(),
        marks: vec![Mark::Unvisited; nodes.len()],
        stack: Vec::new(),
        order: Vec::with_capacity(nodes.len()),
    };

    for i in 0..nodes.len() {
        if walk.marks[i] == Mark::Unvisited {
            walk.visit(i)?;
        }
    }

    Ok(walk.order)
}

struct Walk<'a> {
    nodes: &'a [(&'a Identifier, &'a [Identifier])],
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    stack: Vec<usize>,
    order: Vec<Identifier>,
}

impl Walk<'_> {
    fn visit(&mut self, i: usize) -> Result<(), ResolveError> {
        self.marks[i] = Mark::InProgress;
        self.stack.push(i);

        for dep in self.nodes[i].1 {
            let j = self.index.get(dep.as_str()).copied().ok_or_else(|| {
                ResolveError::UnknownDependency {
                    unit: self.nodes[i].0.clone(),
                    dependency: dep.clone(),
                }
            })?;

            match self.marks[j] {
                Mark::Done => {}
                Mark::Unvisited => self.visit(j)?,
                Mark::InProgress => {
                    // Re-entered a node on the active path: close the cycle
                    // from its first occurrence back to itself.
                    let start = self.stack.iter().position(|&k| k == j).unwrap_or(0);
                    let mut path: Vec<Identifier> = self.stack[start..]
                        .iter()
                        .map(|&k| self.nodes[k].0.clone())
                        .collect();
                    path.push(self.nodes[j].0.clone());
                    return Err(ResolveError::CircularDependency { path });
                }
            }
        }

        self.stack.pop();
        self.marks[i] = Mark::Done;
        self.order.push(self.nodes[i].0.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn resolve_decls(decls: &[(&str, &[&str])]) -> Result<Vec<Identifier>, ResolveError> {
        let ids: Vec<(Identifier, Vec<Identifier>)> = decls
            .iter()
            .map(|(name, deps)| (id(name), deps.iter().map(|d| id(d)).collect()))
            .collect();
        let nodes: Vec<(&Identifier, &[Identifier])> =
            ids.iter().map(|(i, d)| (i, d.as_slice())).collect();
        resolve(&nodes)
    }

    #[test]
    fn empty_set_resolves_to_empty_order() {
        assert_eq!(resolve_decls(&[]).unwrap(), Vec::<Identifier>::new());
    }

    #[test]
    fn dependency_precedes_dependent() {
        let order = resolve_decls(&[
            ("depending-fixture1", &["dependable-fixture"]),
            ("dependable-fixture", &[]),
        ])
        .unwrap();
        assert_eq!(order, vec![id("dependable-fixture"), id("depending-fixture1")]);
    }

    #[test]
    fn independent_units_keep_registration_order() {
        let order = resolve_decls(&[("c", &[]), ("a", &[]), ("b", &[])]).unwrap();
        assert_eq!(order, vec![id("c"), id("a"), id("b")]);
    }

    #[test]
    fn diamond_orders_shared_base_first() {
        let order = resolve_decls(&[
            ("app", &["lib1", "lib2"]),
            ("lib1", &["base"]),
            ("lib2", &["base"]),
            ("base", &[]),
        ])
        .unwrap();

        let pos = |name: &str| order.iter().position(|i| i.as_str() == name).unwrap();
        assert!(pos("base") < pos("lib1"));
        assert!(pos("base") < pos("lib2"));
        assert!(pos("lib1") < pos("app"));
        assert!(pos("lib2") < pos("app"));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn self_dependency_is_a_cycle_of_length_one() {
        let err = resolve_decls(&[("loner", &["loner"])]).unwrap_err();
        match err {
            ResolveError::CircularDependency { path } => {
                assert_eq!(path, vec![id("loner"), id("loner")]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn three_node_cycle_reports_full_path() {
        let err = resolve_decls(&[
            ("circular-fixture1", &["circular-fixture2"]),
            ("circular-fixture2", &["circular-fixture3"]),
            ("circular-fixture3", &["circular-fixture1"]),
        ])
        .unwrap_err();

        match &err {
            ResolveError::CircularDependency { path } => {
                assert_eq!(path.len(), 4);
                assert_eq!(path.first(), path.last());
                // Edge direction is preserved through the chain.
                assert_eq!(
                    err.to_string(),
                    "circular dependency detected: circular-fixture1 -> circular-fixture2 \
                     -> circular-fixture3 -> circular-fixture1"
                );
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn cycle_reached_from_outside_starts_at_the_cycle() {
        // entry -> a -> b -> a: the reported path must close on `a`, not `entry`.
        let err = resolve_decls(&[("entry", &["a"]), ("a", &["b"]), ("b", &["a"])]).unwrap_err();
        match err {
            ResolveError::CircularDependency { path } => {
                assert_eq!(path, vec![id("a"), id("b"), id("a")]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = resolve_decls(&[("needy", &["missing"])]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownDependency {
                unit: id("needy"),
                dependency: id("missing"),
            }
        );
    }
}
