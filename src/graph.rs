//! Concept graph: the shared catalog of concepts plus typed, weighted,
//! directed relationships between them.
//!
//! The graph is read-only to the scheduling core. Edges are kept in insertion
//! order; callers must not rely on neighbor order for correctness, only the
//! planner's own sorting establishes ordering guarantees.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Concept, ConceptId, Relationship, RelationshipKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown concept: {0}")]
    UnknownConcept(ConceptId),
    #[error("self-referential relationship on concept {0}")]
    SelfLoop(ConceptId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One edge endpoint as seen from a queried concept.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub concept_id: ConceptId,
    pub strength: f64,
    pub kind: RelationshipKind,
}

#[derive(Debug, Default)]
pub struct ConceptGraph {
    concepts: HashMap<ConceptId, Concept>,
    edges: Vec<Relationship>,
    outgoing: HashMap<ConceptId, Vec<usize>>,
    incoming: HashMap<ConceptId, Vec<usize>>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a catalog entry. Idempotent by id; catalog
    /// administration is a host concern.
    pub fn insert_concept(&mut self, concept: Concept) {
        self.concepts.insert(concept.id.clone(), concept);
    }

    /// Remove a concept from the catalog. Edges referencing it are left in
    /// place and become dangling; consumers skip them (best-effort, logged).
    pub fn remove_concept(&mut self, concept_id: &str) -> Option<Concept> {
        self.concepts.remove(concept_id)
    }

    /// Add a directed edge. Rejects self-loops and unknown endpoints;
    /// strength is clamped into [0, 1]. Cycles among dependency edges are
    /// not validated here.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationshipKind,
        strength: f64,
    ) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from.to_string()));
        }
        if !self.concepts.contains_key(from) {
            return Err(GraphError::UnknownConcept(from.to_string()));
        }
        if !self.concepts.contains_key(to) {
            return Err(GraphError::UnknownConcept(to.to_string()));
        }

        let index = self.edges.len();
        self.edges.push(Relationship {
            from_concept_id: from.to_string(),
            to_concept_id: to.to_string(),
            kind,
            strength: strength.clamp(0.0, 1.0),
        });
        self.outgoing.entry(from.to_string()).or_default().push(index);
        self.incoming.entry(to.to_string()).or_default().push(index);
        Ok(())
    }

    pub fn contains(&self, concept_id: &str) -> bool {
        self.concepts.contains_key(concept_id)
    }

    pub fn concept(&self, concept_id: &str) -> Option<&Concept> {
        self.concepts.get(concept_id)
    }

    /// All catalog concepts, in no particular order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges incident to `concept_id` in the given direction, filtered to
    /// `kinds`, in edge insertion order. Fails for ids not in the catalog.
    pub fn neighbors(
        &self,
        concept_id: &str,
        direction: Direction,
        kinds: &[RelationshipKind],
    ) -> Result<Vec<Neighbor>, GraphError> {
        if !self.concepts.contains_key(concept_id) {
            return Err(GraphError::UnknownConcept(concept_id.to_string()));
        }

        let index = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };

        let mut neighbors = Vec::new();
        if let Some(edge_indexes) = index.get(concept_id) {
            for &i in edge_indexes {
                let edge = &self.edges[i];
                if !kinds.contains(&edge.kind) {
                    continue;
                }
                let other = match direction {
                    Direction::Outgoing => edge.to_concept_id.clone(),
                    Direction::Incoming => edge.from_concept_id.clone(),
                };
                neighbors.push(Neighbor {
                    concept_id: other,
                    strength: edge.strength,
                    kind: edge.kind,
                });
            }
        }
        Ok(neighbors)
    }
}
