//! # mastery-core
//!
//! Concept mastery tracking and spaced-repetition scheduling over a
//! knowledge graph. The crate is a pure, synchronous computation core: the
//! host persists entities and calls in with session outcomes, receiving back
//! updated mastery state and a prioritized study plan.
//!
//! - [`graph`] - concept catalog and typed, weighted relationships
//! - [`store`] - per-user, per-concept mastery records
//! - [`scheduler`] - SM-2 style review scheduling from session outcomes
//! - [`propagation`] - single-hop spread of mastery deltas across edges
//! - [`planner`] - daily study plan builder
//! - [`analytics`] - mastery-derived learner summaries
//! - [`engine`] - the facade tying the pieces together

pub mod analytics;
pub mod config;
pub mod engine;
pub mod graph;
pub mod planner;
pub mod propagation;
pub mod scheduler;
pub mod store;
pub mod types;

pub use analytics::MasteryAnalytics;
pub use config::{EngineConfig, PlannerParams, PropagationParams, SchedulerParams};
pub use engine::{EngineError, MasteryEngine};
pub use graph::{ConceptGraph, Direction, GraphError, Neighbor};
pub use store::{InMemoryMasteryStore, MasteryStore, UpdateConflict};
pub use types::{
    Concept, ConceptId, Difficulty, MasteryRecord, MasteryStatus, PlanItem, PlanItemKind,
    Priority, Relationship, RelationshipKind, SessionOutcome, StudyPlan,
};
