//! Engine facade: session intake, mastery queries, plan generation.
//!
//! One update cycle: validate the outcome, apply the scheduler to the direct
//! concept, persist via the store, then propagate the delta one hop —
//! synchronously, before returning. The clock is always injected; the engine
//! never reads wall time itself.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::analytics::{self, MasteryAnalytics};
use crate::config::EngineConfig;
use crate::graph::{ConceptGraph, GraphError};
use crate::planner;
use crate::propagation;
use crate::scheduler;
use crate::store::{InMemoryMasteryStore, MasteryStore, UpdateConflict};
use crate::types::{MasteryRecord, SessionOutcome, StudyPlan};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid comprehension rating {0}, expected 1-5")]
    InvalidRating(u8),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Conflict(#[from] UpdateConflict),
}

pub struct MasteryEngine<S: MasteryStore = InMemoryMasteryStore> {
    graph: ConceptGraph,
    store: S,
    config: EngineConfig,
}

impl MasteryEngine<InMemoryMasteryStore> {
    /// Engine over the in-memory store with default parameters.
    pub fn new(graph: ConceptGraph) -> Self {
        Self::with_store(graph, InMemoryMasteryStore::new(), EngineConfig::default())
    }
}

impl<S: MasteryStore> MasteryEngine<S> {
    pub fn with_store(graph: ConceptGraph, store: S, config: EngineConfig) -> Self {
        Self {
            graph,
            store,
            config,
        }
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one completed study session for a user. Fails before any state
    /// mutation on an out-of-range rating or an unknown concept; on a store
    /// conflict the whole call is safe to retry.
    pub fn apply_session_outcome(
        &self,
        user_id: &str,
        outcome: &SessionOutcome,
        now: DateTime<Utc>,
    ) -> Result<MasteryRecord, EngineError> {
        let rating = outcome.comprehension_rating;
        if !(1..=5).contains(&rating) {
            return Err(EngineError::InvalidRating(rating));
        }
        if !self.graph.contains(&outcome.concept_id) {
            return Err(GraphError::UnknownConcept(outcome.concept_id.clone()).into());
        }

        let current = self.store.get(user_id, &outcome.concept_id);
        let update = scheduler::apply_review(&current, outcome, now, &self.config.scheduler);
        self.store
            .upsert(user_id, &outcome.concept_id, update.record.clone())?;
        debug!(
            user_id,
            concept_id = %outcome.concept_id,
            delta = update.delta,
            score = update.record.mastery_score,
            status = update.record.status.as_str(),
            "applied session outcome"
        );

        propagation::propagate(
            &self.graph,
            &self.store,
            user_id,
            &outcome.concept_id,
            update.delta,
            &self.config.propagation,
        );

        Ok(update.record)
    }

    /// Current mastery for a catalog concept; the default record when the
    /// user has never touched it.
    pub fn get_mastery(
        &self,
        user_id: &str,
        concept_id: &str,
    ) -> Result<MasteryRecord, EngineError> {
        if !self.graph.contains(concept_id) {
            return Err(GraphError::UnknownConcept(concept_id.to_string()).into());
        }
        Ok(self.store.get(user_id, concept_id))
    }

    /// Prioritized daily plan for a user; a pure function of the current
    /// snapshots, `now`, and the target budget.
    pub fn build_study_plan(
        &self,
        user_id: &str,
        target_minutes: u32,
        now: DateTime<Utc>,
    ) -> StudyPlan {
        planner::build_plan(
            &self.graph,
            &self.store,
            user_id,
            target_minutes,
            now,
            &self.config.planner,
        )
    }

    /// Mastery-derived summary for a user's dashboard.
    pub fn analytics(&self, user_id: &str, now: DateTime<Utc>) -> MasteryAnalytics {
        analytics::analyze(&self.graph, &self.store, user_id, now)
    }
}
