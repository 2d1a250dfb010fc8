//! Daily study plan builder.
//!
//! A pure function of (mastery snapshot, graph snapshot, now, target): due
//! reviews most-overdue-first, then prerequisite-ready new concepts
//! easiest-first, greedily packed into the target-minutes budget. Items are
//! whole-unit; one that would exceed the remaining budget is skipped, not
//! truncated.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::PlannerParams;
use crate::graph::{ConceptGraph, Direction};
use crate::store::MasteryStore;
use crate::types::{
    Concept, ConceptId, MasteryRecord, MasteryStatus, PlanItem, PlanItemKind, Priority,
    RelationshipKind, StudyPlan,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn build_plan<S: MasteryStore>(
    graph: &ConceptGraph,
    store: &S,
    user_id: &str,
    target_minutes: u32,
    now: DateTime<Utc>,
    params: &PlannerParams,
) -> StudyPlan {
    let mut items = Vec::new();
    let mut remaining = target_minutes;

    for (concept_id, record, due_at) in due_reviews(store, user_id, now) {
        let Some(concept) = graph.concept(&concept_id) else {
            debug!(concept_id = %concept_id, "skipping review for concept missing from catalog");
            continue;
        };
        if params.review_minutes > remaining {
            continue;
        }
        let overdue_days = (now - due_at).num_seconds() as f64 / SECONDS_PER_DAY;
        items.push(PlanItem {
            concept_id,
            name: concept.name.clone(),
            kind: PlanItemKind::Review,
            estimated_minutes: params.review_minutes,
            priority: review_priority(overdue_days),
            overdue_days: Some(overdue_days),
            mastery_score: Some(record.mastery_score),
        });
        remaining -= params.review_minutes;
    }

    for concept in new_candidates(graph, store, user_id) {
        let cost = params.new_concept_minutes(concept.difficulty);
        if cost > remaining {
            continue;
        }
        let readiness = prerequisite_readiness(graph, store, user_id, &concept.id);
        items.push(PlanItem {
            concept_id: concept.id.clone(),
            name: concept.name.clone(),
            kind: PlanItemKind::NewConcept,
            estimated_minutes: cost,
            priority: readiness_priority(readiness),
            overdue_days: None,
            mastery_score: None,
        });
        remaining -= cost;
    }

    StudyPlan {
        generated_at: now,
        target_minutes,
        total_minutes: target_minutes - remaining,
        items,
    }
}

/// Records due at or before `now`, most overdue first, concept id as the
/// deterministic tie-break.
fn due_reviews<S: MasteryStore>(
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
) -> Vec<(ConceptId, MasteryRecord, DateTime<Utc>)> {
    let mut due: Vec<(ConceptId, MasteryRecord, DateTime<Utc>)> = store
        .records_for_user(user_id)
        .into_iter()
        .filter_map(|(id, record)| {
            record
                .reviews_due
                .filter(|due_at| *due_at <= now)
                .map(|due_at| (id, record, due_at))
        })
        .collect();
    due.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
    due
}

/// Unstarted concepts whose prerequisite gate is satisfied, easiest first,
/// concept id as the deterministic tie-break.
fn new_candidates<'g, S: MasteryStore>(
    graph: &'g ConceptGraph,
    store: &S,
    user_id: &str,
) -> Vec<&'g Concept> {
    let mut candidates: Vec<&Concept> = graph
        .concepts()
        .filter(|concept| store.get(user_id, &concept.id).status == MasteryStatus::NotStarted)
        .filter(|concept| prerequisites_met(graph, store, user_id, &concept.id))
        .collect();
    candidates.sort_by(|a, b| a.difficulty.cmp(&b.difficulty).then_with(|| a.id.cmp(&b.id)));
    candidates
}

/// Every in-catalog source of an incoming prerequisite edge must be
/// completed or mastered. Dangling sources are skipped, like any other
/// dangling edge.
fn prerequisites_met<S: MasteryStore>(
    graph: &ConceptGraph,
    store: &S,
    user_id: &str,
    concept_id: &str,
) -> bool {
    graph
        .neighbors(concept_id, Direction::Incoming, &[RelationshipKind::Prerequisite])
        .unwrap_or_default()
        .iter()
        .filter(|prereq| {
            if graph.contains(&prereq.concept_id) {
                true
            } else {
                debug!(concept_id = %prereq.concept_id, "ignoring dangling prerequisite edge");
                false
            }
        })
        .all(|prereq| store.get(user_id, &prereq.concept_id).status.is_satisfied())
}

/// Mean mastery over gating prerequisites; 1.0 when there are none.
fn prerequisite_readiness<S: MasteryStore>(
    graph: &ConceptGraph,
    store: &S,
    user_id: &str,
    concept_id: &str,
) -> f64 {
    let scores: Vec<f64> = graph
        .neighbors(concept_id, Direction::Incoming, &[RelationshipKind::Prerequisite])
        .unwrap_or_default()
        .iter()
        .filter(|prereq| graph.contains(&prereq.concept_id))
        .map(|prereq| store.get(user_id, &prereq.concept_id).mastery_score)
        .collect();
    if scores.is_empty() {
        1.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn review_priority(overdue_days: f64) -> Priority {
    if overdue_days >= 7.0 {
        Priority::High
    } else if overdue_days >= 2.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn readiness_priority(readiness: f64) -> Priority {
    if readiness >= 0.9 {
        Priority::High
    } else if readiness >= 0.7 {
        Priority::Medium
    } else {
        Priority::Low
    }
}
