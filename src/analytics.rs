//! Mastery-derived learner analytics.
//!
//! Summary statistics the host dashboard renders next to the study plan:
//! how much of the catalog the learner has touched, which concept
//! categories are weak or strong, and which concepts are due for review.
//! Time-on-task and streak figures are host concerns; the core never keeps
//! session history.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::ConceptGraph;
use crate::store::MasteryStore;
use crate::types::{ConceptId, MasteryStatus};

/// Categories with mean mastery below this are weak areas.
const WEAK_AREA_SCORE: f64 = 0.4;
/// Categories with mean mastery at or above this are strong areas.
const STRONG_AREA_SCORE: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryAnalytics {
    pub concepts_tracked: usize,
    pub concepts_mastered: usize,
    /// Mean mastery over started concepts; `None` until something is started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    /// Concept categories with low mean mastery, weakest first.
    pub weak_areas: Vec<String>,
    /// Concept categories with high mean mastery, strongest first.
    pub strong_areas: Vec<String>,
    /// Concepts due for review, most overdue first.
    pub recommended_reviews: Vec<ConceptId>,
}

pub fn analyze<S: MasteryStore>(
    graph: &ConceptGraph,
    store: &S,
    user_id: &str,
    now: DateTime<Utc>,
) -> MasteryAnalytics {
    let records = store.records_for_user(user_id);

    let concepts_tracked = records.len();
    let concepts_mastered = records
        .iter()
        .filter(|(_, record)| record.status == MasteryStatus::Mastered)
        .count();

    let mut score_sum = 0.0;
    let mut started = 0usize;
    let mut by_category: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut due: Vec<(DateTime<Utc>, ConceptId)> = Vec::new();

    for (concept_id, record) in &records {
        if let Some(due_at) = record.reviews_due {
            if due_at <= now && graph.contains(concept_id) {
                due.push((due_at, concept_id.clone()));
            }
        }
        if record.status == MasteryStatus::NotStarted {
            continue;
        }
        started += 1;
        score_sum += record.mastery_score;
        if let Some(category) = graph.concept(concept_id).and_then(|c| c.category.as_ref()) {
            let entry = by_category.entry(category.clone()).or_insert((0.0, 0));
            entry.0 += record.mastery_score;
            entry.1 += 1;
        }
    }

    let average_score = (started > 0).then(|| score_sum / started as f64);

    let mut weak_areas: Vec<(f64, String)> = Vec::new();
    let mut strong_areas: Vec<(f64, String)> = Vec::new();
    for (category, (sum, count)) in by_category {
        let mean = sum / count as f64;
        if mean < WEAK_AREA_SCORE {
            weak_areas.push((mean, category));
        } else if mean >= STRONG_AREA_SCORE {
            strong_areas.push((mean, category));
        }
    }
    weak_areas.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.1.cmp(&b.1)));
    strong_areas.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.1.cmp(&b.1)));

    due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    MasteryAnalytics {
        concepts_tracked,
        concepts_mastered,
        average_score,
        weak_areas: weak_areas.into_iter().map(|(_, category)| category).collect(),
        strong_areas: strong_areas.into_iter().map(|(_, category)| category).collect(),
        recommended_reviews: due.into_iter().map(|(_, id)| id).collect(),
    }
}
