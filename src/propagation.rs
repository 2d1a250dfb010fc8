//! Single-hop propagation of mastery deltas across the concept graph.
//!
//! A direct score change on one concept nudges graph-adjacent records:
//! dependency edges (prerequisite/builds_on) carry 0.15 * strength * delta
//! of positive credit to the opposite endpoint, related edges carry
//! 0.10 * strength * delta in both directions for either sign. One hop only;
//! no cascade. Propagation never establishes a review schedule and never
//! surfaces an error to the caller.

use tracing::{debug, warn};

use crate::config::PropagationParams;
use crate::graph::{ConceptGraph, Direction};
use crate::store::MasteryStore;
use crate::types::{MasteryStatus, RelationshipKind};

const ALL_KINDS: [RelationshipKind; 3] = [
    RelationshipKind::Prerequisite,
    RelationshipKind::Related,
    RelationshipKind::BuildsOn,
];

/// Spread a damped fraction of `delta` from `concept_id` to its neighbors.
/// Best-effort: dangling edges and store conflicts are skipped and logged.
pub fn propagate<S: MasteryStore>(
    graph: &ConceptGraph,
    store: &S,
    user_id: &str,
    concept_id: &str,
    delta: f64,
    params: &PropagationParams,
) {
    if delta.abs() <= f64::EPSILON {
        return;
    }

    for direction in [Direction::Outgoing, Direction::Incoming] {
        let neighbors = match graph.neighbors(concept_id, direction, &ALL_KINDS) {
            Ok(neighbors) => neighbors,
            Err(err) => {
                warn!(error = %err, concept_id, "propagation aborted on graph lookup");
                return;
            }
        };

        for neighbor in neighbors {
            let nudge = match neighbor.kind {
                RelationshipKind::Related => params.related_rate * neighbor.strength * delta,
                // Succeeding weakly confirms adjacent dependency material;
                // failure never punishes it.
                RelationshipKind::Prerequisite | RelationshipKind::BuildsOn => {
                    if delta <= 0.0 {
                        continue;
                    }
                    params.dependency_rate * neighbor.strength * delta
                }
            };
            if nudge == 0.0 {
                continue;
            }

            if !graph.contains(&neighbor.concept_id) {
                warn!(
                    concept_id = %neighbor.concept_id,
                    "skipping propagation across dangling edge"
                );
                continue;
            }

            let record = store.get(user_id, &neighbor.concept_id);
            if record.status == MasteryStatus::Mastered && nudge < 0.0 {
                debug!(
                    concept_id = %neighbor.concept_id,
                    "ignoring negative propagation into mastered concept"
                );
                continue;
            }

            let mut updated = record;
            updated.mastery_score = (updated.mastery_score + nudge).clamp(0.0, 1.0);
            updated.status = MasteryStatus::from_score(updated.mastery_score);

            if let Err(err) = store.upsert(user_id, &neighbor.concept_id, updated) {
                warn!(
                    error = %err,
                    concept_id = %neighbor.concept_id,
                    "skipping neighbor after store conflict"
                );
            }
        }
    }
}
