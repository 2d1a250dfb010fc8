//! Spaced-repetition review scheduler.
//!
//! SM-2 style, simplified. A comprehension rating r in [1,5] normalizes to a
//! performance factor p = (r-1)/4. A completed session with p >= 0.6 is a
//! successful review:
//!
//!   score' = score + (1 - score) * p * growth_rate
//!
//! and stretches the review interval by ease = ease_base + p (first success:
//! 1 day). p < 0.6 is a failed review: the score shrinks proportionally,
//!
//!   score' = score * (0.5 + 0.5 * p)
//!
//! and the interval resets to 1 day. A session with p >= 0.6 that was not
//! completed earns no credit and leaves the schedule untouched.

use chrono::{DateTime, Duration, Utc};

use crate::config::SchedulerParams;
use crate::types::{MasteryRecord, MasteryStatus, SessionOutcome};

/// Result of applying one session to a mastery record.
#[derive(Debug, Clone)]
pub struct ReviewUpdate {
    pub record: MasteryRecord,
    /// Score delta of the direct update; input to propagation.
    pub delta: f64,
}

/// Normalize a 1-5 comprehension rating to [0, 1].
pub fn performance_factor(rating: u8) -> f64 {
    (f64::from(rating) - 1.0) / 4.0
}

/// Apply one session outcome to a record. The rating must already be
/// validated; the engine rejects out-of-range ratings before any mutation.
pub fn apply_review(
    record: &MasteryRecord,
    outcome: &SessionOutcome,
    now: DateTime<Utc>,
    params: &SchedulerParams,
) -> ReviewUpdate {
    let p = performance_factor(outcome.comprehension_rating);
    let old_score = record.mastery_score;
    let mut updated = record.clone();

    if p < params.success_threshold {
        // Weak or failed review: proportional shrink, no cliff to zero.
        updated.mastery_score = (old_score * (0.5 + 0.5 * p)).clamp(0.0, 1.0);
        updated.interval_days = params.first_interval_days;
        // A record that never earned a schedule stays unscheduled.
        if record.reviews_due.is_some() {
            updated.reviews_due = Some(now + days(updated.interval_days));
        }
    } else if outcome.completed {
        updated.mastery_score =
            (old_score + (1.0 - old_score) * p * params.growth_rate).clamp(0.0, 1.0);
        updated.interval_days = if record.review_count == 0 {
            params.first_interval_days
        } else {
            let ease = (params.ease_base + p).min(params.max_ease);
            (record.interval_days * ease).max(params.first_interval_days)
        };
        updated.reviews_due = Some(now + days(updated.interval_days));
        updated.review_count = record.review_count + 1;
    }
    // p >= threshold without completion: comprehension alone earns no
    // credit and does not advance the schedule.

    updated.status = MasteryStatus::from_score(updated.mastery_score);
    updated.last_reviewed = Some(now);

    ReviewUpdate {
        delta: updated.mastery_score - old_score,
        record: updated,
    }
}

fn days(interval: f64) -> Duration {
    Duration::milliseconds((interval * 86_400_000.0).round() as i64)
}
