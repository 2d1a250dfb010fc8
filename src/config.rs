use serde::{Deserialize, Serialize};

use crate::types::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerParams {
    /// Performance factor at or above which a completed session counts as a
    /// successful review.
    pub success_threshold: f64,
    /// Fraction of the remaining headroom (1 - score) credited per success.
    pub growth_rate: f64,
    /// Ease multiplier base; per-review ease is `ease_base + p`.
    pub ease_base: f64,
    /// Ceiling on the per-review interval multiplier.
    pub max_ease: f64,
    /// Interval after a first-ever success, and after any failure.
    pub first_interval_days: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            success_threshold: 0.6,
            growth_rate: 0.5,
            ease_base: 1.3,
            max_ease: 4.0,
            first_interval_days: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationParams {
    /// Damping rate for prerequisite/builds_on edges (positive deltas only).
    pub dependency_rate: f64,
    /// Damping rate for related edges, both directions and both signs.
    pub related_rate: f64,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            dependency_rate: 0.15,
            related_rate: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerParams {
    pub default_target_minutes: u32,
    /// Fixed per-item estimate for a review.
    pub review_minutes: u32,
    pub beginner_minutes: u32,
    pub intermediate_minutes: u32,
    pub advanced_minutes: u32,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            default_target_minutes: 45,
            review_minutes: 10,
            beginner_minutes: 15,
            intermediate_minutes: 25,
            advanced_minutes: 40,
        }
    }
}

impl PlannerParams {
    pub fn new_concept_minutes(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Beginner => self.beginner_minutes,
            Difficulty::Intermediate => self.intermediate_minutes,
            Difficulty::Advanced => self.advanced_minutes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scheduler: SchedulerParams,
    pub propagation: PropagationParams,
    pub planner: PlannerParams,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MASTERY_REVIEW_MINUTES") {
            config.planner.review_minutes =
                val.parse().unwrap_or(config.planner.review_minutes);
        }
        if let Ok(val) = std::env::var("MASTERY_TARGET_MINUTES") {
            config.planner.default_target_minutes =
                val.parse().unwrap_or(config.planner.default_target_minutes);
        }
        if let Ok(val) = std::env::var("MASTERY_DEPENDENCY_RATE") {
            config.propagation.dependency_rate =
                val.parse().unwrap_or(config.propagation.dependency_rate);
        }
        if let Ok(val) = std::env::var("MASTERY_RELATED_RATE") {
            config.propagation.related_rate =
                val.parse().unwrap_or(config.propagation.related_rate);
        }

        config
    }
}
