use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Concepts and users are keyed by opaque string ids; the catalog generates
/// uuid v4 ids for concepts created through [`Concept::new`].
pub type ConceptId = String;

/// Scores at or below this are treated as zero when deriving status.
pub const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

/// Atomic unit of knowledge in the shared catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: ConceptId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub difficulty: Difficulty,
}

impl Concept {
    pub fn new(name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: None,
            difficulty,
        }
    }

    pub fn with_id(
        id: impl Into<ConceptId>,
        name: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            difficulty,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Prerequisite,
    Related,
    BuildsOn,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prerequisite => "prerequisite",
            Self::Related => "related",
            Self::BuildsOn => "builds_on",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prerequisite" => Self::Prerequisite,
            "builds_on" => Self::BuildsOn,
            _ => Self::Related,
        }
    }

    /// Edges a learner must clear before starting the target concept.
    pub fn is_dependency(&self) -> bool {
        matches!(self, Self::Prerequisite | Self::BuildsOn)
    }
}

/// Directed, weighted edge in the concept graph. For `prerequisite` and
/// `builds_on` edges, `to` depends on `from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from_concept_id: ConceptId,
    pub to_concept_id: ConceptId,
    pub kind: RelationshipKind,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Mastered,
}

impl MasteryStatus {
    /// Mastery score at or above which a concept counts as mastered.
    pub const MASTERED_SCORE: f64 = 0.9;
    /// Mastery score at or above which a concept counts as completed.
    pub const COMPLETED_SCORE: f64 = 0.5;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::MASTERED_SCORE {
            Self::Mastered
        } else if score >= Self::COMPLETED_SCORE {
            Self::Completed
        } else if score > SCORE_EPSILON {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Mastered => "mastered",
        }
    }

    /// Whether this status satisfies a prerequisite gate.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Completed | Self::Mastered)
    }
}

/// Per-user, per-concept mastery state. Created lazily on first contact,
/// never deleted; decays toward zero instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub status: MasteryStatus,
    pub mastery_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_due: Option<DateTime<Utc>>,
    /// Current spaced-repetition interval; grows by the ease factor on each
    /// successful review.
    pub interval_days: f64,
    /// Successful direct reviews so far; zero means the next success is the
    /// first-ever and starts the interval at its base value.
    pub review_count: u32,
}

impl Default for MasteryRecord {
    fn default() -> Self {
        Self {
            status: MasteryStatus::NotStarted,
            mastery_score: 0.0,
            last_reviewed: None,
            reviews_due: None,
            interval_days: 0.0,
            review_count: 0,
        }
    }
}

/// Outcome of one completed study session. Consumed once by the scheduler,
/// never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub concept_id: ConceptId,
    /// Self-reported comprehension, 1-5.
    pub comprehension_rating: u8,
    /// Informational only; never read by scheduling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enjoyment_rating: Option<u8>,
    pub duration_minutes: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanItemKind {
    Review,
    NewConcept,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub concept_id: ConceptId,
    pub name: String,
    pub kind: PlanItemKind,
    pub estimated_minutes: u32,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overdue_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastery_score: Option<f64>,
}

/// Ordered daily plan: due reviews first, then prerequisite-ready new
/// concepts, bounded by the target-minutes budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub generated_at: DateTime<Utc>,
    pub target_minutes: u32,
    pub total_minutes: u32,
    pub items: Vec<PlanItem>,
}
