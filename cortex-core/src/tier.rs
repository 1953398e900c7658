//! Difficulty tiers and the per-tier settings table.
//!
//! A tier selects prompt wording, timing bounds, and quality thresholds for
//! a single request. The settings table is static and read-only, so any
//! number of requests can consult it concurrently.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Learner difficulty tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    /// All tiers, in increasing difficulty order
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Basic,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    /// Parse a tier name case-insensitively, defaulting to Basic for
    /// anything unrecognized (invalid tiers are corrected, not rejected).
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "intermediate" => DifficultyTier::Intermediate,
            "advanced" => DifficultyTier::Advanced,
            _ => DifficultyTier::Basic,
        }
    }

    /// Settings governing timing, breaks, and question style for this tier
    pub fn settings(&self) -> TierSettings {
        match self {
            DifficultyTier::Basic => TierSettings {
                min_topic_time: 25,
                max_topic_time: 60,
                qna_time: 15,
                difficulty_multiplier: 1.3,
                explanation_depth: "detailed",
                question_complexity: "easy",
                break_time: 5,
                break_frequency: 2,
            },
            DifficultyTier::Intermediate => TierSettings {
                min_topic_time: 20,
                max_topic_time: 45,
                qna_time: 10,
                difficulty_multiplier: 1.0,
                explanation_depth: "balanced",
                question_complexity: "medium",
                break_time: 5,
                break_frequency: 3,
            },
            DifficultyTier::Advanced => TierSettings {
                min_topic_time: 15,
                max_topic_time: 35,
                qna_time: 8,
                difficulty_multiplier: 0.8,
                explanation_depth: "concise",
                question_complexity: "hard",
                break_time: 5,
                break_frequency: 3,
            },
        }
    }

    /// Minimum number of summary bullets a topic must keep to survive
    /// quality filtering
    pub fn min_summary_points(&self) -> usize {
        match self {
            DifficultyTier::Advanced => 3,
            _ => 2,
        }
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifficultyTier::Basic => write!(f, "Basic"),
            DifficultyTier::Intermediate => write!(f, "Intermediate"),
            DifficultyTier::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Per-tier configuration, derived once per request from the tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSettings {
    /// Lower bound for a single topic's study time (minutes)
    pub min_topic_time: u32,
    /// Upper bound for a single topic's study time (minutes)
    pub max_topic_time: u32,
    /// Q&A session length appended to every topic (minutes)
    pub qna_time: u32,
    /// Scales the word-count-based time estimate
    pub difficulty_multiplier: f64,
    /// Requested explanation style, surfaced in response metadata
    pub explanation_depth: &'static str,
    /// Requested question difficulty, surfaced in response metadata
    pub question_complexity: &'static str,
    /// Break length (minutes)
    pub break_time: u32,
    /// A break is inserted after every this many topics
    pub break_frequency: u32,
}
