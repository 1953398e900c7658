//! Study-plan generation pipeline.
//!
//! Orchestrates the full flow: normalize extracted text, build the
//! tier-adapted prompt, call the model, parse and filter the reply, and
//! lay the surviving topics out on a timed schedule. The back half of the
//! pipeline ([`plan_from_reply`], [`quiz_from_reply`]) is pure so the
//! parsing and scheduling behavior can be exercised without a model.

use crate::gemini::{GeminiClient, GeminiError};
use crate::normalize::clean_text;
use crate::parse::{parse_model_reply, Mcq};
use crate::pdf::PdfError;
use crate::prompt::{build_prompt, truncate_content};
use crate::quality::filter_topics;
use crate::schedule::{ScheduleBuilder, ScheduledTopic, TopicBlock};
use crate::tier::DifficultyTier;
use crate::timing::suggested_minutes;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

/// At most this many topics are scheduled per request
pub const MAX_TOPICS: usize = 15;

/// Normalized input shorter than this is rejected as unusable
pub const MIN_CONTENT_CHARS: usize = 100;

/// Errors that can occur while generating a study plan
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Content generation failed: {0}")]
    Upstream(#[from] GeminiError),

    #[error("No valid content found")]
    EmptyContent,

    #[error("Failed to extract valid topics")]
    NoValidTopics { warnings: Vec<String> },

    #[error("No topics meeting quality standards")]
    NoQualifyingContent,
}

/// Tier-derived features echoed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdaptiveFeatures {
    pub time_per_topic: String,
    pub qna_time: String,
    pub explanation_style: String,
    pub question_difficulty: String,
}

impl AdaptiveFeatures {
    pub fn for_tier(tier: DifficultyTier) -> Self {
        let s = tier.settings();
        Self {
            time_per_topic: format!("{}-{} min", s.min_topic_time, s.max_topic_time),
            qna_time: format!("{} min", s.qna_time),
            explanation_style: s.explanation_depth.to_string(),
            question_difficulty: s.question_complexity.to_string(),
        }
    }
}

/// Summary statistics for a generated plan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanMetadata {
    /// Unique id for this generated plan
    pub plan_id: String,

    pub total_topics: usize,
    /// Sum of allocated minutes across all topic blocks
    pub total_time: u32,
    pub tier: DifficultyTier,
    pub adaptive_features: AdaptiveFeatures,
    /// Parser warnings for segments that were dropped
    pub warnings: Vec<String>,
}

/// A finished study plan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudyPlan {
    pub schedule: Vec<TopicBlock>,
    pub metadata: PlanMetadata,
}

/// A flat quiz generated from raw text
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub questions: Vec<Mcq>,
    pub difficulty_level: DifficultyTier,
    pub total_questions: usize,
}

/// Generate a timed study plan from raw extracted text.
pub async fn generate_study_plan(
    client: &GeminiClient,
    raw_text: &str,
    tier: DifficultyTier,
    start_time: DateTime<Local>,
    max_content_chars: usize,
) -> Result<StudyPlan, StudyError> {
    let reply = request_study_guide(client, raw_text, tier, max_content_chars).await?;
    plan_from_reply(&reply, tier, start_time)
}

/// Generate a flat MCQ quiz from raw text.
pub async fn generate_quiz(
    client: &GeminiClient,
    raw_text: &str,
    num_questions: usize,
    tier: DifficultyTier,
    max_content_chars: usize,
) -> Result<Quiz, StudyError> {
    let reply = request_study_guide(client, raw_text, tier, max_content_chars).await?;
    quiz_from_reply(&reply, num_questions, tier)
}

/// Front half of the pipeline: normalize, guard, prompt, call the model.
async fn request_study_guide(
    client: &GeminiClient,
    raw_text: &str,
    tier: DifficultyTier,
    max_content_chars: usize,
) -> Result<String, StudyError> {
    let cleaned = clean_text(truncate_content(raw_text, max_content_chars));
    if cleaned.len() < MIN_CONTENT_CHARS {
        return Err(StudyError::EmptyContent);
    }

    let prompt = build_prompt(tier, &cleaned);
    info!("Generating study guide for {} tier", tier);

    let response = client.call_text(&prompt).await?;
    Ok(response.text)
}

/// Back half of the pipeline: parse the model reply, filter, time, and
/// schedule. Pure function of its inputs.
pub fn plan_from_reply(
    reply: &str,
    tier: DifficultyTier,
    start_time: DateTime<Local>,
) -> Result<StudyPlan, StudyError> {
    let parsed = parse_model_reply(reply);
    if !parsed.valid {
        return Err(StudyError::NoValidTopics {
            warnings: parsed.warnings,
        });
    }
    let warnings = parsed.warnings;

    let topics = filter_topics(parsed.topics, tier);
    if topics.is_empty() {
        return Err(StudyError::NoQualifyingContent);
    }

    let mut builder = ScheduleBuilder::new(start_time, tier);
    let mut total_topics = 0;
    for (idx, topic) in topics.into_iter().take(MAX_TOPICS).enumerate() {
        let suggested_time = suggested_minutes(&topic.name, tier);
        builder.add_topic(ScheduledTopic {
            id: (idx + 1) as u32,
            name: topic.name,
            summary: topic.summary,
            mcqs: topic.mcqs,
            suggested_time,
        });
        total_topics += 1;
    }

    let schedule = builder.finish();
    let total_time = schedule.iter().map(|b| b.allocated_time).sum();

    debug!("Scheduled {} topics ({} min)", total_topics, total_time);

    Ok(StudyPlan {
        schedule,
        metadata: PlanMetadata {
            plan_id: Uuid::new_v4().to_string(),
            total_topics,
            total_time,
            tier,
            adaptive_features: AdaptiveFeatures::for_tier(tier),
            warnings,
        },
    })
}

/// Back half of the quiz flow: parse, filter, and flatten questions.
pub fn quiz_from_reply(
    reply: &str,
    num_questions: usize,
    tier: DifficultyTier,
) -> Result<Quiz, StudyError> {
    let parsed = parse_model_reply(reply);
    if !parsed.valid {
        return Err(StudyError::NoValidTopics {
            warnings: parsed.warnings,
        });
    }

    let topics = filter_topics(parsed.topics, tier);
    if topics.is_empty() {
        return Err(StudyError::NoQualifyingContent);
    }

    let questions: Vec<Mcq> = topics
        .into_iter()
        .flat_map(|t| t.mcqs)
        .take(num_questions)
        .collect();
    let total_questions = questions.len();

    Ok(Quiz {
        questions,
        difficulty_level: tier,
        total_questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    fn reply(topics: usize) -> String {
        (1..=topics)
            .map(|i| {
                format!(
                    "**Topic: Subject Area {i}**\n\
                     - First summary bullet\n\
                     - Second summary bullet\n\
                     - Third summary bullet\n\
                     \n\
                     Q: How does concept {i} apply in practice?\n\
                     a) Wrong\n\
                     b) Right\n\
                     c) Wrong again\n\
                     d) Also wrong\n\
                     Correct: b\n"
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plan_from_well_formed_reply() {
        let plan = plan_from_reply(&reply(3), DifficultyTier::Basic, start()).unwrap();

        assert_eq!(plan.schedule.len(), 3);
        assert_eq!(plan.metadata.total_topics, 3);
        assert_eq!(plan.metadata.tier, DifficultyTier::Basic);
        assert!(plan.metadata.warnings.is_empty());
        assert!(!plan.metadata.plan_id.is_empty());

        // Ids are 1-based and sequential
        let ids: Vec<u32> = plan.schedule.iter().map(|b| b.topic_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // "Subject Area N" is 3 words -> 15 base -> 20 (x1.3) -> clamped to 25,
        // plus 15 minutes of Q&A
        assert_eq!(plan.schedule[0].allocated_time, 40);
        assert_eq!(plan.metadata.total_time, 120);
    }

    #[test]
    fn test_adaptive_features_reflect_tier() {
        let plan = plan_from_reply(&reply(1), DifficultyTier::Advanced, start()).unwrap();
        let features = &plan.metadata.adaptive_features;

        assert_eq!(features.time_per_topic, "15-35 min");
        assert_eq!(features.qna_time, "8 min");
        assert_eq!(features.explanation_style, "concise");
        assert_eq!(features.question_difficulty, "hard");
    }

    #[test]
    fn test_topic_cap() {
        let plan = plan_from_reply(&reply(20), DifficultyTier::Basic, start()).unwrap();
        assert_eq!(plan.schedule.len(), MAX_TOPICS);
        assert_eq!(plan.metadata.total_topics, MAX_TOPICS);
    }

    #[test]
    fn test_unparseable_reply_reports_warnings() {
        let err = plan_from_reply(
            "**Topic: Topic 1**\n- bullet\n",
            DifficultyTier::Basic,
            start(),
        )
        .unwrap_err();

        match err {
            StudyError::NoValidTopics { warnings } => {
                assert!(!warnings.is_empty());
            }
            other => panic!("expected NoValidTopics, got {other:?}"),
        }
    }

    #[test]
    fn test_quality_rejection_is_distinct_from_parse_failure() {
        // Valid topic, but only one bullet: parser accepts, filter rejects
        let text = "**Topic: Thin Topic**\n- lone bullet\n\nQ: A question?\na) 1\nb) 2\nc) 3\nd) 4\nCorrect: a\n";
        let err = plan_from_reply(text, DifficultyTier::Basic, start()).unwrap_err();
        assert!(matches!(err, StudyError::NoQualifyingContent));
    }

    #[test]
    fn test_quiz_from_reply_flattens_and_caps() {
        let quiz = quiz_from_reply(&reply(5), 3, DifficultyTier::Intermediate).unwrap();
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.total_questions, 3);
        assert_eq!(quiz.difficulty_level, DifficultyTier::Intermediate);
    }

    #[test]
    fn test_quiz_with_fewer_questions_than_requested() {
        let quiz = quiz_from_reply(&reply(2), 10, DifficultyTier::Basic).unwrap();
        assert_eq!(quiz.total_questions, 2);
    }
}
