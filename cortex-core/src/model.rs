//! Shared API data models.
//!
//! Request and response bodies for the HTTP API. Study-plan domain types
//! (topics, schedules, quizzes) live next to the logic that produces
//! them; this module only holds the wire-level wrappers around them.

use crate::parse::Mcq;
use crate::schedule::TopicBlock;
use crate::study::{PlanMetadata, Quiz, StudyPlan};
use crate::summarize::Summary;
use crate::tier::DifficultyTier;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,

    /// Always "error"
    pub status: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            status: "error".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub ready: bool,
    pub version: String,
    pub gemini_available: bool,
}

/// Successful response from `/api/process`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessResponse {
    /// Always "success"
    pub status: String,
    pub schedule: Vec<TopicBlock>,
    pub metadata: PlanMetadata,
}

impl From<StudyPlan> for ProcessResponse {
    fn from(plan: StudyPlan) -> Self {
        Self {
            status: "success".to_string(),
            schedule: plan.schedule,
            metadata: plan.metadata,
        }
    }
}

fn default_num_questions() -> usize {
    15
}

fn default_user_level() -> String {
    "basic".to_string()
}

/// Request body for `/api/quiz/text`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizTextRequest {
    /// Raw study text to generate questions from
    pub text: String,

    /// How many questions to return (1-20)
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,

    /// Difficulty tier name; unrecognized values fall back to basic
    #[serde(default = "default_user_level")]
    pub user_level: String,
}

/// Successful response from `/api/quiz/text`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizResponse {
    /// Always "success"
    pub status: String,
    pub questions: Vec<Mcq>,
    pub difficulty_level: DifficultyTier,
    pub total_questions: usize,
}

impl From<Quiz> for QuizResponse {
    fn from(quiz: Quiz) -> Self {
        Self {
            status: "success".to_string(),
            questions: quiz.questions,
            difficulty_level: quiz.difficulty_level,
            total_questions: quiz.total_questions,
        }
    }
}

/// Request body for `/api/update_timing`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTimingRequest {
    pub topic_id: u32,

    /// New minutes for the topic
    pub minutes: u32,

    /// Previously allocated minutes, used to report time saved
    #[serde(default)]
    pub allocated_time: u32,
}

/// Acknowledgement from `/api/update_timing`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTimingResponse {
    /// Always "success"
    pub status: String,
    pub message: String,
    pub topic_id: u32,
    pub new_time: u32,
    /// `allocated_time - minutes`; negative when the topic grew
    pub time_saved: i64,
}

/// Successful response from `/api/summarize`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    /// Always "success"
    pub status: String,
    pub summary: String,
    pub user_level: DifficultyTier,
    pub message: String,
}

impl From<Summary> for SummarizeResponse {
    fn from(summary: Summary) -> Self {
        let message = format!("Summary generated for {} level", summary.user_level);
        Self {
            status: "success".to_string(),
            summary: summary.summary,
            user_level: summary.user_level,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_request_defaults() {
        let req: QuizTextRequest = serde_json::from_str(r#"{"text": "some text"}"#).unwrap();
        assert_eq!(req.num_questions, 15);
        assert_eq!(req.user_level, "basic");
    }

    #[test]
    fn test_update_timing_request_allocated_time_defaults_to_zero() {
        let req: UpdateTimingRequest =
            serde_json::from_str(r#"{"topic_id": 1, "minutes": 25}"#).unwrap();
        assert_eq!(req.allocated_time, 0);
    }

    #[test]
    fn test_summarize_response_message_names_the_level() {
        let response: SummarizeResponse = Summary {
            summary: "short".to_string(),
            user_level: DifficultyTier::Advanced,
            chunks_processed: 1,
        }
        .into();
        assert_eq!(response.message, "Summary generated for Advanced level");
        assert_eq!(response.status, "success");
    }

    #[test]
    fn test_api_error_envelope() {
        let err = ApiError::new("boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["status"], "error");
    }
}
