//! # Cortex Core
//!
//! Core library for Cortex - an adaptive study-plan backend.
//!
//! This crate provides:
//! - Configuration management
//! - Gemini CLI process wrapper
//! - PDF text extraction
//! - Model-reply parsing into topics, summaries, and MCQs
//! - Difficulty-tier aware quality filtering and timing
//! - Timed study-schedule construction
//! - Level-adaptive document summarization
//! - HTTP API server
//! - Shared data models

pub mod config;
pub mod gemini;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod pdf;
pub mod prompt;
pub mod quality;
pub mod schedule;
pub mod server;
pub mod study;
pub mod summarize;
pub mod tier;
pub mod timing;

pub use config::{Config, ConfigError, LimitsConfig};
pub use gemini::{GeminiClient, GeminiError, GeminiResponse};
pub use model::*;
pub use parse::{AnswerKey, Mcq, ParseResult, ParsedTopic};
pub use schedule::{ScheduleBuilder, Session, TopicBlock};
pub use study::{StudyError, StudyPlan};
pub use summarize::{Summary, SummaryError};
pub use tier::{DifficultyTier, TierSettings};
