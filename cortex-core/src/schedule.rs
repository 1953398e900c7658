//! Timed study-schedule construction.
//!
//! Topics are laid out sequentially: each becomes a study session followed
//! by a Q&A session, with breaks inserted after every few topics (more
//! often for Basic learners). Scheduling is purely additive and cannot
//! fail; breaks shift the clock but are stripped from the finished
//! schedule.

use crate::parse::Mcq;
use crate::tier::{DifficultyTier, TierSettings};
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wall-clock format used in schedule entries, e.g. "09:30 AM"
pub const TIME_FORMAT: &str = "%I:%M %p";

/// A topic ready for scheduling: parsed, filtered, and timed
#[derive(Debug, Clone)]
pub struct ScheduledTopic {
    /// 1-based id assigned at finalization
    pub id: u32,
    pub name: String,
    pub summary: Vec<String>,
    pub mcqs: Vec<Mcq>,
    /// Study minutes from the timing calculator
    pub suggested_time: u32,
}

/// Kind of sub-session inside a topic block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Study,
    Qna,
}

/// One sub-session (study or Q&A) of a topic block
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub start_time: String,
    pub end_time: String,
    /// Minutes
    pub duration: u32,
}

/// A scheduled topic with its wall-clock span and attached content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicBlock {
    pub topic_id: u32,
    pub name: String,
    pub summary: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    /// Study + Q&A minutes
    pub allocated_time: u32,
    pub sessions: Vec<Session>,
    pub qna: Vec<Mcq>,
}

/// A rest period between topic blocks
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BreakBlock {
    pub start_time: String,
    pub end_time: String,
    /// Minutes
    pub duration: u32,
}

/// One timed block in the raw schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleEntry {
    Topic(TopicBlock),
    Break(BreakBlock),
}

/// Sequential schedule builder.
///
/// State machine over `{current_time, topic_counter, settings}`; every
/// `add_topic` advances the clock past the topic's study and Q&A sessions
/// and, at the tier's break frequency, past a break as well.
pub struct ScheduleBuilder {
    entries: Vec<ScheduleEntry>,
    current_time: DateTime<Local>,
    topic_counter: u32,
    settings: TierSettings,
}

impl ScheduleBuilder {
    pub fn new(start_time: DateTime<Local>, tier: DifficultyTier) -> Self {
        Self {
            entries: Vec::new(),
            current_time: start_time,
            topic_counter: 1,
            settings: tier.settings(),
        }
    }

    /// Append a topic block spanning its study and Q&A sessions, then a
    /// break when the tier's break frequency is reached.
    pub fn add_topic(&mut self, topic: ScheduledTopic) {
        let study_end = self.current_time + Duration::minutes(i64::from(topic.suggested_time));
        let qna_end = study_end + Duration::minutes(i64::from(self.settings.qna_time));

        let sessions = vec![
            Session {
                kind: SessionKind::Study,
                start_time: self.current_time.format(TIME_FORMAT).to_string(),
                end_time: study_end.format(TIME_FORMAT).to_string(),
                duration: topic.suggested_time,
            },
            Session {
                kind: SessionKind::Qna,
                start_time: study_end.format(TIME_FORMAT).to_string(),
                end_time: qna_end.format(TIME_FORMAT).to_string(),
                duration: self.settings.qna_time,
            },
        ];

        self.entries.push(ScheduleEntry::Topic(TopicBlock {
            topic_id: topic.id,
            name: topic.name,
            summary: topic.summary,
            start_time: self.current_time.format(TIME_FORMAT).to_string(),
            end_time: qna_end.format(TIME_FORMAT).to_string(),
            allocated_time: topic.suggested_time + self.settings.qna_time,
            sessions,
            qna: topic.mcqs,
        }));

        self.current_time = qna_end;
        self.topic_counter += 1;

        let topics_so_far = self.topic_counter - 1;
        if topics_so_far % self.settings.break_frequency == 0 {
            let break_end =
                self.current_time + Duration::minutes(i64::from(self.settings.break_time));
            self.entries.push(ScheduleEntry::Break(BreakBlock {
                start_time: self.current_time.format(TIME_FORMAT).to_string(),
                end_time: break_end.format(TIME_FORMAT).to_string(),
                duration: self.settings.break_time,
            }));
            self.current_time = break_end;
        }
    }

    /// The raw entry sequence, breaks included
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Finalize the schedule: breaks only affect timing, so they are
    /// stripped and topic blocks alone are reported.
    pub fn finish(self) -> Vec<TopicBlock> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                ScheduleEntry::Topic(block) => Some(block),
                ScheduleEntry::Break(_) => None,
            })
            .collect()
    }
}
