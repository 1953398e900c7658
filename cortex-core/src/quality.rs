//! Tier-aware quality filtering of parsed topics.
//!
//! Parsing only guarantees structural shape; this pass enforces the
//! per-tier content minimums before anything is scheduled.

use crate::parse::{ParsedTopic, MAX_MCQS_PER_TOPIC};
use crate::tier::DifficultyTier;
use tracing::debug;

/// Question prefixes considered definitional, too shallow for Advanced
/// learners
const DEFINITIONAL_PREFIXES: [&str; 3] = ["what is", "define", "the definition"];

/// Keep only topics meeting the tier's minimums.
///
/// For the Advanced tier, definitional questions are dropped first. A
/// topic survives iff it retains at least the tier's minimum summary
/// bullets and at least one question; surviving topics carry at most
/// [`MAX_MCQS_PER_TOPIC`] questions.
pub fn filter_topics(topics: Vec<ParsedTopic>, tier: DifficultyTier) -> Vec<ParsedTopic> {
    let min_summary_points = tier.min_summary_points();
    let before = topics.len();

    let filtered: Vec<ParsedTopic> = topics
        .into_iter()
        .filter_map(|mut topic| {
            if tier == DifficultyTier::Advanced {
                topic.mcqs.retain(|mcq| !is_definitional(&mcq.question));
            }
            topic.mcqs.truncate(MAX_MCQS_PER_TOPIC);

            if topic.summary.len() >= min_summary_points && !topic.mcqs.is_empty() {
                Some(topic)
            } else {
                None
            }
        })
        .collect();

    debug!(
        "Quality filter kept {}/{} topics at {} tier",
        filtered.len(),
        before,
        tier
    );
    filtered
}

fn is_definitional(question: &str) -> bool {
    let lowered = question.trim().to_lowercase();
    DEFINITIONAL_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{AnswerKey, Mcq};

    fn mcq(question: &str) -> Mcq {
        Mcq {
            question: question.to_string(),
            options: vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
            correct: AnswerKey::A,
        }
    }

    fn topic(name: &str, bullets: usize, mcqs: Vec<Mcq>) -> ParsedTopic {
        ParsedTopic {
            name: name.to_string(),
            summary: (0..bullets).map(|i| format!("bullet {i}")).collect(),
            mcqs,
        }
    }

    #[test]
    fn test_keeps_qualifying_topic() {
        let topics = vec![topic("Osmosis", 3, vec![mcq("How does water move?")])];
        let kept = filter_topics(topics, DifficultyTier::Basic);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_drops_topic_below_bullet_minimum() {
        let topics = vec![topic("Thin", 1, vec![mcq("A question?")])];
        assert!(filter_topics(topics.clone(), DifficultyTier::Basic).is_empty());
        assert!(filter_topics(topics, DifficultyTier::Advanced).is_empty());
    }

    #[test]
    fn test_advanced_needs_three_bullets() {
        let topics = vec![topic("Borderline", 2, vec![mcq("Why does it happen?")])];
        assert_eq!(
            filter_topics(topics.clone(), DifficultyTier::Intermediate).len(),
            1
        );
        assert!(filter_topics(topics, DifficultyTier::Advanced).is_empty());
    }

    #[test]
    fn test_drops_topic_with_no_questions() {
        let topics = vec![topic("Silent", 4, vec![])];
        assert!(filter_topics(topics, DifficultyTier::Basic).is_empty());
    }

    #[test]
    fn test_advanced_drops_definitional_questions() {
        let topics = vec![topic(
            "Enzymes",
            3,
            vec![
                mcq("What is an enzyme?"),
                mcq("How does pH affect catalytic efficiency?"),
            ],
        )];
        let kept = filter_topics(topics, DifficultyTier::Advanced);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].mcqs.len(), 1);
        assert!(kept[0].mcqs[0].question.starts_with("How does pH"));
    }

    #[test]
    fn test_advanced_drops_topic_left_with_only_definitional_questions() {
        let topics = vec![topic(
            "Glossary",
            3,
            vec![mcq("Define osmosis"), mcq("The definition of diffusion is?")],
        )];
        assert!(filter_topics(topics, DifficultyTier::Advanced).is_empty());
    }

    #[test]
    fn test_basic_keeps_definitional_questions() {
        let topics = vec![topic("Enzymes", 2, vec![mcq("What is an enzyme?")])];
        assert_eq!(filter_topics(topics, DifficultyTier::Basic).len(), 1);
    }

    #[test]
    fn test_caps_mcqs_at_two() {
        let topics = vec![topic(
            "Crowded",
            3,
            vec![mcq("One?"), mcq("Two?"), mcq("Three?")],
        )];
        let kept = filter_topics(topics, DifficultyTier::Basic);
        assert_eq!(kept[0].mcqs.len(), MAX_MCQS_PER_TOPIC);
    }
}
