//! Parsing of free-text model replies into structured study topics.
//!
//! The upstream model is instructed (see [`crate::prompt`]) to mark each
//! topic with a `**Topic: <name>**` header, summarize it in `- ` bullets,
//! and emit MCQs as `Q:`/`a)`-`d)`/`Correct: <letter>` blocks. LLM output
//! only loosely follows instructions, so the parser isolates failures per
//! topic: a garbled segment becomes a warning, never an error for the
//! whole batch.

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum MCQs kept per topic
pub const MAX_MCQS_PER_TOPIC: usize = 2;

/// The correct choice of a four-option MCQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    /// Parse a single letter, case-insensitively
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(AnswerKey::A),
            'b' => Some(AnswerKey::B),
            'c' => Some(AnswerKey::C),
            'd' => Some(AnswerKey::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerKey::A => write!(f, "a"),
            AnswerKey::B => write!(f, "b"),
            AnswerKey::C => write!(f, "c"),
            AnswerKey::D => write!(f, "d"),
        }
    }
}

/// A multiple-choice question with exactly four options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Mcq {
    pub question: String,
    /// Always exactly four entries, in `a)`..`d)` order
    pub options: Vec<String>,
    pub correct: AnswerKey,
}

/// A topic candidate recovered from the model reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParsedTopic {
    pub name: String,
    /// Summary bullets, never empty for an accepted topic
    pub summary: Vec<String>,
    pub mcqs: Vec<Mcq>,
}

/// Outcome of parsing one model reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub topics: Vec<ParsedTopic>,
    pub warnings: Vec<String>,
    /// True iff at least one topic was accepted
    pub valid: bool,
}

/// Parse a raw model reply into topic candidates.
///
/// Text before the first `**Topic:**` marker is discarded. Topics without
/// a single summary bullet, or whose name is a bare placeholder like
/// "Topic 3", are dropped with a warning. MCQs missing an explicit
/// `Correct:` marker are likewise dropped with a warning rather than
/// being assigned a fabricated answer.
pub fn parse_model_reply(text: &str) -> ParseResult {
    let topic_re = Regex::new(r"\*\*Topic:\s*(.+?)\*\*").unwrap();
    let placeholder_re = Regex::new(r"(?i)^Topic\s*\d+$").unwrap();

    let mut result = ParseResult::default();

    // Locate topic headers and the content span that follows each one
    let markers: Vec<(String, usize, usize)> = topic_re
        .captures_iter(text)
        .map(|cap| {
            let whole = cap.get(0).unwrap();
            let name = cap.get(1).unwrap().as_str().trim().to_string();
            (name, whole.start(), whole.end())
        })
        .collect();

    for (idx, (name, _, content_start)) in markers.iter().enumerate() {
        let content_end = markers
            .get(idx + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        let content = &text[*content_start..content_end];

        let summary = extract_bullets(content);
        let mcqs = extract_mcqs(content, name, &mut result.warnings);

        if !summary.is_empty() && !name.is_empty() && !placeholder_re.is_match(name) {
            result.topics.push(ParsedTopic {
                name: name.clone(),
                summary,
                mcqs,
            });
        } else {
            result
                .warnings
                .push(format!("Skipped invalid or empty topic: {name}"));
        }
    }

    result.valid = !result.topics.is_empty();
    result
}

/// Summary bullets: every line starting with `- ` after trimming
fn extract_bullets(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(|bullet| bullet.trim().to_string())
        .filter(|bullet| !bullet.is_empty())
        .collect()
}

/// MCQ blocks: split the topic content on `Q:` markers and keep at most
/// the first [`MAX_MCQS_PER_TOPIC`] well-formed questions.
fn extract_mcqs(content: &str, topic_name: &str, warnings: &mut Vec<String>) -> Vec<Mcq> {
    let question_re = Regex::new(r"(?m)^\s*Q:\s*").unwrap();

    let mut blocks = question_re.split(content);
    // Text before the first Q: marker is bullets, not a question
    blocks.next();

    let mut mcqs = Vec::new();
    for block in blocks.take(MAX_MCQS_PER_TOPIC) {
        if block.trim().is_empty() {
            continue;
        }
        match parse_mcq_block(block) {
            McqOutcome::Parsed(mcq) => mcqs.push(mcq),
            McqOutcome::MissingCorrect(question) => {
                warnings.push(format!(
                    "Dropped question with no marked answer in '{topic_name}': {question}"
                ));
            }
            McqOutcome::Malformed => {
                warnings.push(format!("Skipped malformed question in '{topic_name}'"));
            }
        }
    }
    mcqs
}

enum McqOutcome {
    Parsed(Mcq),
    /// Four options found, but no explicit `Correct:` marker
    MissingCorrect(String),
    Malformed,
}

fn parse_mcq_block(block: &str) -> McqOutcome {
    let marker_re = Regex::new(r"(?m)^\s*[a-d]\)").unwrap();
    let correct_line_re = Regex::new(r"(?mi)^\s*Correct:").unwrap();
    let correct_re = Regex::new(r"(?i)Correct:\s*([a-d])").unwrap();

    // Option text may span lines: each option runs from its letter marker
    // to the next marker, the Correct: line, or the end of the block.
    let options_end = correct_line_re
        .find(block)
        .map(|m| m.start())
        .unwrap_or(block.len());

    let markers: Vec<(usize, usize)> = marker_re
        .find_iter(block)
        .filter(|m| m.start() < options_end)
        .map(|m| (m.start(), m.end()))
        .collect();

    let first_option_start = match markers.first() {
        Some((start, _)) => *start,
        None => return McqOutcome::Malformed,
    };

    // The question is everything before the first option marker
    let question = block[..first_option_start].trim().to_string();
    if question.is_empty() {
        return McqOutcome::Malformed;
    }

    let options: Vec<String> = markers
        .iter()
        .enumerate()
        .map(|(i, (_, text_start))| {
            let text_end = markers
                .get(i + 1)
                .map(|(next_start, _)| *next_start)
                .unwrap_or(options_end);
            block[*text_start..text_end].trim().to_string()
        })
        .collect();
    if options.len() != 4 || options.iter().any(String::is_empty) {
        return McqOutcome::Malformed;
    }

    match correct_re.captures(block) {
        Some(cap) => {
            let letter = cap[1].chars().next().unwrap();
            // from_letter cannot fail: the pattern only admits a-d
            let correct = AnswerKey::from_letter(letter).unwrap();
            McqOutcome::Parsed(Mcq {
                question,
                options,
                correct,
            })
        }
        None => McqOutcome::MissingCorrect(question),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"Here is your study guide.

**Topic: Cell Division**
- Mitosis produces two identical daughter cells
- Meiosis halves the chromosome count for gametes

Q: Which phase sees chromosomes align at the cell equator?
a) Prophase
b) Metaphase
c) Anaphase
d) Telophase
Correct: b
"#;

    #[test]
    fn test_parses_well_formed_topic() {
        let result = parse_model_reply(WELL_FORMED);

        assert!(result.valid);
        assert_eq!(result.topics.len(), 1);

        let topic = &result.topics[0];
        assert_eq!(topic.name, "Cell Division");
        assert_eq!(topic.summary.len(), 2);
        assert_eq!(
            topic.summary[0],
            "Mitosis produces two identical daughter cells"
        );
        assert_eq!(topic.mcqs.len(), 1);

        let mcq = &topic.mcqs[0];
        assert_eq!(mcq.options.len(), 4);
        assert_eq!(mcq.options[1], "Metaphase");
        assert_eq!(mcq.correct, AnswerKey::B);
    }

    #[test]
    fn test_preamble_is_discarded() {
        let result = parse_model_reply(WELL_FORMED);
        assert!(result.topics.iter().all(|t| t.name != "Here is your study guide."));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let first = parse_model_reply(WELL_FORMED);
        let second = parse_model_reply(WELL_FORMED);
        assert_eq!(first.topics, second.topics);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn test_topic_without_bullets_is_dropped_with_warning() {
        let text = format!(
            "**Topic: Orphan**\nNo bullets here.\n\n{}",
            WELL_FORMED
        );
        let result = parse_model_reply(&text);

        assert!(result.valid, "the other topic still qualifies");
        assert_eq!(result.topics.len(), 1);
        assert_eq!(result.topics[0].name, "Cell Division");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Skipped invalid or empty topic: Orphan")));
    }

    #[test]
    fn test_placeholder_topic_name_is_dropped() {
        let text = "**Topic: Topic 3**\n- A bullet\n";
        let result = parse_model_reply(text);

        assert!(!result.valid);
        assert!(result.topics.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_mcq_without_correct_marker_is_dropped() {
        let text = r#"**Topic: Photosynthesis**
- Converts light energy into chemical energy

Q: Where does the light reaction occur?
a) Stroma
b) Thylakoid membrane
c) Cytoplasm
d) Mitochondria
"#;
        let result = parse_model_reply(text);

        // Topic survives with no questions; the unanswerable MCQ is flagged
        assert!(result.valid);
        assert!(result.topics[0].mcqs.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("no marked answer")));
    }

    #[test]
    fn test_correct_marker_is_case_insensitive() {
        let text = WELL_FORMED.replace("Correct: b", "correct: B");
        let result = parse_model_reply(&text);
        assert_eq!(result.topics[0].mcqs[0].correct, AnswerKey::B);
    }

    #[test]
    fn test_multiline_option_text() {
        let text = r#"**Topic: Thermodynamics**
- Energy is conserved

Q: What does the second law state?
a) Entropy of an isolated system
   never decreases over time
b) Energy is created freely
c) Heat flows from cold to hot
d) Work is always reversible
Correct: a
"#;
        let result = parse_model_reply(text);

        let mcq = &result.topics[0].mcqs[0];
        assert_eq!(mcq.options.len(), 4);
        assert!(mcq.options[0].contains("never decreases"));
        assert_eq!(mcq.correct, AnswerKey::A);
    }

    #[test]
    fn test_mcq_with_wrong_option_count_is_skipped() {
        let text = r#"**Topic: Genetics**
- DNA carries hereditary information

Q: What base pairs with adenine?
a) Thymine
b) Guanine
Correct: a
"#;
        let result = parse_model_reply(text);

        assert!(result.valid);
        assert!(result.topics[0].mcqs.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("malformed question")));
    }

    #[test]
    fn test_at_most_two_mcqs_per_topic() {
        let question = "\nQ: Pick one\na) one\nb) two\nc) three\nd) four\nCorrect: a\n";
        let text = format!(
            "**Topic: Repetition**\n- A bullet\n- Another bullet\n{q}{q}{q}",
            q = question
        );
        let result = parse_model_reply(&text);

        assert_eq!(result.topics[0].mcqs.len(), MAX_MCQS_PER_TOPIC);
    }

    #[test]
    fn test_every_accepted_mcq_has_four_options() {
        let result = parse_model_reply(WELL_FORMED);
        for topic in &result.topics {
            for mcq in &topic.mcqs {
                assert_eq!(mcq.options.len(), 4);
            }
        }
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let result = parse_model_reply("");
        assert!(!result.valid);
        assert!(result.topics.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_answer_key_round_trip() {
        assert_eq!(AnswerKey::from_letter('C'), Some(AnswerKey::C));
        assert_eq!(AnswerKey::from_letter('x'), None);
        assert_eq!(AnswerKey::D.to_string(), "d");

        let json = serde_json::to_string(&AnswerKey::A).unwrap();
        assert_eq!(json, "\"a\"");
    }
}
