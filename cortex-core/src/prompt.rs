//! Adaptive prompt construction.
//!
//! Each difficulty tier gets a fixed instruction template. The templates
//! all demand the same output markers (`**Topic: ...**` headers, `- `
//! bullets, `Q:`/`a)`-`d)`/`Correct:` blocks); the parser in
//! [`crate::parse`] depends on exactly this contract, so changes here and
//! there must move together.

use crate::tier::DifficultyTier;

const BASIC_PROMPT: &str = r#"
Create a comprehensive study guide for BEGINNER learners. For each topic:

1. Start with: **Topic: [Clear Topic Name]**
2. Provide 4-5 detailed bullet points (start with "- "):
   - Fundamental concept explanation with examples
   - Step-by-step breakdown of key processes
   - Real-world applications and analogies
   - Common misconceptions to avoid
   - Practice tips for better understanding
3. Add 2 EASY MCQs that:
   - Focus on basic definitions and concepts
   - Have clear, straightforward correct answers
   - Test fundamental understanding
   - Avoid complex scenarios or edge cases

Format for questions:
Q: [Simple, direct question about basic concepts]
a) Clearly wrong option
b) Plausible but incorrect basic option
c) Correct answer (straightforward and clear)
d) Obviously incorrect option
Correct: c

Make explanations detailed and beginner-friendly with lots of context.
"#;

const INTERMEDIATE_PROMPT: &str = r#"
Create a balanced study guide for INTERMEDIATE learners. For each topic:

1. Start with: **Topic: [Clear Topic Name]**
2. Provide 3-4 focused bullet points (start with "- "):
   - Core concept with practical context
   - Important technical details and relationships
   - Application scenarios and use cases
   - Integration with other concepts
3. Add 2 MEDIUM-level MCQs that:
   - Test understanding of relationships between concepts
   - Include scenario-based questions
   - Have plausible distractors requiring analysis
   - Test both theoretical and practical knowledge

Format for questions:
Q: [Scenario-based or analytical question]
a) Plausible option requiring analysis to reject
b) Correct answer (requires understanding of concepts)
c) Technically sophisticated but incorrect option
d) Reasonable alternative that misses key details
Correct: b

Balance detail with conciseness, assuming some prior knowledge.
"#;

const ADVANCED_PROMPT: &str = r#"
Create a concise study guide for ADVANCED learners. For each topic:

1. Start with: **Topic: [Clear Topic Name]**
2. Provide 3 precise bullet points (start with "- "):
   - Advanced concept with technical precision
   - Complex relationships and edge cases
   - Advanced applications and optimizations
3. Add 2 CHALLENGING MCQs that:
   - Test deep understanding and edge cases
   - Include complex scenarios requiring expert judgment
   - Have sophisticated distractors that seem correct
   - Test ability to apply concepts in novel situations

Format for questions:
Q: [Complex, multi-layered question testing expert knowledge]
a) Sophisticated option that's subtly incorrect
b) Technically sound but incomplete solution
c) Correct answer (requires deep understanding)
d) Advanced-sounding but flawed reasoning
Correct: c

Keep explanations concise but technically precise, assuming strong foundational knowledge.
"#;

/// Instruction template for a tier. Pure function of the tier.
pub fn study_guide_prompt(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Basic => BASIC_PROMPT,
        DifficultyTier::Intermediate => INTERMEDIATE_PROMPT,
        DifficultyTier::Advanced => ADVANCED_PROMPT,
    }
}

/// Assemble the full prompt: tier instructions followed by the (already
/// normalized and truncated) content to analyze.
pub fn build_prompt(tier: DifficultyTier, content: &str) -> String {
    format!(
        "{}\n\nContent to analyze:\n{}\n",
        study_guide_prompt(tier).trim(),
        content
    )
}

/// Truncate content to a character budget, respecting char boundaries.
pub fn truncate_content(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
