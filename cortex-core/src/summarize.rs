//! Level-adaptive PDF summarization.
//!
//! Long documents are summarized chunk by chunk: each tier gets its own
//! chunk size, chunk cap, and prompt style, and every chunk after the
//! first carries a continuation preamble so the pieces read as one
//! summary. Chunk replies are joined with blank lines.

use crate::gemini::{GeminiClient, GeminiError};
use crate::normalize::clean_text;
use crate::study::MIN_CONTENT_CHARS;
use crate::tier::DifficultyTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;

/// Errors that can occur while summarizing
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summary generation failed: {0}")]
    Upstream(#[from] GeminiError),

    #[error("No valid content found")]
    EmptyContent,
}

/// Per-tier chunking plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySettings {
    /// Characters per chunk
    pub chunk_chars: usize,
    /// At most this many chunks are summarized
    pub max_chunks: usize,
}

impl SummarySettings {
    pub fn for_tier(tier: DifficultyTier) -> Self {
        match tier {
            DifficultyTier::Basic => Self {
                chunk_chars: 6_000,
                max_chunks: 3,
            },
            DifficultyTier::Intermediate => Self {
                chunk_chars: 8_000,
                max_chunks: 5,
            },
            DifficultyTier::Advanced => Self {
                chunk_chars: 10_000,
                max_chunks: 8,
            },
        }
    }
}

/// A finished document summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub summary: String,
    pub user_level: DifficultyTier,
    pub chunks_processed: usize,
}

const BASIC_SUMMARY_PROMPT: &str = r#"
Create a **simple, easy-to-understand summary** of the following text:
- Use **plain language** and avoid technical jargon
- Explain concepts in **simple terms** that anyone can understand
- Keep explanations **concise and clear**
- Use **analogies and everyday examples** when explaining complex ideas
- Focus on **main points and key takeaways**
- Structure with clear headings and bullet points where helpful
"#;

const INTERMEDIATE_SUMMARY_PROMPT: &str = r#"
Create a **balanced, moderately detailed explanation** of the following text:
- Provide **good depth** without overwhelming complexity
- Include **some technical terms** with brief explanations
- Use **relevant examples** and practical applications
- Cover **important details** while maintaining readability
- Balance between **simplicity and thoroughness**
- Include **context and background** where relevant
"#;

const ADVANCED_SUMMARY_PROMPT: &str = r#"
Create a **comprehensive, detailed analysis** of the following text:
- Provide **in-depth technical explanations** and analysis
- Include **advanced concepts, formulas, and methodologies**
- Use **professional terminology** and domain-specific language
- Explore **complex relationships and implications**
- Include **detailed case studies, examples, and applications**
- Provide **critical analysis and multiple perspectives**
- Reference **theoretical frameworks** and research where applicable
"#;

fn summary_template(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Basic => BASIC_SUMMARY_PROMPT,
        DifficultyTier::Intermediate => INTERMEDIATE_SUMMARY_PROMPT,
        DifficultyTier::Advanced => ADVANCED_SUMMARY_PROMPT,
    }
}

/// Prompt for one chunk. Chunks after the first are told to continue
/// seamlessly so the joined summary reads as a single document.
pub fn chunk_prompt(
    chunk: &str,
    tier: DifficultyTier,
    current_chunk: usize,
    total_chunks: usize,
) -> String {
    let continuation = if current_chunk > 1 {
        format!(
            "This is part {current_chunk} of {total_chunks}. \
             Continue seamlessly from previous parts.\n\n"
        )
    } else {
        String::new()
    };

    format!(
        "{}{}\n\nText:\n{}\n",
        continuation,
        summary_template(tier).trim(),
        chunk
    )
}

/// Split text into at most `max_chunks` pieces of roughly `chunk_chars`
/// characters each, never splitting inside a char.
pub fn split_chunks(text: &str, settings: SummarySettings) -> Vec<&str> {
    let total_chars = text.chars().count();
    let num_chunks = (total_chars / settings.chunk_chars + 1).min(settings.max_chunks);

    let mut chunks = Vec::with_capacity(num_chunks);
    let mut rest = text;
    for _ in 0..num_chunks {
        if rest.is_empty() {
            break;
        }
        let split_at = rest
            .char_indices()
            .nth(settings.chunk_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(split_at);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Summarize raw extracted text at the given tier.
pub async fn summarize(
    client: &GeminiClient,
    raw_text: &str,
    tier: DifficultyTier,
) -> Result<Summary, SummaryError> {
    let cleaned = clean_text(raw_text);
    if cleaned.len() < MIN_CONTENT_CHARS {
        return Err(SummaryError::EmptyContent);
    }

    let settings = SummarySettings::for_tier(tier);
    let chunks = split_chunks(&cleaned, settings);
    let total = chunks.len();
    info!("Summarizing {} chunks at {} tier", total, tier);

    let mut parts = Vec::with_capacity(total);
    for (idx, chunk) in chunks.into_iter().enumerate() {
        let prompt = chunk_prompt(chunk, tier, idx + 1, total);
        debug!("Summarizing chunk {}/{}", idx + 1, total);
        let response = client.call_text(&prompt).await?;
        parts.push(response.text);
    }

    Ok(Summary {
        summary: parts.join("\n\n"),
        user_level: tier,
        chunks_processed: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_scale_with_tier() {
        let basic = SummarySettings::for_tier(DifficultyTier::Basic);
        let advanced = SummarySettings::for_tier(DifficultyTier::Advanced);
        assert_eq!(basic.chunk_chars, 6_000);
        assert_eq!(basic.max_chunks, 3);
        assert_eq!(advanced.chunk_chars, 10_000);
        assert_eq!(advanced.max_chunks, 8);
        assert!(advanced.chunk_chars > basic.chunk_chars);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let settings = SummarySettings::for_tier(DifficultyTier::Basic);
        let chunks = split_chunks("short text", settings);
        assert_eq!(chunks, vec!["short text"]);
    }

    #[test]
    fn test_long_text_is_capped_at_max_chunks() {
        let settings = SummarySettings::for_tier(DifficultyTier::Basic);
        let text = "x".repeat(settings.chunk_chars * 10);
        let chunks = split_chunks(&text, settings);

        assert_eq!(chunks.len(), settings.max_chunks);
        for chunk in &chunks {
            assert_eq!(chunk.len(), settings.chunk_chars);
        }
    }

    #[test]
    fn test_chunks_partition_covered_text() {
        let settings = SummarySettings {
            chunk_chars: 7,
            max_chunks: 4,
        };
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = split_chunks(text, settings);

        let rejoined: String = chunks.concat();
        assert!(text.starts_with(&rejoined));
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_chunking_respects_char_boundaries() {
        let settings = SummarySettings {
            chunk_chars: 2,
            max_chunks: 3,
        };
        // Multi-byte chars must not be split mid-encoding
        let chunks = split_chunks("héllö", settings);
        assert_eq!(chunks, vec!["hé", "ll", "ö"]);
    }

    #[test]
    fn test_first_chunk_has_no_continuation_preamble() {
        let prompt = chunk_prompt("some text", DifficultyTier::Basic, 1, 3);
        assert!(!prompt.contains("Continue seamlessly"));
        assert!(prompt.contains("plain language"));
        assert!(prompt.ends_with("Text:\nsome text\n"));
    }

    #[test]
    fn test_later_chunks_carry_continuation_preamble() {
        let prompt = chunk_prompt("more text", DifficultyTier::Advanced, 2, 3);
        assert!(prompt.starts_with("This is part 2 of 3."));
        assert!(prompt.contains("Continue seamlessly"));
        assert!(prompt.contains("professional terminology"));
    }

    #[test]
    fn test_prompt_style_varies_by_tier() {
        let basic = chunk_prompt("t", DifficultyTier::Basic, 1, 1);
        let intermediate = chunk_prompt("t", DifficultyTier::Intermediate, 1, 1);
        let advanced = chunk_prompt("t", DifficultyTier::Advanced, 1, 1);
        assert!(basic.contains("easy-to-understand summary"));
        assert!(intermediate.contains("moderately detailed explanation"));
        assert!(advanced.contains("comprehensive, detailed analysis"));
    }
}
