//! `cortex quiz` command - Generate a quiz from raw text

use anyhow::{bail, Result};
use cortex_core::study::generate_quiz;
use cortex_core::tier::DifficultyTier;
use cortex_core::{pdf, Config, GeminiClient};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{debug, info};

/// Read text from stdin if available
fn read_stdin() -> Option<String> {
    if atty::is(atty::Stream::Stdin) {
        // Stdin is a terminal, not piped
        None
    } else {
        let stdin = io::stdin();
        let lines: Vec<String> = stdin.lock().lines().map_while(Result::ok).collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

pub async fn run(
    config: Config,
    text: Option<String>,
    pdf_path: Option<PathBuf>,
    num_questions: usize,
    level: String,
) -> Result<()> {
    let text = match (text, pdf_path) {
        (Some(t), _) => t,
        (None, Some(path)) => {
            if !path.exists() {
                bail!("File not found: {}", path.display());
            }
            info!("Extracting text from {}", path.display());
            pdf::extract_text(&path)?
        }
        (None, None) => match read_stdin() {
            Some(t) => t,
            None => {
                bail!("No text provided. Usage: cortex quiz \"your text\", cortex quiz --pdf notes.pdf, or cat notes.txt | cortex quiz");
            }
        },
    };

    if !(1..=20).contains(&num_questions) {
        bail!("num_questions must be between 1 and 20");
    }

    let tier = DifficultyTier::parse_or_default(&level);
    debug!("Quiz input: {} chars at {} tier", text.len(), tier);

    let client = GeminiClient::new(&config.gemini.binary, &config.gemini.model)
        .with_timeout(config.gemini.timeout_secs);

    let quiz = generate_quiz(
        &client,
        &text,
        num_questions,
        tier,
        config.limits.max_content_chars,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&quiz)?);
    Ok(())
}
