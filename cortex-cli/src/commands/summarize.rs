//! `cortex summarize` command - Summarize a PDF at a difficulty tier

use anyhow::{bail, Result};
use cortex_core::summarize::summarize;
use cortex_core::tier::DifficultyTier;
use cortex_core::{pdf, Config, GeminiClient};
use std::path::PathBuf;
use tracing::info;

pub async fn run(config: Config, pdf_path: PathBuf, level: String) -> Result<()> {
    if !pdf_path.exists() {
        bail!("File not found: {}", pdf_path.display());
    }

    let tier = DifficultyTier::parse_or_default(&level);

    info!("Extracting text from {}", pdf_path.display());
    let raw_text = pdf::extract_text(&pdf_path)?;

    let client = GeminiClient::new(&config.gemini.binary, &config.gemini.model)
        .with_timeout(config.gemini.timeout_secs);

    let summary = summarize(&client, &raw_text, tier).await?;

    println!("{}", summary.summary);
    Ok(())
}
