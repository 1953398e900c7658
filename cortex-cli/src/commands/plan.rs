//! `cortex plan` command - Generate a study plan from a PDF

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use cortex_core::study::generate_study_plan;
use cortex_core::tier::DifficultyTier;
use cortex_core::{pdf, Config, GeminiClient};
use std::path::PathBuf;
use tracing::info;

/// Resolve the schedule start time: "HH:MM" today, or now
fn resolve_start(start: Option<&str>) -> Result<DateTime<Local>> {
    match start {
        None => Ok(Local::now()),
        Some(raw) => {
            let time = NaiveTime::parse_from_str(raw, "%H:%M")
                .with_context(|| format!("Invalid start time '{raw}', expected HH:MM"))?;
            let today = Local::now().date_naive();
            Local
                .from_local_datetime(&today.and_time(time))
                .single()
                .with_context(|| format!("Ambiguous local time '{raw}'"))
        }
    }
}

pub async fn run(
    config: Config,
    pdf_path: PathBuf,
    level: String,
    start: Option<String>,
) -> Result<()> {
    if !pdf_path.exists() {
        bail!("File not found: {}", pdf_path.display());
    }

    let tier = DifficultyTier::parse_or_default(&level);
    let start_time = resolve_start(start.as_deref())?;

    info!("Extracting text from {}", pdf_path.display());
    let raw_text = pdf::extract_text(&pdf_path)?;

    let client = GeminiClient::new(&config.gemini.binary, &config.gemini.model)
        .with_timeout(config.gemini.timeout_secs);

    let plan = generate_study_plan(
        &client,
        &raw_text,
        tier,
        start_time,
        config.limits.max_content_chars,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_resolve_start_defaults_to_now() {
        assert!(resolve_start(None).is_ok());
    }

    #[test]
    fn test_resolve_start_parses_clock_time() {
        let start = resolve_start(Some("09:30")).unwrap();
        assert_eq!(start.hour(), 9);
        assert_eq!(start.minute(), 30);
    }

    #[test]
    fn test_resolve_start_rejects_garbage() {
        assert!(resolve_start(Some("half past nine")).is_err());
        assert!(resolve_start(Some("25:00")).is_err());
    }
}
