//! Gemini CLI wrapper.
//!
//! The upstream model is an opaque collaborator: prompt in, text out. This
//! module provides an async interface to the official `gemini` CLI,
//! handling process spawning, output unwrapping, and error
//! classification. Every failure mode surfaces as a [`GeminiError`]; the
//! pipeline treats them all as terminal upstream failures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Errors that can occur when interacting with the Gemini CLI
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini binary not found at '{0}'. Please ensure the gemini CLI is installed and accessible.")]
    BinaryNotFound(String),

    #[error("Failed to spawn Gemini process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("Gemini process failed with exit code {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Gemini returned an empty reply")]
    EmptyReply,

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Response from Gemini
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiResponse {
    /// Raw output from the CLI
    pub raw_output: String,

    /// Extracted text content
    pub text: String,

    /// Model used
    pub model: String,
}

/// Client for interacting with the Gemini CLI
pub struct GeminiClient {
    /// Path to the gemini binary
    binary_path: PathBuf,

    /// Model to use
    model: String,

    /// Timeout in seconds (0 = no timeout)
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a new GeminiClient
    pub fn new(binary_path: impl Into<PathBuf>, model: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            model: model.into(),
            timeout_secs: 300, // 5 minutes default
        }
    }

    /// Set the timeout in seconds
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the gemini binary is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Send a prompt and return the model's text reply
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn call_text(&self, prompt: &str) -> Result<GeminiResponse, GeminiError> {
        debug!("Calling Gemini CLI with model: {}", self.model);

        let mut cmd = Command::new(&self.binary_path);

        // Non-interactive mode with -p flag
        cmd.arg("-p").arg(prompt);
        cmd.arg("-m").arg(&self.model);

        // Request JSON output format for easier parsing
        cmd.arg("--output-format").arg("json");

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(self.timeout_secs),
                cmd.output(),
            )
            .await
            .map_err(|_| GeminiError::Timeout(self.timeout_secs))??
        } else {
            cmd.output().await?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!("Gemini CLI exit code: {:?}", output.status.code());

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);

            // Try to categorize the error
            if stderr.contains("authentication")
                || stderr.contains("auth")
                || stderr.contains("login")
            {
                return Err(GeminiError::AuthenticationError(stderr));
            }
            if stderr.contains("rate limit") || stderr.contains("quota") || stderr.contains("429") {
                return Err(GeminiError::RateLimitError(stderr));
            }

            return Err(GeminiError::ProcessFailed { exit_code, stderr });
        }

        let text = extract_text_from_gemini_json(stdout.trim());
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyReply);
        }

        Ok(GeminiResponse {
            raw_output: stdout,
            text,
            model: self.model.clone(),
        })
    }
}

/// Unwrap the Gemini CLI's JSON envelope; plain text passes through
fn extract_text_from_gemini_json(output: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(output) {
        // The gemini CLI JSON format typically has a "response" or "text" field
        for field in ["response", "text", "content", "output"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
        if let Some(text) = value.as_str() {
            return text.to_string();
        }
        return value.to_string();
    }

    output.to_string()
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new("gemini", "gemini-2.5-flash")
    }
}
