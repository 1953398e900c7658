//! Text normalization for extracted PDF content.
//!
//! PDF extractors leave page-footer artifacts behind; this strips them
//! before the text is handed to the prompt builder.

use regex::Regex;

/// Remove footer artifacts (`=====...=====` runs and literal `Page N`
/// markers), trim every line, and drop blank lines. Line order is
/// preserved; empty input yields empty output.
pub fn clean_text(raw: &str) -> String {
    let artifacts = Regex::new(r"=====.*=====|Page \d+").unwrap();
    let cleaned = artifacts.replace_all(raw, "");

    cleaned
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_page_markers() {
        let raw = "Intro text\nPage 1\nMore text\nPage 23\nEnd";
        assert_eq!(clean_text(raw), "Intro text\nMore text\nEnd");
    }

    #[test]
    fn test_strips_footer_runs() {
        let raw = "Before\n===== Lecture Notes =====\nAfter";
        assert_eq!(clean_text(raw), "Before\nAfter");
    }

    #[test]
    fn test_trims_and_drops_blank_lines() {
        let raw = "  spaced  \n\n\n  more  \n";
        assert_eq!(clean_text(raw), "spaced\nmore");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\n\n  \n"), "");
    }

    #[test]
    fn test_preserves_line_order() {
        let raw = "one\ntwo\nthree";
        assert_eq!(clean_text(raw), "one\ntwo\nthree");
    }
}
