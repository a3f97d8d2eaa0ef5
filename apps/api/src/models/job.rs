use serde::{Deserialize, Serialize};

/// Maximum job-description characters embedded in an evaluation prompt.
pub const JOB_TEXT_BUDGET: usize = 3000;

const TITLE_MAX_CHARS: usize = 80;
const FALLBACK_TITLE: &str = "Job Analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    Pasted,
    Uploaded,
}

/// The role requirements a batch is ranked against. Immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    text: String,
    source: JobSource,
}

impl JobDescription {
    pub fn new(text: impl Into<String>, source: JobSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    pub fn source(&self) -> JobSource {
        self.source
    }

    /// Job text capped at `JOB_TEXT_BUDGET` characters for prompt embedding.
    pub fn capped_text(&self) -> &str {
        truncate_chars(&self.text, JOB_TEXT_BUDGET)
    }

    /// First non-blank line, used in report subjects and headings.
    pub fn title(&self) -> String {
        self.text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(|l| truncate_chars(l, TITLE_MAX_CHARS).trim_end().to_string())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Returns the longest prefix of `text` with at most `max_chars` characters.
/// Never splits a UTF-8 code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_first_non_blank_line() {
        let job = JobDescription::new(
            "\n   \n  Backend engineer, Python, AWS required  \nMore details",
            JobSource::Pasted,
        );
        assert_eq!(job.title(), "Backend engineer, Python, AWS required");
    }

    #[test]
    fn test_source_is_kept() {
        let job = JobDescription::new("Role", JobSource::Uploaded);
        assert_eq!(job.source(), JobSource::Uploaded);
    }

    #[test]
    fn test_title_falls_back_when_blank() {
        let job = JobDescription::new("  \n ", JobSource::Uploaded);
        assert_eq!(job.title(), "Job Analysis");
        assert!(job.is_blank());
    }

    #[test]
    fn test_title_is_capped() {
        let job = JobDescription::new("x".repeat(200), JobSource::Pasted);
        assert_eq!(job.title().chars().count(), 80);
    }

    #[test]
    fn test_capped_text_respects_budget() {
        let job = JobDescription::new("é".repeat(5000), JobSource::Pasted);
        assert_eq!(job.capped_text().chars().count(), JOB_TEXT_BUDGET);
    }

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abcd", 3), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }
}
