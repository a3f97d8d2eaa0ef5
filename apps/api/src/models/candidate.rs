use serde::{Deserialize, Serialize};

use crate::models::job::truncate_chars;

/// Maximum characters kept per candidate document.
pub const CANDIDATE_TEXT_BUDGET: usize = 4000;

/// One resume reduced to plain text. `text` never exceeds `CANDIDATE_TEXT_BUDGET`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDocument {
    name: String,
    text: String,
}

impl CandidateDocument {
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            text: truncate_chars(text, CANDIDATE_TEXT_BUDGET).to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
