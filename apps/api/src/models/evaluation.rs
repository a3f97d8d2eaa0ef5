use serde::{Deserialize, Serialize};

/// Default for contact fields the evaluator could not find.
pub const UNKNOWN: &str = "unknown";

/// Maximum entries kept in the verification kit and behavioral question list.
pub const MAX_KIT_ENTRIES: usize = 3;
pub const MAX_BEHAVIORAL_QUESTIONS: usize = 3;

/// A closed-ended fact-check question whose answer is stated in the CV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationItem {
    pub question: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub location: String,
}

impl Default for ContactDetails {
    fn default() -> Self {
        Self {
            email: UNKNOWN.to_string(),
            phone: UNKNOWN.to_string(),
            linkedin: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
        }
    }
}

/// Whether the score came from the evaluator or from the failure fallback.
/// Lets callers tell a genuine 0 apart from a failed evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EvaluationStatus {
    #[default]
    Scored,
    Failed {
        reason: String,
    },
}

/// Fixed-shape verdict for one candidate. Every optional field has a documented
/// default so downstream code never deals with a missing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub name: String,
    /// 0 – 100
    pub score: u8,
    pub summary: String,
    pub strengths: String,
    pub red_flags: String,
    pub verification_kit: Vec<VerificationItem>,
    pub behavioral_questions: Vec<String>,
    pub contact: ContactDetails,
    pub manager_blurb: String,
    pub outreach_email: String,
    /// Profile with name, contact details and employer/school names redacted.
    pub blind_summary: String,
    pub status: EvaluationStatus,
}

impl EvaluationResult {
    /// A result with every field at its default, attributed to `name`.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            summary: String::new(),
            strengths: String::new(),
            red_flags: String::new(),
            verification_kit: Vec::new(),
            behavioral_questions: Vec::new(),
            contact: ContactDetails::default(),
            manager_blurb: String::new(),
            outreach_email: String::new(),
            blind_summary: String::new(),
            status: EvaluationStatus::Scored,
        }
    }

    /// The record substituted when evaluation fails: score 0, diagnostic summary.
    pub fn fallback(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            summary: format!("Error: {reason}"),
            status: EvaluationStatus::Failed { reason },
            ..Self::empty(name)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, EvaluationStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_zero_score_and_diagnostic_summary() {
        let r = EvaluationResult::fallback("cv.pdf", "connection refused");
        assert_eq!(r.score, 0);
        assert_eq!(r.summary, "Error: connection refused");
        assert!(r.is_failed());
        assert_eq!(r.contact, ContactDetails::default());
        assert!(r.verification_kit.is_empty());
    }

    #[test]
    fn test_empty_result_is_scored_with_unknown_contacts() {
        let r = EvaluationResult::empty("cv.pdf");
        assert!(!r.is_failed());
        assert_eq!(r.contact.email, UNKNOWN);
        assert_eq!(r.contact.location, UNKNOWN);
    }

    #[test]
    fn test_status_serializes_with_state_tag() {
        let json = serde_json::to_value(EvaluationStatus::Failed {
            reason: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["reason"], "timeout");

        let json = serde_json::to_value(EvaluationStatus::Scored).unwrap();
        assert_eq!(json["state"], "scored");
    }
}
