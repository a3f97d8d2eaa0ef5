//! Schema adapter: repairs a loosely-typed evaluator reply into the fixed
//! `EvaluationResult` shape.
//!
//! The only hard requirement is that the reply is a JSON object. Every key is
//! then read with an explicit default, so a partially-populated reply never
//! produces a missing-field failure downstream.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::evaluation::{
    ContactDetails, VerificationItem, MAX_BEHAVIORAL_QUESTIONS, MAX_KIT_ENTRIES, UNKNOWN,
};
use crate::models::{EvaluationResult, EvaluationStatus};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is JSON but not an object (found {0})")]
    NotAnObject(&'static str),
}

/// Parses a raw evaluator reply for the candidate `name`.
pub fn parse_response(name: &str, raw: &str) -> Result<EvaluationResult, SchemaError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;
    let obj = match value {
        Value::Object(obj) => obj,
        other => return Err(SchemaError::NotAnObject(json_kind(&other))),
    };

    Ok(EvaluationResult {
        name: name.to_string(),
        score: read_score(obj.get("score")),
        summary: read_text(&obj, "summary"),
        strengths: read_text(&obj, "strengths"),
        red_flags: read_text(&obj, "red_flags"),
        verification_kit: read_kit(obj.get("verification_kit")),
        behavioral_questions: read_questions(obj.get("behavioral_questions")),
        contact: ContactDetails {
            email: read_contact(&obj, "email"),
            phone: read_contact(&obj, "phone"),
            linkedin: read_contact(&obj, "linkedin"),
            location: read_contact(&obj, "location"),
        },
        manager_blurb: read_text(&obj, "manager_blurb"),
        outreach_email: read_text(&obj, "outreach_email"),
        blind_summary: read_text(&obj, "blind_summary"),
        status: EvaluationStatus::Scored,
    })
}

/// Integer, float (rounded) or numeric string; clamped to 0 – 100.
fn read_score(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(score) if score.is_finite() => score.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// Strings are trimmed; string arrays are joined with "; ".
fn read_text(obj: &Map<String, Value>, key: &str) -> String {
    value_to_text(obj.get(key))
}

fn value_to_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| value_to_text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

fn read_contact(obj: &Map<String, Value>, key: &str) -> String {
    let text = read_text(obj, key);
    if text.is_empty() {
        UNKNOWN.to_string()
    } else {
        text
    }
}

fn read_kit(value: Option<&Value>) -> Vec<VerificationItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let question = value_to_text(item.get("question"));
            if question.is_empty() {
                return None;
            }
            let expected_answer =
                value_to_text(item.get("expected_answer").or_else(|| item.get("answer")));
            Some(VerificationItem {
                question,
                expected_answer,
            })
        })
        .take(MAX_KIT_ENTRIES)
        .collect()
}

fn read_questions(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(|i| value_to_text(Some(i))).collect(),
        Some(Value::String(s)) => vec![s.trim().to_string()],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter(|q| !q.is_empty())
        .take(MAX_BEHAVIORAL_QUESTIONS)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
