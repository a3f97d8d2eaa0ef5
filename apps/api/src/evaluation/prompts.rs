// All LLM prompt constants for the Evaluation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Maximum candidate characters embedded in one evaluation prompt.
pub const CANDIDATE_PROMPT_BUDGET: usize = 3000;

pub const EVALUATION_SYSTEM_ROLE: &str = "You are a Senior Technical Recruiter. \
    You evaluate one candidate CV against one job description, strictly and fairly.";

/// System prompt for candidate evaluation.
pub fn evaluation_system() -> String {
    format!("{EVALUATION_SYSTEM_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Candidate evaluation prompt. Fill `{jd_text}`, `{filename}`, `{cv_text}`
/// and `{grounding_instruction}` with `fill_template` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this candidate for the role below.

JOB DESCRIPTION:
{jd_text}

CANDIDATE CV TEXT ({filename}):
{cv_text}

{grounding_instruction}

TASKS:
1. score: integer 0-100, based on strict match against the stated requirements.
2. summary: 2 sentences on who the candidate is.
3. strengths: top 3 strengths relative to THIS job.
4. red_flags: missing required skills, job hopping, or lack of specific experience the job asks for.
5. verification_kit: exactly 3 closed-ended fact-check questions a screener can ask on a call.
   Each expected_answer MUST be a fact stated in the CV text above.
6. behavioral_questions: exactly 3 open behavioral interview questions targeting this candidate's gaps.
7. email, phone, linkedin, location: copy from the CV, or "unknown" if absent.
8. manager_blurb: 2-3 sentences pitching the candidate to the hiring manager.
9. outreach_email: a short, friendly first-contact email to the candidate about this role.
10. blind_summary: the candidate's profile with name, contact details, employer names and school names redacted.

Return a JSON object with EXACTLY these keys:
{
  "score": 0,
  "summary": "string",
  "strengths": "string",
  "red_flags": "string",
  "verification_kit": [
    {"question": "string", "expected_answer": "string"}
  ],
  "behavioral_questions": ["string"],
  "email": "string",
  "phone": "string",
  "linkedin": "string",
  "location": "string",
  "manager_blurb": "string",
  "outreach_email": "string",
  "blind_summary": "string"
}"#;

/// Substitutes `{key}` placeholders in one left-to-right pass. Inserted values
/// are never rescanned, so braces inside job or CV text stay literal. Braces
/// that do not name a known key are copied through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        let filled = fill_template(r#"{"score": 0} for {name}"#, &[("name", "Ada")]);
        assert_eq!(filled, r#"{"score": 0} for Ada"#);
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template("{a}|{b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(filled, "{b}|x");
    }
}
