//! Evaluation: one reasoning call per candidate, repaired into the fixed
//! `EvaluationResult` schema.
//!
//! `evaluate` is total: transport failures and unusable replies become a
//! fallback result with score 0 and `EvaluationStatus::Failed`. Callers that
//! need the typed failure use `try_evaluate`.

pub mod prompts;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::evaluation::prompts::{
    evaluation_system, fill_template, CANDIDATE_PROMPT_BUDGET, EVALUATION_PROMPT_TEMPLATE,
};
use crate::evaluation::schema::{parse_response, SchemaError};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{LlmError, Reasoner};
use crate::models::job::truncate_chars;
use crate::models::{CandidateDocument, EvaluationResult, JobDescription};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("evaluator unavailable: {0}")]
    Llm(#[from] LlmError),

    #[error("evaluator returned an empty response")]
    EmptyResponse,

    #[error("evaluator response unusable: {0}")]
    Malformed(#[from] SchemaError),
}

pub struct EvaluationService {
    reasoner: Arc<dyn Reasoner>,
    system: String,
}

impl EvaluationService {
    pub fn new(reasoner: Arc<dyn Reasoner>) -> Self {
        Self {
            reasoner,
            system: evaluation_system(),
        }
    }

    /// Evaluates one candidate. Never fails; see module docs.
    pub async fn evaluate(&self, job: &JobDescription, doc: &CandidateDocument) -> EvaluationResult {
        match self.try_evaluate(job, doc).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Evaluation failed for {}: {e}", doc.name());
                EvaluationResult::fallback(doc.name(), e.to_string())
            }
        }
    }

    /// Exactly one reasoning call; no retries at this layer.
    pub async fn try_evaluate(
        &self,
        job: &JobDescription,
        doc: &CandidateDocument,
    ) -> Result<EvaluationResult, EvaluationError> {
        let prompt = build_evaluation_prompt(job, doc);
        let raw = self.reasoner.complete(&prompt, &self.system).await?;
        if raw.trim().is_empty() {
            return Err(EvaluationError::EmptyResponse);
        }
        let result = parse_response(doc.name(), &raw)?;
        debug!("Evaluated {}: score={}", doc.name(), result.score);
        Ok(result)
    }
}

pub fn build_evaluation_prompt(job: &JobDescription, doc: &CandidateDocument) -> String {
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("jd_text", job.capped_text()),
            ("filename", doc.name()),
            ("cv_text", truncate_chars(doc.text(), CANDIDATE_PROMPT_BUDGET)),
        ],
    )
}
