use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{SkippedEntry, Upload};
use crate::models::candidate::CANDIDATE_TEXT_BUDGET;
use crate::models::job::truncate_chars;
use crate::models::{EvaluationResult, JobDescription, JobSource};
use crate::report::ATTACHMENT_NAME;
use crate::screening::{run_screening, DeliveryStatus, ScreeningRequest};
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub job_title: String,
    pub total: usize,
    pub best: Option<EvaluationResult>,
    pub results: Vec<EvaluationResult>,
    pub skipped: Vec<SkippedEntry>,
    pub delivery: Option<DeliveryStatus>,
}

/// Raw multipart fields before the job description is resolved.
#[derive(Default)]
struct ScreeningForm {
    job_text: Option<String>,
    job_file: Option<Upload>,
    candidates: Vec<Upload>,
    recipient: Option<String>,
}

/// POST /api/v1/screenings
pub async fn handle_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let request = build_request(&state, multipart, true).await?;
    let outcome = run_screening(&state, request).await?;

    Ok(Json(ScreeningResponse {
        run_id: outcome.run_id,
        job_title: outcome.report.job_title().to_string(),
        total: outcome.report.len(),
        best: outcome.report.best().cloned(),
        results: outcome.report.results().to_vec(),
        skipped: outcome.skipped,
        delivery: outcome.delivery,
    }))
}

/// POST /api/v1/screenings/export
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let request = build_request(&state, multipart, false).await?;
    let outcome = run_screening(&state, request).await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ATTACHMENT_NAME}\""),
            ),
        ],
        outcome.rendered.spreadsheet,
    ))
}

async fn build_request(
    state: &AppState,
    multipart: Multipart,
    with_delivery: bool,
) -> Result<ScreeningRequest, AppError> {
    let form = read_form(multipart).await?;

    if form.candidates.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one CV.".to_string(),
        ));
    }

    let job = resolve_job(state, form.job_text, form.job_file).await?;

    let recipient = if with_delivery {
        form.recipient
            .or_else(|| state.config.default_report_recipient.clone())
    } else {
        None
    };

    Ok(ScreeningRequest {
        job,
        uploads: form.candidates,
        recipient,
    })
}

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field '{field_name}': {e}")))?;

        match field_name.as_str() {
            "job_text" => form.job_text = non_blank(String::from_utf8_lossy(&bytes).into_owned()),
            "recipient" => form.recipient = non_blank(String::from_utf8_lossy(&bytes).into_owned()),
            "job_file" => {
                let name = file_name.unwrap_or_else(|| "job_description.txt".to_string());
                form.job_file = Some(Upload::new(name, bytes));
            }
            "candidates" => {
                let name = file_name.unwrap_or_else(|| format!("candidate_{}", form.candidates.len() + 1));
                form.candidates.push(Upload::new(name, bytes));
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    Ok(form)
}

/// Pasted text wins over an uploaded file.
async fn resolve_job(
    state: &AppState,
    job_text: Option<String>,
    job_file: Option<Upload>,
) -> Result<JobDescription, AppError> {
    if let Some(text) = job_text {
        return Ok(JobDescription::new(text, JobSource::Pasted));
    }

    let Some(upload) = job_file else {
        return Err(AppError::Validation(
            "Please provide a Job Description.".to_string(),
        ));
    };

    let ingestor = state.ingestor.clone();
    let name = upload.name.clone();
    let text = tokio::task::spawn_blocking(move || {
        ingestor.try_extract_text(&upload.name, &upload.bytes)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Job extraction task failed: {e}")))?
    .map_err(|e| AppError::Validation(format!("Could not read job description '{name}': {e}")))?;

    let job = JobDescription::new(
        truncate_chars(&text, CANDIDATE_TEXT_BUDGET),
        JobSource::Uploaded,
    );
    if job.is_blank() {
        return Err(AppError::Validation(format!(
            "Job description '{name}' contains no text."
        )));
    }
    Ok(job)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
