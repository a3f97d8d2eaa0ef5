// Screening runs: ingest -> rank -> render -> (optionally) deliver.
// The HTTP handlers only translate multipart input into a `ScreeningRequest`
// and the outcome into JSON or a spreadsheet download.

pub mod handlers;

use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{SkippedEntry, Upload};
use crate::models::JobDescription;
use crate::ranking::RankedReport;
use crate::report::{RenderedReport, ReportExporter};
use crate::state::AppState;

pub struct ScreeningRequest {
    pub job: JobDescription,
    pub uploads: Vec<Upload>,
    /// Where to email the report; `None` skips delivery.
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryStatus {
    pub recipient: String,
    pub delivered: bool,
}

pub struct ScreeningOutcome {
    pub run_id: Uuid,
    pub report: RankedReport,
    pub rendered: RenderedReport,
    pub skipped: Vec<SkippedEntry>,
    pub delivery: Option<DeliveryStatus>,
}

pub async fn run_screening(
    state: &AppState,
    request: ScreeningRequest,
) -> Result<ScreeningOutcome, AppError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("screening", %run_id);
    run(state, request, run_id).instrument(span).await
}

async fn run(
    state: &AppState,
    request: ScreeningRequest,
    run_id: Uuid,
) -> Result<ScreeningOutcome, AppError> {
    let ScreeningRequest {
        job,
        uploads,
        recipient,
    } = request;

    info!(
        "Screening {} uploads for '{}' ({:?} job description)",
        uploads.len(),
        job.title(),
        job.source()
    );

    let ingestor = state.ingestor.clone();
    let ingested = tokio::task::spawn_blocking(move || ingestor.ingest(&uploads))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Ingestion task failed: {e}")))?;

    let report = state
        .ranking
        .rank(&job, ingested.documents, |done, total| {
            info!("Evaluated {done}/{total} candidates");
        })
        .await;

    let rendered = ReportExporter::render(&report)?;

    let delivery = match recipient {
        Some(recipient) => {
            let delivered = state
                .exporter
                .deliver(
                    &recipient,
                    &ReportExporter::subject(&report),
                    &rendered.html_digest,
                    &rendered.spreadsheet,
                )
                .await;
            Some(DeliveryStatus {
                recipient,
                delivered,
            })
        }
        None => None,
    };

    Ok(ScreeningOutcome {
        run_id,
        report,
        rendered,
        skipped: ingested.skipped,
        delivery,
    })
}
