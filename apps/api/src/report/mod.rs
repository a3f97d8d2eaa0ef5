// Reporting: spreadsheet export, HTML digest and email delivery.
// Delivery failures never touch the ranked report; they surface as `false`.

pub mod digest;
pub mod mailer;
pub mod spreadsheet;

use std::sync::Arc;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;
use tracing::{info, warn};

use crate::ranking::RankedReport;
use crate::report::mailer::{DeliveryError, MailTransport, OutgoingReport};

pub const ATTACHMENT_NAME: &str = "Ranking.xlsx";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet rendering failed: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// Both renderings of one ranked report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub spreadsheet: Vec<u8>,
    pub html_digest: String,
}

pub struct ReportExporter {
    transport: Arc<dyn MailTransport>,
}

impl ReportExporter {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub fn render(report: &RankedReport) -> Result<RenderedReport, ExportError> {
        Ok(RenderedReport {
            spreadsheet: spreadsheet::render_workbook(report)?,
            html_digest: digest::render_digest(report),
        })
    }

    pub fn subject(report: &RankedReport) -> String {
        format!("Candidate Ranking: {}", report.job_title())
    }

    /// Sends the digest with the spreadsheet attached. Returns whether the
    /// transport accepted the message.
    pub async fn deliver(
        &self,
        recipient: &str,
        subject: &str,
        html_digest: &str,
        spreadsheet: &[u8],
    ) -> bool {
        match self
            .try_deliver(recipient, subject, html_digest, spreadsheet)
            .await
        {
            Ok(()) => {
                info!("Report emailed to {recipient}");
                true
            }
            Err(e) => {
                warn!("Could not email report to {recipient}: {e}");
                false
            }
        }
    }

    pub async fn try_deliver(
        &self,
        recipient: &str,
        subject: &str,
        html_digest: &str,
        spreadsheet: &[u8],
    ) -> Result<(), DeliveryError> {
        self.transport
            .send(OutgoingReport {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                html_body: html_digest.to_string(),
                attachment_name: ATTACHMENT_NAME.to_string(),
                attachment: spreadsheet.to_vec(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::mailer::testing::RecordingTransport;
    use super::*;
    use crate::models::EvaluationResult;

    fn report() -> RankedReport {
        let mut alice = EvaluationResult::empty("alice.pdf");
        alice.score = 82;
        RankedReport::from_indexed("Backend engineer".to_string(), vec![(0, alice)])
    }

    #[tokio::test]
    async fn test_deliver_sends_digest_and_attachment() {
        let transport = Arc::new(RecordingTransport::default());
        let exporter = ReportExporter::new(transport.clone());
        let report = report();
        let rendered = ReportExporter::render(&report).unwrap();

        let ok = exporter
            .deliver(
                "hiring@example.com",
                &ReportExporter::subject(&report),
                &rendered.html_digest,
                &rendered.spreadsheet,
            )
            .await;

        assert!(ok);
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Candidate Ranking: Backend engineer");
        assert_eq!(sent[0].attachment_name, "Ranking.xlsx");
        assert_eq!(sent[0].attachment, rendered.spreadsheet);
        assert!(sent[0].html_body.contains("alice.pdf"));
    }

    #[tokio::test]
    async fn test_transport_failure_reports_false_and_keeps_report() {
        let exporter = ReportExporter::new(Arc::new(RecordingTransport::failing()));
        let report = report();
        let rendered = ReportExporter::render(&report).unwrap();

        let ok = exporter
            .deliver("hiring@example.com", "s", &rendered.html_digest, &rendered.spreadsheet)
            .await;

        assert!(!ok);
        assert_eq!(report.best().unwrap().score, 82);
    }

    #[tokio::test]
    async fn test_try_deliver_exposes_typed_failure() {
        let exporter = ReportExporter::new(Arc::new(RecordingTransport::failing()));
        let err = exporter
            .try_deliver("hiring@example.com", "s", "<p/>", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[test]
    fn test_render_empty_report() {
        let empty = RankedReport::from_indexed("Role".to_string(), Vec::new());
        let rendered = ReportExporter::render(&empty).unwrap();
        assert!(!rendered.spreadsheet.is_empty());
        assert!(rendered.html_digest.contains("No candidates were evaluated"));
    }
}
