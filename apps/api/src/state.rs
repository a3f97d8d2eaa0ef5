use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::EvaluationService;
use crate::ingest::DocumentIngestor;
use crate::llm_client::Reasoner;
use crate::ranking::RankingAggregator;
use crate::report::mailer::MailTransport;
use crate::report::ReportExporter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ingestor: Arc<DocumentIngestor>,
    pub ranking: Arc<RankingAggregator>,
    pub exporter: Arc<ReportExporter>,
}

impl AppState {
    /// Wires the pipeline around the reasoning and mail capabilities.
    pub fn new(
        config: Config,
        reasoner: Arc<dyn Reasoner>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let service = Arc::new(EvaluationService::new(reasoner));
        Self {
            ranking: Arc::new(RankingAggregator::new(service, config.eval_concurrency)),
            exporter: Arc::new(ReportExporter::new(transport)),
            ingestor: Arc::new(DocumentIngestor::default()),
            config,
        }
    }
}
