//! Ranking: drives the batch through the evaluator and orders the verdicts.
//!
//! Order is a function of `(score desc, submission index asc)` only, so it does
//! not depend on the order in which concurrent evaluations complete.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::evaluation::EvaluationService;
use crate::models::{CandidateDocument, EvaluationResult, JobDescription};

/// Size of the "top matches" subset shown in digests.
pub const TOP_N: usize = 5;

/// Evaluation results sorted by descending score, ties in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct RankedReport {
    job_title: String,
    results: Vec<EvaluationResult>,
}

impl RankedReport {
    /// Sorts `(submission_index, result)` pairs into a report.
    pub fn from_indexed(job_title: String, mut indexed: Vec<(usize, EvaluationResult)>) -> Self {
        indexed.sort_by(|(ia, a), (ib, b)| b.score.cmp(&a.score).then(ia.cmp(ib)));
        Self {
            job_title,
            results: indexed.into_iter().map(|(_, r)| r).collect(),
        }
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    /// `None` for an empty batch.
    pub fn best(&self) -> Option<&EvaluationResult> {
        self.results.first()
    }

    pub fn top(&self, n: usize) -> &[EvaluationResult] {
        &self.results[..n.min(self.results.len())]
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub struct RankingAggregator {
    service: Arc<EvaluationService>,
    concurrency: usize,
}

impl RankingAggregator {
    /// `concurrency` of 1 evaluates strictly one document at a time.
    pub fn new(service: Arc<EvaluationService>, concurrency: usize) -> Self {
        Self {
            service,
            concurrency: concurrency.max(1),
        }
    }

    /// Evaluates every document once and ranks the results. `progress` is
    /// called with `(completed, total)` after each evaluation finishes.
    pub async fn rank<F>(
        &self,
        job: &JobDescription,
        docs: Vec<CandidateDocument>,
        mut progress: F,
    ) -> RankedReport
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = docs.len();
        info!(
            "Ranking {total} candidates (concurrency {})",
            self.concurrency
        );

        let indexed = if self.concurrency == 1 || total <= 1 {
            let mut indexed = Vec::with_capacity(total);
            for (index, doc) in docs.iter().enumerate() {
                indexed.push((index, self.service.evaluate(job, doc).await));
                progress(index + 1, total);
            }
            indexed
        } else {
            self.evaluate_concurrently(job, docs, &mut progress).await
        };

        let report = RankedReport::from_indexed(job.title(), indexed);
        let failed = report.results().iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            warn!("{failed} of {total} evaluations fell back to score 0");
        }
        if let Some(best) = report.best() {
            info!("Ranking complete. Top pick: {} ({})", best.name, best.score);
        }
        report
    }

    async fn evaluate_concurrently<F>(
        &self,
        job: &JobDescription,
        docs: Vec<CandidateDocument>,
        progress: &mut F,
    ) -> Vec<(usize, EvaluationResult)>
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = docs.len();
        let names: Vec<String> = docs.iter().map(|d| d.name().to_string()).collect();
        let job = Arc::new(job.clone());
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, doc) in docs.into_iter().enumerate() {
            let service = Arc::clone(&self.service);
            let job = Arc::clone(&job);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                (index, service.evaluate(&job, &doc).await)
            });
        }

        let mut slots: Vec<Option<EvaluationResult>> = vec![None; total];
        let mut completed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Evaluation task aborted: {e}"),
            }
            completed += 1;
            progress(completed, total);
        }

        slots
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(index, (slot, name))| {
                let result = slot.unwrap_or_else(|| {
                    EvaluationResult::fallback(name, "evaluation task aborted")
                });
                (index, result)
            })
            .collect()
    }
}
