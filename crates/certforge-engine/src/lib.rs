#![forbid(unsafe_code)]
//! Asynchronous validation engine.
//!
//! Evaluation runs on a worker pool decoupled from the HTTP request
//! that submitted the certificate; clients observe completion by
//! polling the query surface. A scheduled evaluation always ends in a
//! terminal status — transient failures are retried a bounded number
//! of times and then settled `failed` with a diagnostic row, never
//! left `pending`.

mod compliance;
mod extract;

pub use compliance::evaluate_properties;
pub use extract::{ExtractError, FixtureExtractor, InlineTableExtractor, PropertyExtractor};

use certforge_model::{
    now_unix_ms, DetailRow, MeasuredProperty, ValidationDetail, ValidationId, ValidationStatus,
};
use certforge_store::{DocumentStore, NormStore, StoreError, ValidationStore};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError(pub String);

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub workers: usize,
    pub queue_depth: usize,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub evaluation_deadline: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_depth: 256,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
            evaluation_deadline: Duration::from_secs(30),
        }
    }
}

/// Queue handle given to intake. Cheap to clone; dropping every
/// handle drains and stops the workers.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<ValidationId>,
}

impl EngineHandle {
    /// Schedule an evaluation. Returns once the id is queued; the
    /// caller does not wait for the evaluation itself.
    pub async fn enqueue(&self, id: ValidationId) -> Result<(), EngineError> {
        self.tx
            .send(id)
            .await
            .map_err(|_| EngineError("evaluation queue is closed".to_string()))
    }
}

enum EvalOutcome {
    Done,
    Transient(String),
}

pub struct ValidationEngine {
    norms: Arc<NormStore>,
    validations: Arc<ValidationStore>,
    documents: Arc<dyn DocumentStore>,
    extractor: Arc<dyn PropertyExtractor>,
    cfg: EngineConfig,
}

impl ValidationEngine {
    #[must_use]
    pub fn new(
        norms: Arc<NormStore>,
        validations: Arc<ValidationStore>,
        documents: Arc<dyn DocumentStore>,
        extractor: Arc<dyn PropertyExtractor>,
        cfg: EngineConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            norms,
            validations,
            documents,
            extractor,
            cfg,
        })
    }

    /// Spawn the worker pool and return the intake handle.
    pub fn spawn(self: &Arc<Self>) -> EngineHandle {
        let (tx, rx) = mpsc::channel(self.cfg.queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));
        for worker in 0..self.cfg.workers.max(1) {
            let me = Arc::clone(self);
            let rx = Arc::clone(&rx);
            tokio::spawn(async move {
                loop {
                    let next = { rx.lock().await.recv().await };
                    let Some(id) = next else {
                        break;
                    };
                    info!(worker, validation = %id, "evaluation start");
                    me.process(id).await;
                }
            });
        }
        EngineHandle { tx }
    }

    /// Run one scheduled evaluation to a terminal status, retrying
    /// transient failures up to the configured attempt budget.
    pub async fn process(&self, id: ValidationId) {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let outcome = match timeout(self.cfg.evaluation_deadline, self.evaluate_once(id)).await
            {
                Ok(outcome) => outcome,
                Err(_) => EvalOutcome::Transient("evaluation deadline exceeded".to_string()),
            };
            match outcome {
                EvalOutcome::Done => return,
                EvalOutcome::Transient(reason) => {
                    if attempt >= self.cfg.max_attempts.max(1) {
                        error!(validation = %id, attempt, "evaluation retries exhausted: {reason}");
                        self.settle_failed(id, format!("evaluation failed after {attempt} attempts: {reason}"))
                            .await;
                        return;
                    }
                    warn!(validation = %id, attempt, "transient evaluation failure: {reason}");
                    tokio::time::sleep(self.cfg.retry_backoff * attempt).await;
                }
            }
        }
    }

    async fn evaluate_once(&self, id: ValidationId) -> EvalOutcome {
        let record = match self.validations.get(id).await {
            Ok((record, _)) => record,
            Err(StoreError::NotFound(what)) => {
                warn!(validation = %id, "skipping evaluation, {what} no longer exists");
                return EvalOutcome::Done;
            }
            Err(e) => return EvalOutcome::Transient(e.to_string()),
        };
        if record.status.is_terminal() {
            return EvalOutcome::Done;
        }

        let documents = match self.documents.load(id).await {
            Ok(docs) => docs,
            Err(e) => return EvalOutcome::Transient(e.to_string()),
        };
        let norms = self.norms.snapshot(record.category).await;

        let mut measured: Vec<MeasuredProperty> = Vec::new();
        for document in &documents {
            match self.extractor.extract(document).await {
                Ok(properties) => measured.extend(properties),
                Err(e) => {
                    // Corrupt/unsupported documents settle the record
                    // instead of leaving it pending forever.
                    self.settle_failed(
                        id,
                        format!("document parse failed for {}: {e}", document.file_name),
                    )
                    .await;
                    return EvalOutcome::Done;
                }
            }
        }

        let rows = evaluate_properties(&norms, &measured);
        let status = certforge_model::overall_status(&rows);
        let detail = ValidationDetail {
            rows,
            evaluated_norms: norms,
            evaluated_at_ms: now_unix_ms(),
        };
        match self.validations.settle(id, status, detail).await {
            Ok(record) => {
                info!(validation = %id, status = %record.status, "evaluation settled");
                EvalOutcome::Done
            }
            Err(StoreError::Conflict(msg)) => {
                warn!(validation = %id, "settle skipped: {msg}");
                EvalOutcome::Done
            }
            Err(e) => EvalOutcome::Transient(e.to_string()),
        }
    }

    async fn settle_failed(&self, id: ValidationId, note: String) {
        let detail = ValidationDetail {
            rows: vec![DetailRow::diagnostic(note)],
            evaluated_norms: Vec::new(),
            evaluated_at_ms: now_unix_ms(),
        };
        match self
            .validations
            .settle(id, ValidationStatus::Failed, detail)
            .await
        {
            Ok(_) => {}
            Err(StoreError::Conflict(msg)) => warn!(validation = %id, "settle skipped: {msg}"),
            Err(e) => error!(validation = %id, "failed to settle diagnostic outcome: {e}"),
        }
    }
}
