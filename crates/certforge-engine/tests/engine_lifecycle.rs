use async_trait::async_trait;
use certforge_engine::{
    EngineConfig, FixtureExtractor, PropertyExtractor, ValidationEngine,
};
use certforge_model::{
    Category, Document, MeasuredProperty, NormDraft, PropertyKind, ValidationId,
    ValidationStatus,
};
use certforge_store::{
    DocumentStore, MemoryDocumentStore, NormStore, StoreError, ValidationStore,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    norms: Arc<NormStore>,
    validations: Arc<ValidationStore>,
    documents: Arc<MemoryDocumentStore>,
    extractor: Arc<FixtureExtractor>,
}

impl Fixture {
    async fn new() -> Self {
        let norms = Arc::new(NormStore::new());
        norms
            .create(NormDraft {
                category: Category::Pins,
                parameter_name: "Hardness".to_string(),
                min_value: Some(50.0),
                max_value: Some(65.0),
                unit: "HRC".to_string(),
                kind: PropertyKind::Mechanical,
            })
            .await
            .expect("seed norm");
        Self {
            norms,
            validations: Arc::new(ValidationStore::new()),
            documents: Arc::new(MemoryDocumentStore::default()),
            extractor: Arc::new(FixtureExtractor::default()),
        }
    }

    fn engine(&self, cfg: EngineConfig) -> Arc<ValidationEngine> {
        ValidationEngine::new(
            Arc::clone(&self.norms),
            Arc::clone(&self.validations),
            self.documents.clone(),
            self.extractor.clone(),
            cfg,
        )
    }

    async fn submit(&self, file_name: &str) -> ValidationId {
        let record = self
            .validations
            .create_pending(Category::Pins, file_name)
            .await
            .expect("create pending");
        self.documents
            .store(
                record.id,
                &[Document {
                    file_name: file_name.to_string(),
                    bytes: b"raw".to_vec(),
                }],
            )
            .await
            .expect("store documents");
        record.id
    }
}

fn hardness(value: f64) -> Vec<MeasuredProperty> {
    vec![MeasuredProperty {
        property_name: "Hardness".to_string(),
        kind: PropertyKind::Mechanical,
        measured_value: value,
    }]
}

fn fast_cfg() -> EngineConfig {
    EngineConfig {
        retry_backoff: Duration::from_millis(5),
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn in_range_measurement_settles_passed_with_compliant_row() {
    let fx = Fixture::new().await;
    fx.extractor.with_properties("cert.pdf", hardness(60.0)).await;
    let id = fx.submit("cert.pdf").await;

    fx.engine(fast_cfg()).process(id).await;

    let (record, detail) = fx.validations.get(id).await.expect("get");
    assert_eq!(record.status, ValidationStatus::Passed);
    let detail = detail.expect("terminal detail");
    assert_eq!(detail.rows.len(), 1);
    assert_eq!(detail.rows[0].property_name, "Hardness");
    assert_eq!(detail.rows[0].compliant, Some(true));
    // The evaluated norm snapshot is kept for audit.
    assert_eq!(detail.evaluated_norms.len(), 1);
}

#[tokio::test]
async fn out_of_range_measurement_settles_failed() {
    let fx = Fixture::new().await;
    fx.extractor.with_properties("cert.pdf", hardness(70.0)).await;
    let id = fx.submit("cert.pdf").await;

    fx.engine(fast_cfg()).process(id).await;

    let (record, detail) = fx.validations.get(id).await.expect("get");
    assert_eq!(record.status, ValidationStatus::Failed);
    assert_eq!(detail.expect("detail").rows[0].compliant, Some(false));
}

#[tokio::test]
async fn parse_failure_settles_failed_with_diagnostic_row() {
    let fx = Fixture::new().await;
    fx.extractor
        .with_failure("corrupt.pdf", "unsupported format")
        .await;
    let id = fx.submit("corrupt.pdf").await;

    fx.engine(fast_cfg()).process(id).await;

    let (record, detail) = fx.validations.get(id).await.expect("get");
    assert_eq!(record.status, ValidationStatus::Failed);
    let rows = detail.expect("detail").rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].compliant, Some(false));
    assert!(rows[0]
        .note
        .as_deref()
        .expect("note")
        .contains("unsupported format"));
}

#[tokio::test]
async fn terminal_record_is_not_reevaluated() {
    let fx = Fixture::new().await;
    fx.extractor.with_properties("cert.pdf", hardness(60.0)).await;
    let id = fx.submit("cert.pdf").await;

    let engine = fx.engine(fast_cfg());
    engine.process(id).await;
    let (first, _) = fx.validations.get(id).await.expect("get");

    // Swap the fixture to a failing outcome; a second pass must not
    // change the settled status.
    fx.extractor.with_properties("cert.pdf", hardness(99.0)).await;
    engine.process(id).await;
    let (second, _) = fx.validations.get(id).await.expect("get");
    assert_eq!(first.status, ValidationStatus::Passed);
    assert_eq!(second.status, ValidationStatus::Passed);
}

struct FlakyDocumentStore {
    inner: MemoryDocumentStore,
    failures_left: AtomicU32,
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn store(&self, id: ValidationId, documents: &[Document]) -> Result<(), StoreError> {
        self.inner.store(id, documents).await
    }

    async fn load(&self, id: ValidationId) -> Result<Vec<Document>, StoreError> {
        let left = self.failures_left.load(Ordering::Relaxed);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::Relaxed);
            return Err(StoreError::Io("simulated storage outage".to_string()));
        }
        self.inner.load(id).await
    }
}

#[tokio::test]
async fn transient_io_is_retried_then_succeeds() {
    let fx = Fixture::new().await;
    fx.extractor.with_properties("cert.pdf", hardness(60.0)).await;
    let id = fx.submit("cert.pdf").await;

    let flaky = Arc::new(FlakyDocumentStore {
        inner: MemoryDocumentStore::default(),
        failures_left: AtomicU32::new(2),
    });
    flaky
        .store(
            id,
            &[Document {
                file_name: "cert.pdf".to_string(),
                bytes: b"raw".to_vec(),
            }],
        )
        .await
        .expect("seed flaky store");

    let engine = ValidationEngine::new(
        Arc::clone(&fx.norms),
        Arc::clone(&fx.validations),
        flaky,
        fx.extractor.clone(),
        fast_cfg(),
    );
    engine.process(id).await;

    let (record, _) = fx.validations.get(id).await.expect("get");
    assert_eq!(record.status, ValidationStatus::Passed);
}

#[tokio::test]
async fn retry_exhaustion_settles_failed_never_pending() {
    let fx = Fixture::new().await;
    let id = fx.submit("cert.pdf").await;

    let always_failing = Arc::new(FlakyDocumentStore {
        inner: MemoryDocumentStore::default(),
        failures_left: AtomicU32::new(u32::MAX),
    });
    let engine = ValidationEngine::new(
        Arc::clone(&fx.norms),
        Arc::clone(&fx.validations),
        always_failing,
        fx.extractor.clone(),
        EngineConfig {
            max_attempts: 2,
            retry_backoff: Duration::from_millis(5),
            ..EngineConfig::default()
        },
    );
    engine.process(id).await;

    let (record, detail) = fx.validations.get(id).await.expect("get");
    assert_eq!(record.status, ValidationStatus::Failed);
    let rows = detail.expect("detail").rows;
    assert!(rows[0]
        .note
        .as_deref()
        .expect("note")
        .contains("after 2 attempts"));
}

#[tokio::test]
async fn spawned_workers_drain_the_queue() {
    let fx = Fixture::new().await;
    fx.extractor.with_properties("a.pdf", hardness(60.0)).await;
    fx.extractor.with_properties("b.pdf", hardness(70.0)).await;
    let a = fx.submit("a.pdf").await;
    let b = fx.submit("b.pdf").await;

    let engine = fx.engine(fast_cfg());
    let handle = engine.spawn();
    handle.enqueue(a).await.expect("enqueue a");
    handle.enqueue(b).await.expect("enqueue b");

    // Poll until both records settle, the same way clients observe
    // completion.
    for _ in 0..200 {
        let done = fx.validations.get(a).await.expect("a").0.status.is_terminal()
            && fx.validations.get(b).await.expect("b").0.status.is_terminal();
        if done {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(
        fx.validations.get(a).await.expect("a").0.status,
        ValidationStatus::Passed
    );
    assert_eq!(
        fx.validations.get(b).await.expect("b").0.status,
        ValidationStatus::Failed
    );
}
