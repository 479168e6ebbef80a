use crate::StoreError;
use async_trait::async_trait;
use certforge_model::{Document, ValidationId};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Persistence boundary for uploaded certificate documents. Intake
/// writes before the pending record exists; the engine reads at
/// evaluation time.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn store(&self, id: ValidationId, documents: &[Document]) -> Result<(), StoreError>;
    async fn load(&self, id: ValidationId) -> Result<Vec<Document>, StoreError>;
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    entries: Mutex<HashMap<ValidationId, Vec<Document>>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn store(&self, id: ValidationId, documents: &[Document]) -> Result<(), StoreError> {
        self.entries.lock().await.insert(id, documents.to_vec());
        Ok(())
    }

    async fn load(&self, id: ValidationId) -> Result<Vec<Document>, StoreError> {
        self.entries
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::Io(format!("documents missing for validation {id}")))
    }
}

/// Directory-backed store: one subdirectory per validation id, one
/// file per uploaded document, written atomically via tmp + rename.
pub struct DirDocumentStore {
    root: PathBuf,
}

impl DirDocumentStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn dir_for(&self, id: ValidationId) -> PathBuf {
        self.root.join(id.to_string())
    }
}

#[async_trait]
impl DocumentStore for DirDocumentStore {
    async fn store(&self, id: ValidationId, documents: &[Document]) -> Result<(), StoreError> {
        let dir = self.dir_for(id);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        for (index, doc) in documents.iter().enumerate() {
            // The client-supplied name is untrusted; files are keyed
            // by position and the original name kept alongside.
            let tmp = dir.join(format!(".{index}.tmp"));
            std::fs::write(&tmp, &doc.bytes).map_err(|e| StoreError::Io(e.to_string()))?;
            std::fs::rename(&tmp, dir.join(format!("{index}.bin")))
                .map_err(|e| StoreError::Io(e.to_string()))?;
            std::fs::write(dir.join(format!("{index}.name")), doc.file_name.as_bytes())
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        Ok(())
    }

    async fn load(&self, id: ValidationId) -> Result<Vec<Document>, StoreError> {
        let dir = self.dir_for(id);
        if !dir.exists() {
            return Err(StoreError::Io(format!(
                "documents missing for validation {id}"
            )));
        }
        let mut out = Vec::new();
        for index in 0.. {
            let bin = dir.join(format!("{index}.bin"));
            if !bin.exists() {
                break;
            }
            let bytes = std::fs::read(&bin).map_err(|e| StoreError::Io(e.to_string()))?;
            let file_name = std::fs::read_to_string(dir.join(format!("{index}.name")))
                .unwrap_or_else(|_| format!("document-{index}"));
            out.push(Document { file_name, bytes });
        }
        Ok(out)
    }
}
