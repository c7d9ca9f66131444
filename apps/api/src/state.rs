use std::sync::Arc;

use crate::llm_client::StructuredGenerator;
use crate::recruitment::{BlobStore, RecruitmentStore};

/// Shared application state injected into the ad and recruitment handlers.
/// The labor-market proxy carries its own state (`LaborMarketProxy`).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecruitmentStore>,
    /// CV uploads.
    pub blobs: Arc<dyn BlobStore>,
    pub generator: Arc<dyn StructuredGenerator>,
}

#[cfg(test)]
impl AppState {
    /// In-memory store and blob store around the given generator.
    pub fn for_tests(generator: Arc<dyn StructuredGenerator>) -> Self {
        use crate::recruitment::blob::testing::RecordingBlobStore;
        use crate::recruitment::store::testing::InMemoryStore;

        Self {
            store: Arc::new(InMemoryStore::default()),
            blobs: Arc::new(RecordingBlobStore::default()),
            generator,
        }
    }
}
