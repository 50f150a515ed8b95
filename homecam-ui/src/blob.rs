//! Revocable blob handles
//!
//! Recorded samples are transient binary data reachable by the
//! dashboard through a handle (the audio player streams a sample's
//! WAV by its handle id). Handles must be explicitly revoked when
//! their owning entry is removed, or backing memory accumulates for
//! the whole session.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Revocable reference to in-memory binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobHandle(pub Uuid);

impl BlobHandle {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// In-memory store of handle → bytes
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<BlobHandle, Arc<Vec<u8>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a fresh handle
    pub fn create(&mut self, data: Vec<u8>) -> (BlobHandle, Arc<Vec<u8>>) {
        let handle = BlobHandle(Uuid::new_v4());
        let data = Arc::new(data);
        self.blobs.insert(handle, Arc::clone(&data));
        (handle, data)
    }

    /// Resolve a handle; `None` after revocation
    pub fn get(&self, handle: BlobHandle) -> Option<Arc<Vec<u8>>> {
        self.blobs.get(&handle).cloned()
    }

    /// Release the backing data for a handle
    ///
    /// Idempotent: revoking an unknown or already-revoked handle is a
    /// no-op.
    pub fn revoke(&mut self, handle: BlobHandle) {
        self.blobs.remove(&handle);
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
