//! Sample collection and training gate
//!
//! Ordered list of completed recording-session outputs. Insertion
//! order equals recording completion order. The "trainable" gate is
//! always derived from the count, never stored, so it cannot drift.

use serde::Serialize;
use std::sync::Arc;

use crate::blob::BlobHandle;

/// One finalized recording: a revocable playback handle plus the raw
/// WAV bytes that go into a training upload
#[derive(Debug, Clone)]
pub struct RecordedSample {
    pub handle: BlobHandle,
    pub data: Arc<Vec<u8>>,
    /// Recorded duration in seconds, in [0, 30]
    pub duration_seconds: u32,
}

/// Snapshot of one sample for the state endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SampleInfo {
    pub id: uuid::Uuid,
    pub duration_seconds: u32,
}

/// Ordered collection of recorded samples
#[derive(Debug, Default)]
pub struct SampleCollection {
    samples: Vec<RecordedSample>,
}

impl SampleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end
    pub fn append(&mut self, sample: RecordedSample) {
        self.samples.push(sample);
    }

    /// Remove by handle identity
    ///
    /// Returns the removed sample so the caller can revoke its handle;
    /// `None` when absent (no-op).
    pub fn remove(&mut self, handle: BlobHandle) -> Option<RecordedSample> {
        let index = self.samples.iter().position(|s| s.handle == handle)?;
        Some(self.samples.remove(index))
    }

    /// Remove everything, returning the drained samples for handle
    /// revocation
    pub fn clear(&mut self) -> Vec<RecordedSample> {
        std::mem::take(&mut self.samples)
    }

    /// Derived training gate: true iff at least one sample exists
    pub fn is_trainable(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in completion order
    pub fn iter(&self) -> impl Iterator<Item = &RecordedSample> {
        self.samples.iter()
    }

    /// Snapshot for the state endpoint
    pub fn infos(&self) -> Vec<SampleInfo> {
        self.samples
            .iter()
            .map(|s| SampleInfo {
                id: s.handle.id(),
                duration_seconds: s.duration_seconds,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample(bytes: Vec<u8>) -> RecordedSample {
        RecordedSample {
            handle: BlobHandle(Uuid::new_v4()),
            data: Arc::new(bytes),
            duration_seconds: 3,
        }
    }

    #[test]
    fn test_trainable_derived_from_count() {
        let mut collection = SampleCollection::new();
        assert!(!collection.is_trainable());

        let s = sample(vec![1]);
        collection.append(s.clone());
        assert!(collection.is_trainable());

        collection.remove(s.handle);
        assert!(!collection.is_trainable());
    }

    #[test]
    fn test_append_preserves_completion_order() {
        let mut collection = SampleCollection::new();
        let a = sample(vec![1]);
        let b = sample(vec![2]);
        collection.append(a.clone());
        collection.append(b.clone());

        let handles: Vec<BlobHandle> = collection.iter().map(|s| s.handle).collect();
        assert_eq!(handles, [a.handle, b.handle]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut collection = SampleCollection::new();
        collection.append(sample(vec![1]));

        let absent = BlobHandle(Uuid::new_v4());
        assert!(collection.remove(absent).is_none());
        assert_eq!(collection.len(), 1);
        assert!(collection.is_trainable());
    }

    #[test]
    fn test_remove_by_identity() {
        let mut collection = SampleCollection::new();
        let a = sample(vec![1]);
        let b = sample(vec![2]);
        collection.append(a.clone());
        collection.append(b.clone());

        let removed = collection.remove(a.handle).expect("present");
        assert_eq!(removed.handle, a.handle);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.iter().next().unwrap().handle, b.handle);
    }

    #[test]
    fn test_clear_drains_everything() {
        let mut collection = SampleCollection::new();
        collection.append(sample(vec![1]));
        collection.append(sample(vec![2]));

        let drained = collection.clear();
        assert_eq!(drained.len(), 2);
        assert!(collection.is_empty());
        assert!(!collection.is_trainable());
    }
}
