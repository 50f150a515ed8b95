//! Bounded gallery buffer
//!
//! Fixed-capacity, newest-first collection of captured-image
//! references. Insertion beyond capacity evicts the oldest item; there
//! is no other removal path.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of gallery items kept
pub const GALLERY_CAPACITY: usize = 9;

/// Reference to one captured image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Opaque image reference served by the hub
    pub image_path: String,
    /// Display filename
    pub filename: String,
}

/// Newest-first buffer of the most recent captures
#[derive(Debug, Default)]
pub struct GalleryBuffer {
    items: VecDeque<GalleryItem>,
}

impl GalleryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, evicting the oldest item when the buffer
    /// would exceed capacity
    pub fn insert_newest(&mut self, item: GalleryItem) {
        self.items.push_front(item);
        if self.items.len() > GALLERY_CAPACITY {
            self.items.pop_back();
        }
    }

    /// Current contents, newest first
    pub fn items(&self) -> Vec<GalleryItem> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
