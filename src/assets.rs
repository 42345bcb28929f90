//! Artwork cache keyed by URL
//!
//! Loads happen out of band (the browser driver drains `pending` and reports
//! back); the renderer only ever asks "is it ready?" synchronously.

use std::collections::HashMap;

/// Load state of one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
struct Slot<H> {
    status: AssetStatus,
    handle: Option<H>,
}

/// Cache of decoded images (`H` is the platform image handle)
#[derive(Debug)]
pub struct AssetCache<H> {
    slots: HashMap<String, Slot<H>>,
    pending: Vec<String>,
    generation: u64,
}

impl<H> Default for AssetCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> AssetCache<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            pending: Vec::new(),
            generation: 0,
        }
    }

    /// Ask for a URL. Returns true if this is the first request for it.
    pub fn request(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(
            url.to_string(),
            Slot {
                status: AssetStatus::Loading,
                handle: None,
            },
        );
        self.pending.push(url.to_string());
        true
    }

    /// URLs requested since the last drain
    pub fn drain_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn mark_ready(&mut self, url: &str, handle: H) {
        self.slots.insert(
            url.to_string(),
            Slot {
                status: AssetStatus::Ready,
                handle: Some(handle),
            },
        );
        self.generation += 1;
    }

    pub fn mark_failed(&mut self, url: &str) {
        log::warn!("Artwork failed to load: {}", url);
        self.slots.insert(
            url.to_string(),
            Slot {
                status: AssetStatus::Failed,
                handle: None,
            },
        );
        self.generation += 1;
    }

    pub fn status(&self, url: &str) -> Option<AssetStatus> {
        self.slots.get(url).map(|s| s.status)
    }

    /// Decoded handle, only once ready
    pub fn get(&self, url: &str) -> Option<&H> {
        self.slots.get(url).and_then(|s| s.handle.as_ref())
    }

    /// Changes whenever a load settles
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Synchronous hit/miss query used by the scene builder
pub trait ImageLookup {
    fn is_ready(&self, url: &str) -> bool;
}

impl<H> ImageLookup for AssetCache<H> {
    fn is_ready(&self, url: &str) -> bool {
        self.status(url) == Some(AssetStatus::Ready)
    }
}
