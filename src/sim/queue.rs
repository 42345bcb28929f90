//! Track pool with current/next selection and eaten history

use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// One artwork rendition of a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A playable track. Immutable once it enters the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    /// Largest first, as the catalogue delivers them
    pub artwork: Vec<Artwork>,
    pub uri: String,
    pub preview_url: Option<String>,
}

impl Track {
    /// Lowest-resolution artwork (used for board tiles)
    pub fn smallest_artwork(&self) -> Option<&str> {
        self.artwork.last().map(|a| a.url.as_str())
    }

    /// Highest-resolution artwork (used for colour extraction)
    pub fn largest_artwork(&self) -> Option<&str> {
        self.artwork.first().map(|a| a.url.as_str())
    }
}

/// A consumed track, in eating order
#[derive(Debug, Clone)]
pub struct EatenRecord {
    /// 1-based
    pub order: u32,
    pub track: Rc<Track>,
    pub artwork_url: Option<String>,
}

/// Song pool plus the playback pointer and its one-ahead lookahead
#[derive(Debug, Clone, Default)]
pub struct TrackQueue {
    pool: Vec<Rc<Track>>,
    current: Option<Rc<Track>>,
    next: Option<Rc<Track>>,
    history: Vec<EatenRecord>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a pool. An empty pool leaves the queue untouched.
    pub fn initialize(&mut self, pool: Vec<Track>) {
        if pool.is_empty() {
            log::warn!("Ignoring empty track pool");
            return;
        }

        self.pool = pool.into_iter().map(Rc::new).collect();
        self.current = Some(self.pool[0].clone());
        self.next = Some(self.pool.get(1).unwrap_or(&self.pool[0]).clone());
        self.history.clear();
        log::info!("Track pool loaded ({} tracks)", self.pool.len());
    }

    /// Promote `next` to `current` and draw a fresh `next`.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Rc<Track>, GameError> {
        if self.pool.is_empty() {
            return Err(GameError::EmptyPool);
        }
        let promoted = self.next.take().ok_or(GameError::EmptyPool)?;

        let mut index = rng.random_range(0..self.pool.len());
        if self.pool.len() > 1 && self.pool[index].id == promoted.id {
            index = (index + 1) % self.pool.len();
        }

        log::debug!("Now playing '{}', up next '{}'", promoted.name, self.pool[index].name);
        self.next = Some(self.pool[index].clone());
        self.current = Some(promoted.clone());
        Ok(promoted)
    }

    /// Append to the eaten history with the next 1-based order
    pub fn record_eaten(&mut self, track: Rc<Track>, artwork_url: Option<String>) -> &EatenRecord {
        let order = self.history.len() as u32 + 1;
        self.history.push(EatenRecord {
            order,
            track,
            artwork_url,
        });
        &self.history[self.history.len() - 1]
    }

    /// Drop the eaten history; pool and pointers survive
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn current(&self) -> Option<&Rc<Track>> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Rc<Track>> {
        self.next.as_ref()
    }

    pub fn history(&self) -> &[EatenRecord] {
        &self.history
    }

    /// Artwork record for body segment `index` (index 0 is the head)
    pub fn segment_record(&self, index: usize) -> Option<&EatenRecord> {
        index.checked_sub(1).and_then(|i| self.history.get(i))
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
