use std::time::{Duration, Instant};

use dashmap::{DashMap, mapref::entry::Entry};

/// Image ids with a delete request in flight, keyed per id so that
/// concurrent deletions settle independently.
#[derive(Debug, Default)]
pub struct DeletionTracker {
    in_flight: DashMap<String, Instant>,
}

impl DeletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `image_id` as deleting. Returns false if it already was.
    pub fn begin(&self, image_id: &str) -> bool {
        match self.in_flight.entry(image_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                true
            }
        }
    }

    /// Clears `image_id` and returns how long its deletion was in flight.
    pub fn settle(&self, image_id: &str) -> Option<Duration> {
        self.in_flight
            .remove(image_id)
            .map(|(_, started)| started.elapsed())
    }

    pub fn contains(&self, image_id: &str) -> bool {
        self.in_flight.contains_key(image_id)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.in_flight.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }
}
