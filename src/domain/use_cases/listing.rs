use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    entities::image::ImageRecord,
    errors::GatewayError,
    gateway::ApiGateway,
    notifications::{Notification, Notifier},
    use_cases::deletion::DeletionTracker,
};

#[derive(Debug, Default)]
struct Listing {
    records: Vec<ImageRecord>,
    refreshing: usize,
    // Bumped on every confirmed delete.
    deletions: u64,
    // Ids confirmed deleted while a refresh was in flight, so an older
    // response cannot bring them back. Emptied once no refresh is running.
    deleted_during_refresh: HashMap<String, u64>,
}

/// Counts one in-flight refresh for as long as it lives, including when the
/// refresh future is dropped before the response arrives.
struct Refreshing<'a> {
    listing: &'a Mutex<Listing>,
}

impl Drop for Refreshing<'_> {
    fn drop(&mut self) {
        let mut listing = self.listing.lock();
        listing.refreshing -= 1;
        if listing.refreshing == 0 {
            listing.deleted_during_refresh.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Empty id, or a delete for the same id is already in flight.
    Skipped,
    Deleted { name: String },
}

pub struct ImageListingStore<G>
where
    G: ApiGateway,
{
    pub gateway: Arc<G>,
    listing: Mutex<Listing>,
    deleting: DeletionTracker,
    notifier: Notifier,
}

impl<G> ImageListingStore<G>
where
    G: ApiGateway,
{
    pub fn new(gateway: Arc<G>, notifier: Notifier) -> Self {
        ImageListingStore {
            gateway,
            listing: Mutex::new(Listing::default()),
            deleting: DeletionTracker::new(),
            notifier,
        }
    }

    /// Reloads the whole listing. A failed load keeps the previous records.
    ///
    /// Overlapping refreshes are allowed; the last to settle wins, minus any
    /// image whose deletion was confirmed after that refresh started.
    pub async fn refresh(&self) -> Result<usize, GatewayError> {
        let started_after = {
            let mut listing = self.listing.lock();
            listing.refreshing += 1;
            listing.deletions
        };
        let refreshing = Refreshing { listing: &self.listing };

        let result = self.gateway.list_images().await;

        match result {
            Ok(items) => {
                let count = {
                    let mut listing = self.listing.lock();
                    let records: Vec<ImageRecord> = items
                        .into_iter()
                        .filter(|item| {
                            listing
                                .deleted_during_refresh
                                .get(&item.image_id)
                                .is_none_or(|deleted| *deleted <= started_after)
                        })
                        .map(ImageRecord::from)
                        .collect();
                    listing.records = records;
                    listing.records.len()
                };
                drop(refreshing);

                tracing::info!("Loaded {} images", count);
                Ok(count)
            }
            Err(e) => {
                drop(refreshing);

                tracing::error!("Failed to load images: {}", e);
                self.notifier.notify(Notification::LoadFailed);
                Err(e)
            }
        }
    }

    /// Snapshot of the records in backend order
    pub fn records(&self) -> Vec<ImageRecord> {
        self.listing.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.listing.lock().records.len()
    }

    pub fn is_loading(&self) -> bool {
        self.listing.lock().refreshing > 0
    }

    /// False while loading, so callers show progress instead of an empty state.
    pub fn is_empty(&self) -> bool {
        let listing = self.listing.lock();
        listing.refreshing == 0 && listing.records.is_empty()
    }

    /// Deletes one image.
    ///
    /// The id is tracked as deleting before the request goes out. The record
    /// is only dropped from the listing once the backend confirms.
    pub async fn delete(&self, image_id: &str) -> Result<DeleteOutcome, GatewayError> {
        if image_id.is_empty() {
            return Ok(DeleteOutcome::Skipped);
        }

        let name = self.display_name_of(image_id);

        if !self.deleting.begin(image_id) {
            tracing::warn!(image_id, "Delete already in flight, skipping");
            return Ok(DeleteOutcome::Skipped);
        }

        let result = self.gateway.delete_image(image_id).await;

        match result {
            Ok(()) => {
                self.confirm_deleted(image_id);
                let elapsed = self.deleting.settle(image_id);

                tracing::info!(image_id, ?elapsed, "Image deleted");
                self.notifier.notify(Notification::DeleteSucceeded { name: name.clone() });
                Ok(DeleteOutcome::Deleted { name })
            }
            Err(e) => {
                self.deleting.settle(image_id);

                tracing::error!(image_id, "Failed to delete image: {}", e);
                self.notifier.notify(Notification::DeleteFailed);
                Err(e)
            }
        }
    }

    pub fn is_deleting(&self, image_id: &str) -> bool {
        self.deleting.contains(image_id)
    }

    pub fn deleting_ids(&self) -> Vec<String> {
        self.deleting.ids()
    }

    fn confirm_deleted(&self, image_id: &str) {
        let mut listing = self.listing.lock();

        listing.records.retain(|r| r.image_id != image_id);
        listing.deletions += 1;
        if listing.refreshing > 0 {
            let deletion = listing.deletions;
            listing.deleted_during_refresh.insert(image_id.to_string(), deletion);
        }
    }

    fn display_name_of(&self, image_id: &str) -> String {
        self.listing
            .lock()
            .records
            .iter()
            .find(|r| r.image_id == image_id)
            .map(|r| r.display_name.clone())
            .unwrap_or_else(|| image_id.to_string())
    }
}
