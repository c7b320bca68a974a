use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::{entities::upload::UploadedEvent, gateway::ApiGateway, use_cases::listing::ImageListingStore};

/// Refreshes the listing after every upload until the orchestrator goes away.
pub async fn refresh_on_upload<G>(store: Arc<ImageListingStore<G>>, mut uploads: Receiver<UploadedEvent>)
where
    G: ApiGateway,
{
    loop {
        match uploads.recv().await {
            Ok(event) => tracing::debug!(key = %event.storage_key, "Upload finished, refreshing listing"),
            // Missed events collapse into a single refresh.
            Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "Upload events lagged, refreshing listing"),
            Err(RecvError::Closed) => break,
        }

        if let Err(e) = store.refresh().await {
            tracing::warn!("Refresh after upload failed: {}", e);
        }
    }
}
