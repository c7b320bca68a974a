mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod notifications;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{acceptance, entities, use_cases};
pub use interfaces::{gateway, presenters};
pub use infrastructure::{files, http, logging};

use std::sync::Arc;

use infrastructure::http::gateway::HttpApiGateway;
use notifications::Notifier;
use use_cases::{listing::ImageListingStore, upload::UploadOrchestrator};

/// The upload flow and the listing, sharing one gateway and one notification channel.
pub struct AppState<G = HttpApiGateway>
where
    G: gateway::ApiGateway,
{
    pub uploader: UploadOrchestrator<G>,
    pub listing: Arc<ImageListingStore<G>>,
}

impl<G> AppState<G>
where
    G: gateway::ApiGateway,
{
    pub fn new(gateway: G, notifier: Notifier) -> Self {
        let gateway = Arc::new(gateway);

        AppState {
            uploader: UploadOrchestrator::new(gateway.clone(), notifier.clone()),
            listing: Arc::new(ImageListingStore::new(gateway, notifier)),
        }
    }
}
