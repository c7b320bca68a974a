use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{
    domain::acceptance::{Acceptance, FileAcceptancePolicy},
    entities::upload::{CandidateFile, UploadLocation, UploadPhase, UploadSessionState, UploadUrlRequest, UploadedEvent},
    errors::UploadError,
    gateway::ApiGateway,
    notifications::{Notification, Notifier},
};

const UPLOADED_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Default)]
struct UploadSession {
    selection: Option<CandidateFile>,
    // Bumped on every select/clear so a settling upload can tell whether
    // the selection it started from is still the current one.
    selection_id: u64,
    in_flight: Option<CandidateFile>,
    phase: UploadPhase,
}

/// Settles the session when dropped, including when the submit future is dropped mid-flight.
struct Submission<'a> {
    session: &'a Mutex<UploadSession>,
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        let mut session = self.session.lock();
        session.phase = UploadPhase::Settled;
        session.in_flight = None;
    }
}

pub struct UploadOrchestrator<G>
where
    G: ApiGateway,
{
    pub gateway: Arc<G>,
    policy: FileAcceptancePolicy,
    session: Mutex<UploadSession>,
    notifier: Notifier,
    uploaded: broadcast::Sender<UploadedEvent>,
}

impl<G> UploadOrchestrator<G>
where
    G: ApiGateway,
{
    pub fn new(gateway: Arc<G>, notifier: Notifier) -> Self {
        let (uploaded, _) = broadcast::channel(UPLOADED_CHANNEL_CAPACITY);

        UploadOrchestrator {
            gateway,
            policy: FileAcceptancePolicy::default(),
            session: Mutex::new(UploadSession::default()),
            notifier,
            uploaded,
        }
    }

    /// Receives an event after every completed upload
    pub fn subscribe(&self) -> broadcast::Receiver<UploadedEvent> {
        self.uploaded.subscribe()
    }

    /// Replaces the current selection. Never touches the network.
    ///
    /// Allowed while an upload is in flight; the in-flight upload keeps its
    /// own file and, once it succeeds, leaves the newer selection in place.
    pub fn select(&self, file: CandidateFile) {
        let mut session = self.session.lock();

        tracing::debug!(name = file.name(), size = file.size(), content_type = file.content_type(), "File selected");

        session.selection = Some(file);
        session.selection_id += 1;
        if !session.phase.is_busy() {
            session.phase = UploadPhase::Idle;
        }
    }

    /// Drops the selection. Ignored while an upload is in flight; returns whether it took effect.
    pub fn clear(&self) -> bool {
        let mut session = self.session.lock();

        if session.phase.is_busy() {
            tracing::warn!("Ignoring clear while an upload is in flight");
            return false;
        }

        session.selection = None;
        session.selection_id += 1;
        session.phase = UploadPhase::Idle;
        true
    }

    pub fn state(&self) -> UploadSessionState {
        let session = self.session.lock();

        match (&session.in_flight, &session.selection) {
            (Some(file), _) if session.phase.is_busy() => UploadSessionState::Uploading(file.clone()),
            (_, Some(file)) => UploadSessionState::FileSelected(file.clone()),
            _ => UploadSessionState::NoFile,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.session.lock().phase
    }

    pub fn is_busy(&self) -> bool {
        self.session.lock().phase.is_busy()
    }

    /// Policy verdict for the current selection
    pub fn acceptance(&self) -> Acceptance {
        let session = self.session.lock();
        self.policy.evaluate(session.selection.as_ref())
    }

    pub fn can_submit(&self) -> bool {
        let session = self.session.lock();
        !session.phase.is_busy() && self.policy.evaluate(session.selection.as_ref()).is_acceptable()
    }

    /// Uploads the current selection: requests a write location, then
    /// transfers the bytes there.
    ///
    /// On success the selection is cleared and an [`UploadedEvent`] is
    /// broadcast. On failure the selection is left as it was.
    pub async fn submit(&self) -> Result<UploadedEvent, UploadError> {
        let (submission_id, file) = match self.begin_submission() {
            Ok(started) => started,
            Err(e) => {
                tracing::warn!("Upload refused: {}", e);
                self.notifier.notify(Notification::UploadRejected);
                return Err(e);
            }
        };

        let submission = Submission { session: &self.session };
        let result = self.run_phases(&file).await;
        drop(submission);

        match result {
            Ok(location) => {
                {
                    let mut session = self.session.lock();
                    if session.selection_id == submission_id {
                        session.selection = None;
                        session.selection_id += 1;
                    }
                }

                let event = UploadedEvent {
                    file_name: file.name().to_string(),
                    storage_key: location.storage_key,
                    image_id: location.image_id,
                };

                tracing::info!(name = %event.file_name, key = %event.storage_key, "File uploaded");
                self.notifier.notify(Notification::UploadSucceeded);
                if self.uploaded.send(event.clone()).is_err() {
                    tracing::debug!("No subscribers for uploaded event");
                }

                Ok(event)
            }
            Err(e) => {
                tracing::error!(name = file.name(), "Upload failed: {}", e);
                self.notifier.notify(Notification::UploadFailed);
                Err(e)
            }
        }
    }

    fn begin_submission(&self) -> Result<(u64, CandidateFile), UploadError> {
        let mut session = self.session.lock();

        if session.phase.is_busy() {
            return Err(UploadError::Busy);
        }

        session.phase = UploadPhase::Validating;

        let file = match self.policy.evaluate(session.selection.as_ref()) {
            Acceptance::Accepted => session.selection.clone(),
            Acceptance::Rejected(rejection) => {
                session.phase = UploadPhase::Idle;
                return Err(UploadError::Rejected(rejection));
            }
            Acceptance::NoFile => None,
        };

        let Some(file) = file else {
            session.phase = UploadPhase::Idle;
            return Err(UploadError::NoFile);
        };

        session.phase = UploadPhase::RequestingLocation;
        session.in_flight = Some(file.clone());
        Ok((session.selection_id, file))
    }

    async fn run_phases(&self, file: &CandidateFile) -> Result<UploadLocation, UploadError> {
        let request = UploadUrlRequest::from(file);

        tracing::debug!(name = %request.file_name, "Requesting upload location");
        let location = self
            .gateway
            .request_upload_location(&request)
            .await
            .map_err(UploadError::LocationRequest)?;

        self.session.lock().phase = UploadPhase::Transferring;

        tracing::debug!(key = %location.storage_key, bytes = file.size(), "Transferring bytes");
        self.gateway
            .transfer_bytes(&location.write_location, file.content(), &request.content_type)
            .await
            .map_err(UploadError::Transfer)?;

        Ok(location)
    }
}
