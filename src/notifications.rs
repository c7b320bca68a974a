use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// User-facing events. Each carries at most a short string, never error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    UploadRejected,
    UploadSucceeded,
    UploadFailed,
    LoadFailed,
    DeleteSucceeded { name: String },
    DeleteFailed,
}

impl Notification {
    /// How long a toast for this event should stay up.
    pub fn display_for(&self) -> Duration {
        match self {
            Notification::UploadSucceeded | Notification::DeleteSucceeded { .. } => Duration::from_millis(2000),
            Notification::UploadRejected => Duration::from_millis(2500),
            Notification::UploadFailed | Notification::LoadFailed | Notification::DeleteFailed => {
                Duration::from_millis(3000)
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            Notification::UploadSucceeded | Notification::DeleteSucceeded { .. }
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::UploadRejected => write!(f, "File cannot be uploaded (check type and size)"),
            Notification::UploadSucceeded => write!(f, "File uploaded successfully"),
            Notification::UploadFailed => write!(f, "Failed to upload file"),
            Notification::LoadFailed => write!(f, "Failed to load images"),
            Notification::DeleteSucceeded { name } => write!(f, "Deleted: {}", name),
            Notification::DeleteFailed => write!(f, "Failed to delete image"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Option<UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Notifier { sender: Some(sender) }, receiver)
    }

    /// A notifier that drops everything.
    pub fn silent() -> Self {
        Notifier { sender: None }
    }

    pub fn notify(&self, notification: Notification) {
        let Some(sender) = &self.sender else {
            return;
        };

        if sender.send(notification).is_err() {
            tracing::trace!("Notification receiver dropped");
        }
    }
}
