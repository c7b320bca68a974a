use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    entities::{
        image::ImageItem,
        upload::{UploadLocation, UploadUrlRequest},
    },
    errors::GatewayError,
};

/// The backend operations the upload and listing flows depend on.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Lists stored images in backend order.
    async fn list_images(&self) -> Result<Vec<ImageItem>, GatewayError>;

    /// Asks the backend for a one-time write location for a new upload.
    async fn request_upload_location(&self, request: &UploadUrlRequest) -> Result<UploadLocation, GatewayError>;

    /// Writes raw bytes to a location obtained from `request_upload_location`.
    /// `content_type` must be the type declared when requesting the location.
    async fn transfer_bytes(&self, write_location: &str, content: Bytes, content_type: &str) -> Result<(), GatewayError>;

    async fn delete_image(&self, image_id: &str) -> Result<(), GatewayError>;
}
