use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use url::Url;
use validator::Validate;

use crate::{
    entities::{
        image::{ImageItem, ImageListResponse},
        upload::{UploadLocation, UploadUrlRequest},
    },
    errors::GatewayError,
    gateway::ApiGateway,
    settings::AppConfig,
};

/// [`ApiGateway`] over the backend's REST API. Uploads go straight to the
/// write location the backend hands out.
#[derive(Clone, Debug)]
pub struct HttpApiGateway {
    client: Client,
    base_url: String,
}

impl HttpApiGateway {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &Url) -> Self {
        HttpApiGateway {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let base_url = config.base_url().map_err(|e| GatewayError::Config(e.to_string()))?;
        let timeout = config.timeout().map_err(|e| GatewayError::Config(e.to_string()))?;

        Self::new(&base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into [`GatewayError::Server`], keeping the body for logs.
async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::server(status, body))
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn list_images(&self) -> Result<Vec<ImageItem>, GatewayError> {
        let response = self.client.get(self.endpoint("images")).send().await?;
        let response = ensure_success(response).await?;

        let body: Option<ImageListResponse> = response.json().await?;
        Ok(body.map(ImageListResponse::into_items).unwrap_or_default())
    }

    async fn request_upload_location(&self, request: &UploadUrlRequest) -> Result<UploadLocation, GatewayError> {
        request.validate()?;

        let response = self
            .client
            .post(self.endpoint("upload/request"))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.json().await?)
    }

    async fn transfer_bytes(&self, write_location: &str, content: Bytes, content_type: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .put(write_location)
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;
        ensure_success(response).await?;

        Ok(())
    }

    async fn delete_image(&self, image_id: &str) -> Result<(), GatewayError> {
        let path = format!("images/{}", urlencoding::encode(image_id));

        let response = self.client.delete(self.endpoint(&path)).send().await?;
        ensure_success(response).await?;

        Ok(())
    }
}
