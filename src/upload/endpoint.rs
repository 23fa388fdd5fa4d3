use crate::config::Config;
use crate::error::UploadError;
use crate::upload::types::{ContactCard, ContactRequest, ErrorBody, ProcessingResult, StagedFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// The remote service that turns an image into text and fields.
#[async_trait]
pub trait ProcessingEndpoint: Send + Sync {
    async fn process(&self, file: &StagedFile) -> Result<ProcessingResult, UploadError>;

    async fn format_contact(&self, request: &ContactRequest)
        -> Result<ContactCard, UploadError>;
}

#[derive(Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    process_url: Url,
    contact_url: Url,
}

impl HttpEndpoint {
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            process_url: config.endpoint_url("process")?,
            contact_url: config.endpoint_url("contact")?,
        })
    }

    pub fn process_url(&self) -> &Url {
        &self.process_url
    }

    /// Fail on any non-2xx status, then decode the body.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, UploadError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            warn!("Server answered {} ({:?})", status, detail);
            return Err(UploadError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        debug!("Received {} byte response", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ProcessingEndpoint for HttpEndpoint {
    async fn process(&self, file: &StagedFile) -> Result<ProcessingResult, UploadError> {
        info!(
            "Uploading '{}' ({}, {} bytes) to {}",
            file.name,
            file.content_type,
            file.size(),
            self.process_url
        );

        let part = Part::stream_with_length(Body::from(file.bytes.clone()), file.size())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(self.process_url.clone())
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn format_contact(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactCard, UploadError> {
        info!("Requesting contact card from {}", self.contact_url);

        let response = self
            .client
            .post(self.contact_url.clone())
            .json(request)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
