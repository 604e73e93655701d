//! Ways of turning a picked image file into a durable [`ImageRef`]

use crate::error::ImageError;
use crate::models::ImageRef;
use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An image file the operator picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, ImageError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImageError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }

    fn guessed_mime(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Inline the file as a `data:` URL
    Embed,
    /// Upload to the image host and keep its public URL
    #[default]
    Hosted,
}

impl StrategyKind {
    /// Whether a local preview is shown while the file resolves
    pub fn previews_transient(self) -> bool {
        matches!(self, StrategyKind::Hosted)
    }

    /// Whether only one resolution may be outstanding at a time
    pub fn single_flight(self) -> bool {
        matches!(self, StrategyKind::Hosted)
    }
}

/// Resolves a picked file to a reference that is valid outside this session.
#[async_trait]
pub trait ImageResolutionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn resolve(&self, file: &ImageFile) -> Result<ImageRef, ImageError>;
}

/// Embeds images as base64 `data:` URLs. No network involved.
#[derive(Debug, Clone, Default)]
pub struct EmbedStrategy;

impl EmbedStrategy {
    fn image_mime(file: &ImageFile) -> Option<String> {
        if let Ok(format) = image::guess_format(&file.bytes) {
            return Some(format.to_mime_type().to_string());
        }
        // SVG and friends carry no magic bytes the image crate knows
        let guess = mime_guess::from_path(&file.file_name).first()?;
        (guess.type_() == mime_guess::mime::IMAGE).then(|| guess.essence_str().to_string())
    }
}

#[async_trait]
impl ImageResolutionStrategy for EmbedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Embed
    }

    async fn resolve(&self, file: &ImageFile) -> Result<ImageRef, ImageError> {
        if file.bytes.is_empty() {
            return Err(ImageError::Unreadable(format!("{} is empty", file.file_name)));
        }
        let mime = Self::image_mime(file).ok_or_else(|| {
            ImageError::Unreadable(format!("{} is not a recognised image", file.file_name))
        })?;
        let payload =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &file.bytes);
        info!(
            "[embed] Embedded {} ({} bytes, {})",
            file.file_name,
            file.bytes.len(),
            mime
        );
        Ok(ImageRef::embedded(&mime, &payload))
    }
}

/// Uploads images to a Cloudinary-style unsigned upload endpoint.
#[derive(Debug, Clone)]
pub struct HostedStrategy {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HostedStrategy {
    pub fn new(upload_url: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.into(),
            upload_preset: upload_preset.into(),
        }
    }

    async fn upload(&self, file: &ImageFile) -> Result<String, ImageError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.guessed_mime())
            .map_err(|e| ImageError::Upload(format!("Failed to create multipart: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageError::Upload(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageError::Upload(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ImageError::Upload(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ImageError::Upload(format!("Failed to parse response: {}", e)))?;

        json.get("secure_url")
            .and_then(|v| v.as_str())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ImageError::Upload("response has no secure_url".to_string()))
    }
}

#[async_trait]
impl ImageResolutionStrategy for HostedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hosted
    }

    async fn resolve(&self, file: &ImageFile) -> Result<ImageRef, ImageError> {
        info!(
            "[upload] Uploading {} ({} bytes)",
            file.file_name,
            file.bytes.len()
        );
        match self.upload(file).await {
            Ok(url) => {
                info!("[upload] {} available at {}", file.file_name, url);
                Ok(ImageRef::remote(url))
            }
            Err(e) => {
                error!("[upload] {} failed: {}", file.file_name, e);
                Err(e)
            }
        }
    }
}
