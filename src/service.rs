//! Text completion service abstraction.
//!
//! The renderer never depends on this module; the two meet in
//! [`crate::Assistant`] and the CLI.

use std::fs;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Substring the remote API uses for unknown models and unusable keys.
pub const RESOURCE_NOT_FOUND_MARKER: &str = "Requested entity was not found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The model does not exist or the credential cannot access it.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("Communication error: {0}")]
    Communication(String),
}

impl CompletionError {
    /// Classify a raw failure message into one of the two error kinds.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(RESOURCE_NOT_FOUND_MARKER) {
            Self::ResourceUnavailable(message)
        } else {
            Self::Communication(message)
        }
    }
}

/// Image bytes sent inline with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an image file, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        Ok(Self::new(mime_type_for(path), data))
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "image/jpeg",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub message: String,
    pub image: Option<InlineImage>,
}

impl CompletionRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// A remote model that turns a message (and optional image) into text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &str;

    /// Send one request. An empty string means the model produced no text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
