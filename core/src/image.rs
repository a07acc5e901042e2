//! Photo inputs for record creation.
//!
//! A file picker may hand over the raw file or an envelope wrapping it, and a
//! caller may also pass something that is not binary data at all. The variants
//! are resolved once, when the create request is built.

use std::fs;
use std::path::Path;

use tracing::error;

use crate::error::ApiError;

/// Raw binary image data with the metadata a multipart file part needs.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, inferring the content type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ApiError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, content_type_for(path), bytes))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// What an upload widget produces: the picked file plus picker bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEnvelope {
    pub name: String,
    pub uid: Option<String>,
    pub size: Option<u64>,
    pub raw: Option<ImageFile>,
}

/// An image as supplied to `NewRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    File(ImageFile),
    Envelope(UploadEnvelope),
    /// Not binary data, e.g. the URL of an already uploaded photo.
    Other(String),
}

impl ImageInput {
    /// The binary file to upload, or `None` (logged) when there is none.
    pub fn into_file(self) -> Option<ImageFile> {
        match self {
            ImageInput::File(file) => Some(file),
            ImageInput::Envelope(UploadEnvelope { raw: Some(file), .. }) => Some(file),
            ImageInput::Envelope(envelope) => {
                error!(name = %envelope.name, "upload envelope carries no file, sending record without image");
                None
            }
            ImageInput::Other(value) => {
                error!(%value, "image is not a file, sending record without image");
                None
            }
        }
    }
}

impl From<ImageFile> for ImageInput {
    fn from(file: ImageFile) -> Self {
        ImageInput::File(file)
    }
}

impl From<UploadEnvelope> for ImageInput {
    fn from(envelope: UploadEnvelope) -> Self {
        ImageInput::Envelope(envelope)
    }
}
