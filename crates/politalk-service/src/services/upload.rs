//! Image uploads
//!
//! Images are written under `<upload_dir>/images` and served statically.
//! Failures carry a short plain-text reason and a status code.

use std::path::{Path, PathBuf};

use politalk_common::StorageConfig;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::dto::UploadResponse;

use super::context::ServiceContext;

const IMAGES_DIR: &str = "images";
const MAX_NAME_LEN: usize = 64;

/// Upload failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Missing file data")]
    MissingData,

    #[error("Unsupported file type")]
    UnsupportedType,

    #[error("File too large")]
    TooLarge,

    #[error("Upload failed")]
    Failed,
}

impl UploadError {
    /// HTTP status for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingData | Self::UnsupportedType => 400,
            Self::TooLarge => 413,
            Self::Failed => 500,
        }
    }
}

/// Accepted image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Detect from a MIME type, falling back to the file extension
    pub fn detect(content_type: Option<&str>, filename: &str) -> Option<Self> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_extension(filename))
    }

    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    fn from_extension(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Local-disk image storage
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: Path::new(&config.upload_dir).join(IMAGES_DIR),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: config.max_file_size_bytes(),
        }
    }

    /// Directory served at `/images`
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check the upload before anything touches the disk. Uploads must name
    /// their file and declare a content type.
    pub fn check(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<ImageKind, UploadError> {
        let declared = content_type.is_some_and(|ct| !ct.trim().is_empty());
        if !declared || data.is_empty() || filename.trim().is_empty() {
            return Err(UploadError::MissingData);
        }
        let kind = ImageKind::detect(content_type, filename).ok_or(UploadError::UnsupportedType)?;
        if data.len() > self.max_bytes {
            return Err(UploadError::TooLarge);
        }
        Ok(kind)
    }

    /// Write the image under a unique name and return its public URL
    pub async fn save(
        &self,
        prefix: &str,
        filename: &str,
        kind: ImageKind,
        data: &[u8],
    ) -> Result<String, UploadError> {
        let name = stored_name(prefix, filename, kind);

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            error!(error = %e, dir = %self.root.display(), "Failed to create upload dir");
            UploadError::Failed
        })?;
        tokio::fs::write(self.root.join(&name), data)
            .await
            .map_err(|e| {
                error!(error = %e, file = %name, "Failed to write upload");
                UploadError::Failed
            })?;

        Ok(format!("{}/{IMAGES_DIR}/{name}", self.public_base_url))
    }
}

/// `<prefix>_<sanitized stem>.<ext>`; path separators and odd characters
/// never reach the file system.
fn stored_name(prefix: &str, filename: &str, kind: ImageKind) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let clean: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    if clean.is_empty() {
        format!("{prefix}.{}", kind.extension())
    } else {
        format!("{prefix}_{clean}.{}", kind.extension())
    }
}

/// Upload service
pub struct UploadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UploadService<'a> {
    /// Create a new UploadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_image(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<UploadResponse, UploadError> {
        let store = self.ctx.image_store();
        let kind = store.check(filename, content_type, data)?;

        let prefix = self.ctx.generate_id().to_string();
        let url = store.save(&prefix, filename, kind, data).await?;

        info!(url = %url, "Image uploaded");

        Ok(UploadResponse { url })
    }
}
