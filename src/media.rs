//! Welcome image asset
//!
//! Loaded once at startup and shared read-only. A missing or unreadable file
//! is not fatal: the bot runs without it and every media send fails on its
//! own.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::Path;
use thiserror::Error;

/// Maximum image size (5MB)
const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media type for {path}: {mime_type}")]
    UnsupportedType { path: String, mime_type: String },

    #[error("Image too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// An image ready to be attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub mime_type: String,
    pub filename: String,
    pub data: Vec<u8>,
}

impl MediaAsset {
    pub async fn load(path: &Path) -> Result<Self, MediaError> {
        let io_err = |source: std::io::Error| MediaError::Io {
            path: path.display().to_string(),
            source,
        };

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(MediaError::UnsupportedType {
                path: path.display().to_string(),
                mime_type: mime.to_string(),
            });
        }

        let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
        if metadata.len() > MAX_IMAGE_SIZE {
            return Err(MediaError::TooLarge {
                size: metadata.len(),
                max: MAX_IMAGE_SIZE,
            });
        }

        let data = tokio::fs::read(path).await.map_err(io_err)?;
        let filename = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            mime_type: mime.essence_str().to_string(),
            filename,
            data,
        })
    }

    /// Load the asset, logging and returning `None` when it is unavailable.
    pub async fn load_optional(path: &Path) -> Option<Self> {
        match Self::load(path).await {
            Ok(asset) => {
                tracing::info!(
                    path = %path.display(),
                    mime_type = %asset.mime_type,
                    bytes = asset.data.len(),
                    "Loaded welcome image"
                );
                Some(asset)
            }
            Err(e) => {
                tracing::error!(error = %e, "Welcome image unavailable, media sends will fail");
                None
            }
        }
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}
