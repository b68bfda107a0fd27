/// Validation limits supplied by the caller
///
/// The widget only checks what it can see without decoding: the reported
/// file size and the reported media type. Anything deeper (dimensions,
/// corrupt data) is the caller's business at upload time.

use image::ImageFormat;
use serde::Deserialize;
use thiserror::Error;

use super::file::SelectedFile;

/// One mebibyte, the unit the size limit is expressed in
pub const MIB: u64 = 1024 * 1024;

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * MIB;

/// Why a picked file was turned away
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// File is larger than the configured limit
    #[error("File size exceeds the limit of {}", limit_label(.limit))]
    OversizeFile { size: u64, limit: u64 },

    /// Reported media type is not an image
    #[error("Please upload an image file (JPG or PNG)")]
    UnsupportedMediaType { media_type: String },
}

/// Limits applied to every selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadConstraints {
    /// Largest accepted file, in bytes (inclusive)
    pub max_size_bytes: u64,
    /// Media types offered by the file dialog filter
    pub accepted_media_types: Vec<String>,
    /// Prefixes the reported media type must start with
    pub allowed_mime_prefixes: Vec<String>,
}

impl Default for UploadConstraints {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            accepted_media_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            allowed_mime_prefixes: vec!["image/".to_string()],
        }
    }
}

impl UploadConstraints {
    /// Default constraints with the size limit given in MiB
    pub fn with_max_size_mib(mib: u64) -> Self {
        Self {
            max_size_bytes: mib.saturating_mul(MIB),
            ..Self::default()
        }
    }

    /// Check a picked file against the limits.
    ///
    /// Size is checked before the media type, so an oversized non-image
    /// reports the size problem.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), ValidationError> {
        if file.size > self.max_size_bytes {
            return Err(ValidationError::OversizeFile {
                size: file.size,
                limit: self.max_size_bytes,
            });
        }

        let allowed = self
            .allowed_mime_prefixes
            .iter()
            .any(|prefix| file.media_type.starts_with(prefix.as_str()));

        if !allowed {
            return Err(ValidationError::UnsupportedMediaType {
                media_type: file.media_type.clone(),
            });
        }

        Ok(())
    }

    /// File extensions for the dialog filter, derived from the accepted
    /// media types (e.g. "image/jpeg" -> jpg, jpeg)
    pub fn accepted_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = Vec::new();
        for media_type in &self.accepted_media_types {
            if let Some(format) = ImageFormat::from_mime_type(media_type) {
                for ext in format.extensions_str() {
                    if !extensions.contains(ext) {
                        extensions.push(*ext);
                    }
                }
            }
        }
        extensions
    }

    /// Short hint shown in the empty drop target
    pub fn hint(&self) -> String {
        format!("PNG, JPG or WebP (Max {})", format_limit(self.max_size_bytes))
    }
}

/// Render a byte limit the way users read it: whole MiB as "5MB",
/// anything else in plain bytes
pub fn format_limit(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

fn limit_label(bytes: &u64) -> String {
    format_limit(*bytes)
}
