use image::ImageFormat;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Media type reported for files whose extension is not a known image format
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A file the user picked, as handed to the caller.
///
/// This is the raw selection: nothing has been read or decoded yet,
/// the size and media type are what the filesystem reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Full path to the picked file
    pub path: PathBuf,
    /// Filename only (e.g., "cat.png")
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Media type derived from the extension (e.g., "image/png")
    pub media_type: String,
}

impl SelectedFile {
    pub fn new(path: PathBuf, size: u64, media_type: impl Into<String>) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Self {
            path,
            name,
            size,
            media_type: media_type.into(),
        }
    }

    /// Build a selection from a path on disk
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        }

        Ok(Self::new(path.to_path_buf(), metadata.len(), media_type_for(path)))
    }
}

/// Media type for a path, going by its extension the way browsers do
pub fn media_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}
