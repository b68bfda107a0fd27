/// The file-picking capability the widget depends on
///
/// The widget never talks to the OS dialog directly. It asks a
/// `FileChooser` for a file, so tests can script the answers.

use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::file::SelectedFile;

/// What the dialog should offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Label shown in the dialog's filter dropdown
    pub label: String,
    /// Extensions without the leading dot
    pub extensions: Vec<&'static str>,
}

/// Something that can ask the user for a single file
pub trait FileChooser {
    /// Ask for one file. `None` means the user cancelled.
    fn choose_file(&mut self, filter: &FileFilter) -> Option<SelectedFile>;

    /// Forget any retained selection so the next dialog starts fresh
    fn reset(&mut self) {}
}

/// Native OS dialog via rfd
#[derive(Debug, Default)]
pub struct NativeChooser {
    /// Folder of the last picked file, the next dialog opens there
    last_directory: Option<PathBuf>,
}

impl NativeChooser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileChooser for NativeChooser {
    fn choose_file(&mut self, filter: &FileFilter) -> Option<SelectedFile> {
        let mut dialog = FileDialog::new()
            .set_title("Select Image")
            .add_filter(filter.label.as_str(), filter.extensions.as_slice());

        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }

        let path = dialog.pick_file()?;
        self.last_directory = path.parent().map(|p| p.to_path_buf());

        match SelectedFile::from_path(&path) {
            Ok(file) => {
                debug!(path = %path.display(), size = file.size, "file picked");
                Some(file)
            }
            Err(e) => {
                // Vanished between the dialog closing and us looking at it
                warn!(path = %path.display(), error = %e, "picked file is unreadable");
                None
            }
        }
    }

    fn reset(&mut self) {
        self.last_directory = None;
    }
}
