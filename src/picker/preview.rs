/// Preview handles and selection state
///
/// A `PreviewHandle` is the widget's only resource: an image handle
/// pointing at the picked file. It is released by dropping it, and every
/// release is accounted for on the `PreviewLedger` it was minted from.

use iced::widget::image::Handle;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;
use url::Url;

/// Counts preview handles minted by one widget and how many are still alive.
///
/// Lives on the UI thread only, like the widget that owns it.
#[derive(Debug, Clone, Default)]
pub struct PreviewLedger {
    inner: Rc<LedgerInner>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    next_id: Cell<u64>,
    live: Cell<usize>,
}

impl PreviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview handle for an image on disk
    pub fn mint(&self, path: &Path) -> PreviewHandle {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        let live = self.inner.live.get() + 1;
        self.inner.live.set(live);

        debug!(id, live, path = %path.display(), "preview created");

        PreviewHandle {
            id,
            path: path.to_path_buf(),
            handle: Handle::from_path(path),
            ledger: self.clone(),
        }
    }

    /// Number of handles not yet released
    pub fn live(&self) -> usize {
        self.inner.live.get()
    }

    /// Number of handles ever minted
    pub fn minted(&self) -> u64 {
        self.inner.next_id.get()
    }
}

/// An ephemeral preview of a picked file, released on drop.
///
/// Not `Clone`: each handle is released exactly once.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    path: PathBuf,
    handle: Handle,
    ledger: PreviewLedger,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Image handle for rendering
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let live = self.ledger.inner.live.get() - 1;
        self.ledger.inner.live.set(live);
        debug!(id = self.id, live, "preview released");
    }
}

/// Where the displayed preview came from
#[derive(Debug)]
pub enum PreviewSource {
    /// Minted from a file the user just picked
    Local(PreviewHandle),
    /// Seeded from the caller's external value (an uploaded image)
    External {
        source: String,
        path: PathBuf,
        handle: Handle,
    },
}

impl PreviewSource {
    /// Preview for an external value. Accepts plain paths and `file://` URLs.
    pub fn external(source: &str) -> Self {
        let path = external_path(source);
        debug!(source, path = %path.display(), "external preview");

        Self::External {
            source: source.to_string(),
            handle: Handle::from_path(&path),
            path,
        }
    }

    pub fn handle(&self) -> &Handle {
        match self {
            PreviewSource::Local(preview) => preview.handle(),
            PreviewSource::External { handle, .. } => handle,
        }
    }
}

/// Resolve an external value to a path on disk.
///
/// `file://` URLs are decoded (percent escapes, drive letters); anything
/// that isn't a file URL is taken as a plain path.
pub fn external_path(source: &str) -> PathBuf {
    match Url::parse(source) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|()| PathBuf::from(source)),
        _ => PathBuf::from(source),
    }
}

/// The widget's selection: nothing, or something being previewed
#[derive(Debug, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    HasPreview(PreviewSource),
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionState::Empty)
    }

    pub fn preview(&self) -> Option<&PreviewSource> {
        match self {
            SelectionState::Empty => None,
            SelectionState::HasPreview(source) => Some(source),
        }
    }

    /// The external value currently shown, if the preview came from one
    pub fn external_source(&self) -> Option<&str> {
        match self {
            SelectionState::HasPreview(PreviewSource::External { source, .. }) => {
                Some(source.as_str())
            }
            _ => None,
        }
    }

    /// The locally minted preview, if any
    pub fn local(&self) -> Option<&PreviewHandle> {
        match self {
            SelectionState::HasPreview(PreviewSource::Local(preview)) => Some(preview),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_releases_handle() {
        let ledger = PreviewLedger::new();

        let first = ledger.mint(Path::new("/photos/a.png"));
        let second = ledger.mint(Path::new("/photos/b.png"));
        assert_eq!(ledger.live(), 2);
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);

        drop(first);
        assert_eq!(ledger.live(), 1);

        drop(second);
        assert_eq!(ledger.live(), 0);
        assert_eq!(ledger.minted(), 2);
    }

    #[test]
    fn test_replacing_state_releases_local_preview() {
        let ledger = PreviewLedger::new();
        let mut state = SelectionState::HasPreview(PreviewSource::Local(
            ledger.mint(Path::new("/photos/a.png")),
        ));
        assert_eq!(ledger.live(), 1);
        assert_eq!(state.local().map(|p| p.path()), Some(Path::new("/photos/a.png")));

        state = SelectionState::HasPreview(PreviewSource::external("file:///uploads/a.png"));
        assert_eq!(ledger.live(), 0);
        assert_eq!(state.external_source(), Some("file:///uploads/a.png"));
        assert!(state.local().is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_external_path_decodes_file_urls() {
        assert_eq!(
            external_path("file:///home/u/my%20photo.png"),
            PathBuf::from("/home/u/my photo.png")
        );
        assert_eq!(
            external_path("/uploads/plain.png"),
            PathBuf::from("/uploads/plain.png")
        );
        // Relative paths are not URLs
        assert_eq!(
            external_path("uploads/a b.png"),
            PathBuf::from("uploads/a b.png")
        );
    }
}
