use iced::widget::{button, column, container, image, mouse_area, stack, text};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length, Theme};
use tracing::{info, warn};

use super::chooser::{FileChooser, FileFilter, NativeChooser};
use super::constraints::{UploadConstraints, ValidationError};
use super::file::SelectedFile;
use super::preview::{PreviewLedger, PreviewSource, SelectionState};

/// Height of the drop target / preview area
const AREA_HEIGHT: f32 = 160.0;

/// Opacity of the preview image while the overlay actions are shown
const HOVER_OPACITY: f32 = 0.4;

/// Widget messages (events)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// User clicked the area or "Change Image"
    Pick,
    /// User clicked the clear button
    Clear,
    /// Cursor entered (true) or left (false) the area
    Hovered(bool),
}

/// What happened, for the caller to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// A validated file was picked and is now previewed
    Selected(SelectedFile),
    /// The selection was cleared
    Cleared,
    /// A picked file failed validation, nothing changed
    Rejected(ValidationError),
}

/// Image picker with live preview
///
/// Owns the selection state and the hover flag. Everything else
/// (uploading, showing warnings) belongs to the caller, which gets an
/// [`Action`] back from every [`ImagePicker::update`].
pub struct ImagePicker<C: FileChooser = NativeChooser> {
    constraints: UploadConstraints,
    chooser: C,
    state: SelectionState,
    /// Last external value seen, used to detect changes
    external_value: Option<String>,
    hovered: bool,
    ledger: PreviewLedger,
}

impl ImagePicker<NativeChooser> {
    /// Picker backed by the native OS file dialog
    pub fn native(constraints: UploadConstraints) -> Self {
        Self::new(constraints, NativeChooser::new())
    }
}

impl<C: FileChooser> ImagePicker<C> {
    pub fn new(constraints: UploadConstraints, chooser: C) -> Self {
        Self {
            constraints,
            chooser,
            state: SelectionState::Empty,
            external_value: None,
            hovered: false,
            ledger: PreviewLedger::new(),
        }
    }

    /// Seed the preview from an already known image
    pub fn with_external_value(mut self, value: Option<String>) -> Self {
        self.set_external_value(value);
        self
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn external_value(&self) -> Option<&str> {
        self.external_value.as_deref()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Preview handles currently alive (0 or 1)
    pub fn live_previews(&self) -> usize {
        self.ledger.live()
    }

    /// Handle a widget message
    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Pick => self.pick(),
            Message::Clear => self.clear(),
            Message::Hovered(hovered) => {
                self.hovered = hovered;
                Action::None
            }
        }
    }

    /// Ask the chooser for a file and select it
    pub fn pick(&mut self) -> Action {
        let filter = FileFilter {
            label: "Images".to_string(),
            extensions: self.constraints.accepted_extensions(),
        };

        match self.chooser.choose_file(&filter) {
            Some(file) => self.select(file),
            None => Action::None,
        }
    }

    /// Validate a file and, if it passes, preview it
    pub fn select(&mut self, file: SelectedFile) -> Action {
        if let Err(e) = self.constraints.validate(&file) {
            warn!(file = %file.name, size = file.size, media_type = %file.media_type, "selection rejected: {}", e);
            return Action::Rejected(e);
        }

        // Release the old preview before minting its replacement
        self.state = SelectionState::Empty;
        let preview = self.ledger.mint(&file.path);
        self.state = SelectionState::HasPreview(PreviewSource::Local(preview));

        info!(file = %file.name, size = file.size, "image selected");
        Action::Selected(file)
    }

    /// Drop the current preview and reset the chooser
    pub fn clear(&mut self) -> Action {
        self.state = SelectionState::Empty;
        self.chooser.reset();

        info!("selection cleared");
        Action::Cleared
    }

    /// Resynchronize with the caller's external value.
    ///
    /// Only a changed value has an effect; when it does, it overrides any
    /// local preview. An empty string counts as absent.
    pub fn set_external_value(&mut self, value: Option<String>) {
        if self.external_value == value {
            return;
        }

        self.state = SelectionState::Empty;
        if let Some(source) = value.as_deref().filter(|s| !s.is_empty()) {
            self.state = SelectionState::HasPreview(PreviewSource::external(source));
        }

        info!(value = ?value, "external value synced");
        self.external_value = value;
    }

    /// Build the widget's view
    pub fn view(&self) -> Element<'_, Message> {
        let has_preview = !self.state.is_empty();
        let hovered = self.hovered;

        let body: Element<'_, Message> = match self.state.preview() {
            Some(source) => self.preview_view(source),
            None => self.empty_view(),
        };

        let area = container(body)
            .width(Length::Fill)
            .height(Length::Fixed(AREA_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(AREA_HEIGHT))
            .style(move |theme: &Theme| area_style(theme, has_preview, hovered));

        mouse_area(area)
            .on_press(Message::Pick)
            .on_enter(Message::Hovered(true))
            .on_exit(Message::Hovered(false))
            .into()
    }

    fn empty_view(&self) -> Element<'_, Message> {
        column![
            text("Click to upload image").size(14),
            text(self.constraints.hint()).size(12).style(text::secondary),
        ]
        .spacing(4)
        .padding(24)
        .align_x(Alignment::Center)
        .into()
    }

    fn preview_view<'a>(&'a self, source: &'a PreviewSource) -> Element<'a, Message> {
        let picture = image(source.handle().clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .opacity(if self.hovered { HOVER_OPACITY } else { 1.0 });

        if !self.hovered {
            return picture.into();
        }

        // The clear button captures its own press, so it never also picks
        let actions = column![
            button(text("Change Image").size(14))
                .style(button::secondary)
                .on_press(Message::Pick),
            button(text("Remove").size(12))
                .style(button::danger)
                .on_press(Message::Clear),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        stack![
            picture,
            container(actions)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        ]
        .into()
    }
}

/// Border and background of the area: accent when previewing or hovered
fn area_style(theme: &Theme, has_preview: bool, hovered: bool) -> container::Style {
    let palette = theme.extended_palette();
    let accent = palette.primary.base.color;

    let (border_color, background) = if has_preview {
        (Color { a: 0.5, ..accent }, Some(Color { a: 0.05, ..accent }))
    } else if hovered {
        (Color { a: 0.5, ..accent }, Some(palette.background.weak.color))
    } else {
        (palette.background.strong.color, None)
    };

    container::Style {
        background: background.map(Background::Color),
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::constraints::MIB;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Chooser that hands out queued answers and records what it was asked
    #[derive(Default)]
    struct ScriptedChooser {
        answers: VecDeque<Option<SelectedFile>>,
        filters: Vec<FileFilter>,
        resets: usize,
    }

    impl ScriptedChooser {
        fn answering(answers: impl IntoIterator<Item = Option<SelectedFile>>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    impl FileChooser for ScriptedChooser {
        fn choose_file(&mut self, filter: &FileFilter) -> Option<SelectedFile> {
            self.filters.push(filter.clone());
            self.answers.pop_front().flatten()
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn png(name: &str, size: u64) -> SelectedFile {
        SelectedFile::new(PathBuf::from("/photos").join(name), size, "image/png")
    }

    fn picker(answers: Vec<Option<SelectedFile>>) -> ImagePicker<ScriptedChooser> {
        ImagePicker::new(UploadConstraints::default(), ScriptedChooser::answering(answers))
    }

    #[test]
    fn test_valid_pick_previews_and_reports_once() {
        let file = png("cat.png", 1024);
        let mut picker = picker(vec![Some(file.clone())]);

        let action = picker.update(Message::Pick);

        assert_eq!(action, Action::Selected(file));
        assert!(picker.state().local().is_some());
        assert_eq!(picker.live_previews(), 1);
        assert_eq!(
            picker.chooser.filters[0].extensions,
            vec!["jpg", "jpeg", "png", "webp"]
        );
    }

    #[test]
    fn test_cancelled_dialog_changes_nothing() {
        let mut picker = picker(vec![None]);
        assert_eq!(picker.update(Message::Pick), Action::None);
        assert!(picker.state().is_empty());
        assert_eq!(picker.live_previews(), 0);
    }

    #[test]
    fn test_size_boundary_at_default_limit() {
        let exact = png("exact.png", 5 * MIB);
        let over = png("over.png", 5 * MIB + 1);
        let mut picker = picker(vec![Some(exact.clone()), Some(over)]);

        assert_eq!(picker.update(Message::Pick), Action::Selected(exact));

        match picker.update(Message::Pick) {
            Action::Rejected(e) => {
                assert_eq!(e.to_string(), "File size exceeds the limit of 5MB");
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        // The accepted file is still the one previewed
        let preview = picker.state().local().unwrap();
        assert_eq!(preview.path(), PathBuf::from("/photos/exact.png"));
        assert_eq!(picker.live_previews(), 1);
    }

    #[test]
    fn test_non_image_rejected_state_unchanged() {
        let pdf = SelectedFile::new(PathBuf::from("/docs/cv.pdf"), 100, "application/pdf");
        let mut picker = picker(vec![Some(pdf)]);

        let action = picker.update(Message::Pick);

        assert!(matches!(
            action,
            Action::Rejected(ValidationError::UnsupportedMediaType { .. })
        ));
        assert!(picker.state().is_empty());
        assert_eq!(picker.ledger.minted(), 0);
    }

    #[test]
    fn test_reselection_replaces_without_leaking() {
        let first = png("first.png", 10);
        let second = png("second.png", 20);
        let mut picker = picker(vec![Some(first.clone()), Some(second.clone())]);

        assert_eq!(picker.update(Message::Pick), Action::Selected(first));
        let first_id = picker.state().local().unwrap().id();

        assert_eq!(picker.update(Message::Pick), Action::Selected(second));
        let preview = picker.state().local().unwrap();
        assert_ne!(preview.id(), first_id);
        assert_eq!(preview.path(), PathBuf::from("/photos/second.png"));

        assert_eq!(picker.ledger.minted(), 2);
        assert_eq!(picker.live_previews(), 1);
    }

    #[test]
    fn test_clear_empties_and_resets_chooser() {
        let mut picker = picker(vec![Some(png("cat.png", 10))]);
        picker.update(Message::Pick);

        assert_eq!(picker.update(Message::Clear), Action::Cleared);
        assert!(picker.state().is_empty());
        assert_eq!(picker.live_previews(), 0);
        assert_eq!(picker.chooser.resets, 1);
    }

    #[test]
    fn test_clear_from_external_preview() {
        let mut picker = picker(vec![])
            .with_external_value(Some("/uploads/avatar.png".to_string()));
        assert!(!picker.state().is_empty());

        assert_eq!(picker.update(Message::Clear), Action::Cleared);
        assert!(picker.state().is_empty());
    }

    #[test]
    fn test_same_file_can_be_picked_after_clear() {
        let file = png("cat.png", 10);
        let mut picker = picker(vec![Some(file.clone()), Some(file.clone())]);

        picker.update(Message::Pick);
        picker.update(Message::Clear);
        assert_eq!(picker.update(Message::Pick), Action::Selected(file));
        assert_eq!(picker.live_previews(), 1);
    }

    #[test]
    fn test_external_value_overrides_local_selection() {
        let mut picker = picker(vec![Some(png("local.png", 10))]);
        picker.update(Message::Pick);
        assert_eq!(picker.live_previews(), 1);

        picker.set_external_value(Some("file:///uploads/a.png".to_string()));
        assert_eq!(picker.state().external_source(), Some("file:///uploads/a.png"));
        assert_eq!(picker.live_previews(), 0);

        picker.set_external_value(Some("/uploads/b.png".to_string()));
        assert_eq!(picker.state().external_source(), Some("/uploads/b.png"));

        picker.set_external_value(None);
        assert!(picker.state().is_empty());
        assert_eq!(picker.external_value(), None);
    }

    #[test]
    fn test_unchanged_external_value_keeps_local_preview() {
        let mut picker = picker(vec![Some(png("local.png", 10))])
            .with_external_value(Some("/uploads/a.png".to_string()));

        picker.update(Message::Pick);
        picker.set_external_value(Some("/uploads/a.png".to_string()));

        assert!(picker.state().local().is_some());
    }

    #[test]
    #[cfg(unix)]
    fn test_external_file_url_is_decoded() {
        let picker = picker(vec![])
            .with_external_value(Some("file:///home/u/my%20photo.png".to_string()));

        match picker.state().preview() {
            Some(PreviewSource::External { source, path, .. }) => {
                assert_eq!(source, "file:///home/u/my%20photo.png");
                assert_eq!(path, &PathBuf::from("/home/u/my photo.png"));
            }
            other => panic!("expected external preview, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_external_value_is_absent() {
        let picker = picker(vec![]).with_external_value(Some(String::new()));
        assert!(picker.state().is_empty());
    }

    #[test]
    fn test_drop_releases_preview() {
        let mut picker = picker(vec![Some(png("cat.png", 10))]);
        picker.update(Message::Pick);

        let ledger = picker.ledger.clone();
        assert_eq!(ledger.live(), 1);

        drop(picker);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn test_hover_is_presentational() {
        let mut picker = picker(vec![]);

        assert_eq!(picker.update(Message::Hovered(true)), Action::None);
        assert!(picker.is_hovered());
        assert!(picker.state().is_empty());

        picker.update(Message::Hovered(false));
        assert!(!picker.is_hovered());
    }

    #[test]
    fn test_custom_limit() {
        let file = png("big.png", 3 * MIB);
        let mut picker = ImagePicker::new(
            UploadConstraints::with_max_size_mib(2),
            ScriptedChooser::answering(vec![Some(file)]),
        );

        match picker.update(Message::Pick) {
            Action::Rejected(e) => assert!(e.to_string().contains("2MB")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
