use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use image_picker::app_config::AppConfig;
use image_picker::picker::{self, file::SelectedFile, Action, ImagePicker};
use image_picker::toast::Toasts;

/// Demo application hosting a single image picker
struct PickerDemo {
    /// The widget under demonstration
    picker: ImagePicker,
    /// Warnings reported by the picker
    toasts: Toasts,
    /// How long a toast stays before dismissing itself
    toast_duration: Duration,
    /// Last file the picker handed us
    selected: Option<SelectedFile>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Something happened inside the picker
    Picker(picker::Message),
    /// Pretend the selected file was uploaded: feed it back as the external value
    MarkUploaded,
    /// Drop the external value
    ForgetUpload,
    /// A toast was dismissed by the user or its timer
    DismissToast(u64),
}

impl PickerDemo {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load_or_default();
        info!(max_size_mib = config.max_size_mib, "image picker starting");

        (PickerDemo::with_config(&config), Task::none())
    }

    fn with_config(config: &AppConfig) -> Self {
        let picker = ImagePicker::native(config.constraints())
            .with_external_value(config.initial_image.clone());

        PickerDemo {
            picker,
            toasts: Toasts::default(),
            toast_duration: Duration::from_secs(config.toast_seconds),
            selected: None,
            status: "No image selected.".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Picker(message) => {
                let action = self.picker.update(message);
                self.perform(action)
            }
            Message::MarkUploaded => {
                if let Some(file) = &self.selected {
                    match Url::from_file_path(&file.path) {
                        Ok(url) => {
                            self.status = format!("Uploaded as {}", url);
                            self.picker.set_external_value(Some(url.to_string()));
                        }
                        Err(()) => {
                            warn!(path = %file.path.display(), "cannot express path as a file URL");
                        }
                    }
                }
                Task::none()
            }
            Message::ForgetUpload => {
                self.picker.set_external_value(None);
                self.status = "Upload forgotten.".to_string();
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
        }
    }

    /// React to what the picker reported, scheduling a toast dismissal if needed
    fn perform(&mut self, action: Action) -> Task<Message> {
        match self.apply(action) {
            Some(id) => Task::perform(tokio::time::sleep(self.toast_duration), move |_| {
                Message::DismissToast(id)
            }),
            None => Task::none(),
        }
    }

    /// Update status and toasts for a picker action.
    /// Returns the id of a newly shown toast.
    fn apply(&mut self, action: Action) -> Option<u64> {
        debug!(live_previews = self.picker.live_previews(), "picker action: {:?}", action);

        match action {
            Action::None => None,
            Action::Selected(file) => {
                self.status = format!("Selected {} ({} bytes, {})", file.name, file.size, file.media_type);
                self.selected = Some(file);
                None
            }
            Action::Cleared => {
                self.status = "Selection cleared.".to_string();
                self.selected = None;
                None
            }
            Action::Rejected(error) => Some(self.toasts.push(error.to_string())),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let upload_controls = row![
            button("Mark as uploaded")
                .on_press_maybe(self.selected.as_ref().map(|_| Message::MarkUploaded))
                .padding(8),
            button("Forget upload")
                .on_press_maybe(self.picker.external_value().map(|_| Message::ForgetUpload))
                .padding(8),
        ]
        .spacing(10);

        let content: Column<'_, Message> = column![
            text("Image Picker").size(32),
            self.picker.view().map(Message::Picker),
            text(&self.status).size(14),
            upload_controls,
            self.toasts.view(Message::DismissToast),
        ]
        .spacing(20)
        .padding(40)
        .max_width(480)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    iced::application("Image Picker", PickerDemo::update, PickerDemo::view)
        .theme(PickerDemo::theme)
        .centered()
        .run_with(PickerDemo::new)
}
