/// Image picker widget
///
/// This module handles:
/// - Validating picked files against caller limits (constraints.rs)
/// - The picked file handed to the caller (file.rs)
/// - Asking the OS for a file (chooser.rs)
/// - Preview handles and selection state (preview.rs)
/// - The iced widget itself (widget.rs)

pub mod chooser;
pub mod constraints;
pub mod file;
pub mod preview;
pub mod widget;

pub use constraints::UploadConstraints;
pub use widget::{Action, ImagePicker, Message};
