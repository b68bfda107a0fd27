/// Native image picker widget for iced
///
/// - `picker`: the widget, its constraints, chooser and preview handles
/// - `app_config`: JSON configuration for the demo application
/// - `toast`: warning notifications a caller can show for rejected picks

pub mod app_config;
pub mod picker;
pub mod toast;
