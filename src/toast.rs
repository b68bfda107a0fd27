/// Warning notifications shown by the demo app
///
/// The picker only reports rejections; surfacing them is up to the caller.

use iced::widget::{button, column, container, row, text, Column};
use iced::{Alignment, Background, Border, Element, Length, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
}

/// Stack of visible toasts, newest last
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    /// Show a toast, returns its id for later dismissal
    pub fn push(&mut self, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            text: text.into(),
        });
        self.next_id
    }

    /// Remove a toast. Unknown ids (already dismissed) are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn view<'a, Message: Clone + 'a>(
        &'a self,
        on_dismiss: impl Fn(u64) -> Message,
    ) -> Element<'a, Message> {
        let toasts: Column<'a, Message> = column(self.items.iter().map(|toast| {
            container(
                row![
                    text(toast.text.as_str()).size(14).width(Length::Fill),
                    button(text("Dismiss").size(12))
                        .style(button::text)
                        .on_press(on_dismiss(toast.id)),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            )
            .padding(10)
            .width(Length::Fill)
            .style(warning_style)
            .into()
        }))
        .spacing(6);

        toasts.into()
    }
}

fn warning_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.danger.weak.text),
        background: Some(Background::Color(palette.danger.weak.color)),
        border: Border {
            radius: 8.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}
