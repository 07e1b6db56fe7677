use iced::widget::{container, row, text};
use iced::{Border, Color, Element, Shadow, Theme, Vector};

use crate::notification::{Toast, ToastKind, ToastPhase};
use crate::Message;

fn accent(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::from_rgb8(0x10, 0xb9, 0x81),
        ToastKind::Error => Color::from_rgb8(0xef, 0x44, 0x44),
        ToastKind::Warning => Color::from_rgb8(0xf5, 0x9e, 0x0b),
        ToastKind::Info => Color::from_rgb8(0x3b, 0x82, 0xf6),
    }
}

/// The single toast, faded while its exit transition runs
pub fn view(toast: &Toast) -> Element<'_, Message> {
    let color = accent(toast.kind);
    let alpha = match toast.phase {
        ToastPhase::Showing => 1.0,
        ToastPhase::Leaving => 0.4,
    };

    let content = row![
        text(toast.kind.icon()).size(18),
        text(&toast.message).size(15),
    ]
    .spacing(10);

    container(content)
        .padding([12, 16])
        .max_width(380.0)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Color { a: alpha, ..color }.into()),
            text_color: Some(Color { a: alpha, ..Color::WHITE }),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.3 * alpha),
                offset: Vector::new(0.0, 4.0),
                blur_radius: 12.0,
            },
        })
        .into()
}
