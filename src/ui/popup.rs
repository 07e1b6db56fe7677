use iced::widget::{button, column, container, row, text, Column};
use iced::{Border, Color, Element, Length, Theme};
use iced_aw::Wrap;

use crate::state::data::{Coordinate, FacilityRecord};
use crate::Message;

/// Services listed before collapsing the rest into "+N more"
const MAX_SERVICE_TAGS: usize = 5;

/// Everything a popup card shows, independent of how it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub subtitle: String,
    pub details: Vec<(&'static str, String)>,
    pub tags: Vec<String>,
}

impl PopupContent {
    pub fn facility(record: &FacilityRecord) -> Self {
        let mut details = vec![
            ("Address", record.address.clone()),
            ("Contact", record.contact.clone()),
        ];
        if let Some(emergency) = &record.emergency {
            details.push(("Emergency", emergency.clone()));
        }
        details.push(("Hours", record.hours.clone()));

        let mut tags: Vec<String> = record
            .services
            .iter()
            .take(MAX_SERVICE_TAGS)
            .cloned()
            .collect();
        if record.services.len() > MAX_SERVICE_TAGS {
            tags.push(format!("+{} more", record.services.len() - MAX_SERVICE_TAGS));
        }

        Self {
            title: record.name.clone(),
            subtitle: record.kind.label().to_string(),
            details,
            tags,
        }
    }

    pub fn user_location(position: Coordinate) -> Self {
        Self {
            title: "Your current location".to_string(),
            subtitle: position.to_string(),
            details: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Popup card shown over the map
pub fn view(content: PopupContent) -> Element<'static, Message> {
    let header = row![
        text(content.title).size(18).width(Length::Fill),
        button(text("×").size(16))
            .on_press(Message::ClosePopup)
            .style(button::text)
            .padding([0, 6]),
    ];

    let mut body: Column<'static, Message> = column![header, text(content.subtitle).size(13)].spacing(6);

    for (label, value) in content.details {
        body = body.push(text(format!("{label}: {value}")).size(13));
    }

    if !content.tags.is_empty() {
        let tags: Vec<Element<'static, Message>> = content
            .tags
            .into_iter()
            .map(|tag| {
                container(text(tag).size(12))
                    .padding([2, 8])
                    .style(tag_style)
                    .into()
            })
            .collect();

        body = body
            .push(text("Services:").size(13))
            .push(Wrap::with_elements(tags).spacing(4.0).line_spacing(4.0));
    }

    container(body)
        .padding(14)
        .max_width(320.0)
        .style(container::rounded_box)
        .into()
}

fn tag_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.primary.weak.color.into()),
        text_color: Some(palette.primary.weak.text),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 10.0.into(),
        },
        ..container::Style::default()
    }
}
