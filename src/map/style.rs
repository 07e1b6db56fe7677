use iced::Color;

use crate::state::data::FacilityKind;

/// Marker appearance for one facility kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill: Color,
    pub border: Color,
    /// Single glyph drawn in the middle of the marker
    pub glyph: &'static str,
}

/// Marker diameter in logical pixels
pub const MARKER_SIZE: f32 = 40.0;

impl MarkerStyle {
    pub fn for_kind(kind: FacilityKind) -> Self {
        match kind {
            FacilityKind::Hospital => Self {
                fill: Color::from_rgb8(0xef, 0x44, 0x44),
                border: Color::from_rgb8(0xdc, 0x26, 0x26),
                glyph: "H",
            },
            FacilityKind::Clinic => Self {
                fill: Color::from_rgb8(0x06, 0xb6, 0xd4),
                border: Color::from_rgb8(0x08, 0x91, 0xb2),
                glyph: "+",
            },
            FacilityKind::HealthCenter => Self {
                fill: Color::from_rgb8(0xf5, 0x9e, 0x0b),
                border: Color::from_rgb8(0xd9, 0x77, 0x06),
                glyph: "C",
            },
        }
    }

    /// The user-location marker
    pub fn user_location() -> Self {
        Self {
            fill: Color::from_rgb8(0x3b, 0x82, 0xf6),
            border: Color::WHITE,
            glyph: "",
        }
    }
}
