/// Map canvas
///
/// Draws the tile grid, the attached facility markers, the user-location
/// marker and the tile attribution for a `MapState`. Dragging pans, the wheel
/// zooms, and a click without drag selects a marker or closes the popup.
use iced::alignment;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Path, Program, Stroke, Text};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::map::projection::{self, TILE_SIZE};
use crate::map::style::{MarkerStyle, MARKER_SIZE};
use crate::map::{MapState, PopupTarget};
use crate::state::data::Coordinate;
use crate::Message;

/// Cursor travel (in pixels) after which a press counts as a drag
const DRAG_THRESHOLD: f32 = 4.0;

const LAND: Color = Color::from_rgb(0.93, 0.94, 0.91);
const GRID: Color = Color::from_rgb(0.84, 0.86, 0.82);

pub struct MapCanvas<'a> {
    pub map: &'a MapState,
    pub attribution: &'a str,
}

impl MapCanvas<'_> {
    /// Screen position (relative to the canvas) of a coordinate
    fn to_screen(&self, coordinate: Coordinate, size: Size) -> Point {
        let zoom = self.map.zoom();
        let (cx, cy) = projection::project(self.map.center(), zoom);
        let (x, y) = projection::project(coordinate, zoom);

        Point::new(
            (x - cx) as f32 + size.width / 2.0,
            (y - cy) as f32 + size.height / 2.0,
        )
    }

    /// Topmost marker under `position`
    fn hit_test(&self, position: Point, size: Size) -> Option<PopupTarget> {
        if let Some(user) = self.map.user_marker() {
            if self.to_screen(user, size).distance(position) <= USER_MARKER_RADIUS + 4.0 {
                return Some(PopupTarget::UserLocation);
            }
        }

        // Markers are drawn in store order, so the last hit is on top
        self.map
            .attached_markers()
            .filter(|marker| {
                let body = marker_body_center(self.to_screen(marker.position, size));
                body.distance(position) <= MARKER_SIZE / 2.0
            })
            .last()
            .map(|marker| PopupTarget::Facility(marker.facility))
    }

    fn draw_grid(&self, frame: &mut Frame, size: Size) {
        let (cx, cy) = projection::project(self.map.center(), self.map.zoom());
        let left = cx - size.width as f64 / 2.0;
        let top = cy - size.height as f64 / 2.0;
        let tile = TILE_SIZE as f32;

        let mut x = -(left.rem_euclid(TILE_SIZE)) as f32;
        while x < size.width {
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
                Stroke::default().with_color(GRID).with_width(1.0),
            );
            x += tile;
        }

        let mut y = -(top.rem_euclid(TILE_SIZE)) as f32;
        while y < size.height {
            frame.stroke(
                &Path::line(Point::new(0.0, y), Point::new(size.width, y)),
                Stroke::default().with_color(GRID).with_width(1.0),
            );
            y += tile;
        }
    }

    fn draw_attribution(&self, frame: &mut Frame, size: Size) {
        // Rough width estimate; the canvas has no text measurement
        let width = self.attribution.chars().count() as f32 * 6.5 + 12.0;
        let height = 18.0;
        let origin = Point::new(size.width - width, size.height - height);

        frame.fill_rectangle(origin, Size::new(width, height), Color::from_rgba(1.0, 1.0, 1.0, 0.8));
        frame.fill_text(Text {
            content: self.attribution.to_string(),
            position: Point::new(size.width - 6.0, size.height - height / 2.0),
            color: Color::from_rgb(0.2, 0.2, 0.2),
            size: Pixels(11.0),
            horizontal_alignment: alignment::Horizontal::Right,
            vertical_alignment: alignment::Vertical::Center,
            ..Text::default()
        });
    }
}

const USER_MARKER_RADIUS: f32 = 9.0;

/// Markers are anchored at their bottom center, like a pin
fn marker_body_center(anchor: Point) -> Point {
    anchor - Vector::new(0.0, MARKER_SIZE / 2.0)
}

impl Program<Message> for MapCanvas<'_> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let size = bounds.size();
        let mut frame = Frame::new(renderer, size);

        frame.fill_rectangle(Point::ORIGIN, size, LAND);
        self.draw_grid(&mut frame, size);

        let popup = self.map.popup();
        for marker in self.map.attached_markers() {
            let style = MarkerStyle::for_kind(marker.kind);
            let anchor = self.to_screen(marker.position, size);
            let body = marker_body_center(anchor);
            let radius = MARKER_SIZE / 2.0 - 2.0;

            // Pin tip
            frame.fill(&Path::circle(anchor, 3.0), style.border);

            if popup == Some(PopupTarget::Facility(marker.facility)) {
                frame.fill(&Path::circle(body, radius + 6.0), Color { a: 0.35, ..style.fill });
            }

            let circle = Path::circle(body, radius);
            frame.fill(&circle, style.fill);
            frame.stroke(&circle, Stroke::default().with_color(style.border).with_width(3.0));

            frame.fill_text(Text {
                content: style.glyph.to_string(),
                position: body,
                color: Color::WHITE,
                size: Pixels(16.0),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Center,
                ..Text::default()
            });
        }

        if let Some(user) = self.map.user_marker() {
            let style = MarkerStyle::user_location();
            let center = self.to_screen(user, size);

            frame.fill(&Path::circle(center, USER_MARKER_RADIUS * 3.0), Color { a: 0.2, ..style.fill });
            let dot = Path::circle(center, USER_MARKER_RADIUS);
            frame.fill(&dot, style.fill);
            frame.stroke(&dot, Stroke::default().with_color(style.border).with_width(3.0));
        }

        self.draw_attribution(&mut frame, size);

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse wheel steps the zoom level
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if !cursor.is_over(bounds) {
                    return (canvas::event::Status::Ignored, None);
                }
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                let message = if y > 0.0 {
                    Message::ZoomIn
                } else if y < 0.0 {
                    Message::ZoomOut
                } else {
                    return (canvas::event::Status::Ignored, None);
                };
                return (canvas::event::Status::Captured, Some(message));
            }

            // Mouse button press - start a possible drag
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    state.travelled = 0.0;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - a press that did not travel is a click
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !state.is_dragging {
                    return (canvas::event::Status::Ignored, None);
                }
                let was_click = state.travelled < DRAG_THRESHOLD;
                *state = DragState::default();

                if was_click {
                    if let Some(pos) = cursor.position_in(bounds) {
                        let message = match self.hit_test(pos, bounds.size()) {
                            Some(target) => Message::MarkerClicked(target),
                            None => Message::MapClicked,
                        };
                        return (canvas::event::Status::Captured, Some(message));
                    }
                }
                return (canvas::event::Status::Captured, None);
            }

            // Mouse move - pan if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_dragging {
                    if let Some(last_pos) = state.last_position {
                        let delta = position - last_pos;
                        state.travelled += delta.x.abs() + delta.y.abs();
                        state.last_position = Some(position);

                        if state.travelled >= DRAG_THRESHOLD {
                            return (canvas::event::Status::Captured, Some(Message::Pan(delta)));
                        }
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging && state.travelled >= DRAG_THRESHOLD {
            return mouse::Interaction::Grabbing;
        }

        match cursor.position_in(bounds) {
            Some(pos) if self.hit_test(pos, bounds.size()).is_some() => mouse::Interaction::Pointer,
            Some(_) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
    /// Manhattan distance moved since the press
    pub travelled: f32,
}
