/// Map surface
///
/// `MapState` is the in-process map: a viewport, one marker binding per
/// facility, at most one open popup and at most one user-location marker.
/// The canvas in `ui::map_canvas` only reads it.

pub mod projection;
pub mod style;

use tracing::trace;

use crate::config::MapConfig;
use crate::state::data::{Coordinate, FacilityId, FacilityKind, FacilityRecord};

/// What a popup is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTarget {
    Facility(FacilityId),
    UserLocation,
}

/// Map capabilities the controller and the view synchronizer rely on
pub trait MapSurface {
    fn is_attached(&self, id: FacilityId) -> bool;

    /// Attach a facility marker. Unknown ids and attached markers are no-ops.
    fn attach(&mut self, id: FacilityId);

    /// Detach a facility marker. Unknown ids and detached markers are no-ops.
    fn detach(&mut self, id: FacilityId);

    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);

    fn open_popup(&mut self, target: PopupTarget);
    fn close_popup(&mut self);

    /// Replace (or with `None`, remove) the user-location marker
    fn set_user_marker(&mut self, position: Option<Coordinate>);
}

/// One facility paired with its marker for the lifetime of the app
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerBinding {
    pub facility: FacilityId,
    pub kind: FacilityKind,
    pub position: Coordinate,
    attached: bool,
}

#[derive(Debug, Clone)]
pub struct MapState {
    center: Coordinate,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    markers: Vec<MarkerBinding>,
    popup: Option<PopupTarget>,
    user_marker: Option<Coordinate>,
    /// Number of attach/detach calls that actually changed a marker
    mutations: u64,
}

impl MapState {
    /// Create the map and a detached marker binding for every record
    pub fn new(config: &MapConfig, records: &[FacilityRecord]) -> Self {
        let markers = records
            .iter()
            .map(|record| MarkerBinding {
                facility: record.id,
                kind: record.kind,
                position: record.coordinate(),
                attached: false,
            })
            .collect();

        let max_zoom = config.tiles.max_zoom;
        let min_zoom = config.min_zoom.min(max_zoom);

        Self {
            center: config.default_center,
            zoom: config.default_zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            markers,
            popup: None,
            user_marker: None,
            mutations: 0,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[cfg(test)]
    pub fn markers(&self) -> &[MarkerBinding] {
        &self.markers
    }

    pub fn attached_markers(&self) -> impl Iterator<Item = &MarkerBinding> {
        self.markers.iter().filter(|marker| marker.attached)
    }

    pub fn popup(&self) -> Option<PopupTarget> {
        self.popup
    }

    pub fn user_marker(&self) -> Option<Coordinate> {
        self.user_marker
    }

    #[cfg(test)]
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Move the viewport by a screen-space delta (drag to pan)
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let (x, y) = projection::project(self.center, self.zoom);
        self.center = projection::unproject(x - dx as f64, y - dy as f64, self.zoom);
    }

    fn binding_mut(&mut self, id: FacilityId) -> Option<&mut MarkerBinding> {
        self.markers.iter_mut().find(|marker| marker.facility == id)
    }
}

impl MapSurface for MapState {
    fn is_attached(&self, id: FacilityId) -> bool {
        self.markers
            .iter()
            .any(|marker| marker.facility == id && marker.attached)
    }

    fn attach(&mut self, id: FacilityId) {
        if let Some(marker) = self.binding_mut(id) {
            if !marker.attached {
                marker.attached = true;
                self.mutations += 1;
            }
        }
    }

    fn detach(&mut self, id: FacilityId) {
        let Some(marker) = self.binding_mut(id) else {
            return;
        };
        if !marker.attached {
            return;
        }
        marker.attached = false;
        self.mutations += 1;

        // A removed marker takes its popup with it
        if self.popup == Some(PopupTarget::Facility(id)) {
            self.popup = None;
        }
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        trace!(%center, zoom = self.zoom, "set view");
    }

    fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(self.max_zoom);
    }

    fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(self.min_zoom);
    }

    fn open_popup(&mut self, target: PopupTarget) {
        let available = match target {
            PopupTarget::Facility(id) => self.is_attached(id),
            PopupTarget::UserLocation => self.user_marker.is_some(),
        };

        if available {
            self.popup = Some(target);
        }
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn set_user_marker(&mut self, position: Option<Coordinate>) {
        if self.popup == Some(PopupTarget::UserLocation) {
            self.popup = None;
        }
        self.user_marker = position;
    }
}
