/// Interaction controller
///
/// Owns the interaction state, the map, the list panel, the locate control and
/// the notification surface. Every UI event is one method; methods return the
/// side effects the GUI shell has to schedule (timers, location requests).
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::MapConfig;
use crate::geolocation::{Fix, GeolocationFlow, LocateOptions, LocateStart, LocationError};
use crate::map::{MapState, MapSurface, PopupTarget};
use crate::notification::{Notifications, ToastId, ToastKind};
use crate::state::data::{FacilityId, FacilityRecord};
use crate::state::interaction::{Filter, InteractionState};
use crate::state::store::{FacilityStore, Statistics};
use crate::sync::{self, FacilityList, SyncReport};

/// Delay between centering on a facility and opening its popup.
/// `MapSurface::set_view` is immediate, so this only has to outlast the
/// next redraw; it is not tied to an animation.
pub const POPUP_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Work the GUI shell performs on behalf of the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call [`Controller::toast_expired`] after the display duration
    ExpireToast(ToastId),
    /// Call [`Controller::popup_settled`] once the view has settled
    OpenPopupWhenSettled(FacilityId),
    /// Run a location request and report back via [`Controller::location_resolved`]
    RequestLocation(LocateOptions),
}

pub struct Controller {
    store: FacilityStore,
    map: MapState,
    list: FacilityList,
    state: InteractionState,
    geolocation: GeolocationFlow,
    notifications: Notifications,
    config: MapConfig,
}

impl Controller {
    /// Build the controller with every marker attached and the full list rendered
    pub fn new(store: FacilityStore, config: MapConfig, location_supported: bool) -> Self {
        let map = MapState::new(&config, store.records());

        let mut controller = Self {
            store,
            map,
            list: FacilityList::default(),
            state: InteractionState::default(),
            geolocation: GeolocationFlow::new(location_supported, LocateOptions::default()),
            notifications: Notifications::default(),
            config,
        };
        controller.resync();

        info!(
            facilities = controller.store.len(),
            location_supported, "controller ready"
        );
        controller
    }

    // ---- Read access for the views ----

    #[cfg(test)]
    pub fn store(&self) -> &FacilityStore {
        &self.store
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn list(&self) -> &FacilityList {
        &self.list
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn geolocation(&self) -> &GeolocationFlow {
        &self.geolocation
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn statistics(&self) -> Statistics {
        self.store.statistics()
    }

    pub fn tile_attribution(&self) -> &str {
        &self.config.tiles.attribution
    }

    /// Record shown in the open popup, if the popup belongs to a facility
    pub fn popup_facility(&self) -> Option<&FacilityRecord> {
        match self.map.popup()? {
            PopupTarget::Facility(id) => self.store.get(id),
            PopupTarget::UserLocation => None,
        }
    }

    // ---- Events ----

    /// The search field changed
    pub fn search(&mut self, text: String) -> Vec<Effect> {
        self.state.search_text = text;
        let mut effects = Vec::new();

        self.resync();
        if !self.state.is_searching() {
            return effects;
        }
        let term = self.state.search_term();

        // The count covers every category, the list only the active one
        let matches = sync::compute_visible(self.store.records(), Filter::All, &term).len();
        if matches > 0 {
            let message = format!("Found {} facilities matching \"{}\"", matches, term);
            self.notify(ToastKind::Success, message, &mut effects);
        } else {
            self.notify(
                ToastKind::Warning,
                "No facilities found matching your search",
                &mut effects,
            );
        }
        effects
    }

    /// A filter tab was clicked
    pub fn select_filter(&mut self, filter: Filter) -> Vec<Effect> {
        debug!(?filter, "filter selected");
        self.state.filter = filter;
        self.resync();

        // Re-run the active search so it reports against the new filter
        if !self.state.search_text.is_empty() {
            let text = self.state.search_text.clone();
            return self.search(text);
        }
        Vec::new()
    }

    /// A list row was clicked. Unknown ids do nothing.
    pub fn focus_facility(&mut self, id: FacilityId) -> Vec<Effect> {
        let Some(record) = self.store.get(id) else {
            debug!(id, "focus on unknown facility ignored");
            return Vec::new();
        };
        let coordinate = record.coordinate();
        let message = format!("Viewing {}", record.name);

        self.map.set_view(coordinate, self.config.focus_zoom);
        self.list.highlight(id);

        let mut effects = vec![Effect::OpenPopupWhenSettled(id)];
        self.notify(ToastKind::Info, message, &mut effects);
        effects
    }

    /// The view settled after [`Controller::focus_facility`]
    pub fn popup_settled(&mut self, id: FacilityId) {
        // The marker may have been filtered out meanwhile; open_popup ignores that
        self.map.open_popup(PopupTarget::Facility(id));
    }

    /// A marker on the map was clicked
    pub fn marker_clicked(&mut self, target: PopupTarget) {
        self.map.open_popup(target);
    }

    /// The map background or the popup's close button was clicked
    pub fn close_popup(&mut self) {
        self.map.close_popup();
    }

    /// "Locate me" was clicked
    pub fn locate(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let mut effects = Vec::new();

        match self.geolocation.begin(now) {
            LocateStart::Unsupported => {
                self.notify(
                    ToastKind::Error,
                    "Geolocation is not supported on this system",
                    &mut effects,
                );
            }
            LocateStart::Busy => {}
            LocateStart::Cached(fix) => self.place_user(fix, &mut effects),
            LocateStart::Request(options) => effects.push(Effect::RequestLocation(options)),
        }
        effects
    }

    /// The location request completed
    pub fn location_resolved(&mut self, result: Result<Fix, LocationError>) -> Vec<Effect> {
        self.geolocation.finish(&result);

        let mut effects = Vec::new();
        match result {
            Ok(fix) => self.place_user(fix, &mut effects),
            Err(err) => self.notify(ToastKind::Error, err.to_string(), &mut effects),
        }
        effects
    }

    /// "Reset view" was clicked
    pub fn reset(&mut self) -> Vec<Effect> {
        self.map
            .set_view(self.config.default_center, self.config.default_zoom);
        self.state.search_text.clear();

        if self.state.user_location.take().is_some() {
            self.map.set_user_marker(None);
        }

        self.state.filter = Filter::All;
        self.resync();

        let mut effects = Vec::new();
        self.notify(ToastKind::Info, "Map view reset", &mut effects);
        effects
    }

    pub fn zoom_in(&mut self) {
        self.map.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.map.zoom_out();
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.map.pan_by(dx, dy);
    }

    /// The display time of toast `id` is over
    pub fn toast_expired(&mut self, id: ToastId) -> bool {
        self.notifications.begin_exit(id)
    }

    /// The exit transition of toast `id` is over
    pub fn toast_removed(&mut self, id: ToastId) {
        self.notifications.remove(id);
    }

    // ---- Helpers ----

    fn resync(&mut self) -> SyncReport {
        let term = self.state.search_term();
        sync::sync(
            &mut self.map,
            &mut self.list,
            self.store.records(),
            self.state.filter,
            &term,
        )
    }

    fn place_user(&mut self, fix: Fix, effects: &mut Vec<Effect>) {
        self.map.set_user_marker(Some(fix.coordinate));
        self.map.open_popup(PopupTarget::UserLocation);
        self.map.set_view(fix.coordinate, self.config.located_zoom);
        self.state.user_location = Some(fix.coordinate);

        self.notify(ToastKind::Success, "Location found successfully", effects);
    }

    fn notify(&mut self, kind: ToastKind, message: impl Into<String>, effects: &mut Vec<Effect>) {
        let id = self.notifications.show(kind, message);
        effects.push(Effect::ExpireToast(id));
    }
}
