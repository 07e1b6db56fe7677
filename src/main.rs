use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, canvas, column, container, row, stack, text};
use iced::{Element, Length, Task, Theme, Vector};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod error;
mod geolocation;
mod map;
mod notification;
mod state;
mod sync;
mod ui;

use config::AppConfig;
use controller::{Controller, Effect, POPUP_SETTLE_DELAY};
use geolocation::{Fix, LocationError, Locator};
use map::PopupTarget;
use notification::{ToastId, DISPLAY_DURATION, EXIT_DURATION};
use state::data::FacilityId;
use state::interaction::Filter;
use state::store::FacilityStore;
use ui::popup::PopupContent;

/// Main application state
struct HealthMap {
    /// Filter/search state, map, list and notifications
    controller: Controller,
    /// Runs "locate me" requests
    locator: Locator,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The search field changed
    SearchChanged(String),
    /// A filter tab was clicked
    FilterSelected(Filter),
    /// A list row was clicked
    FacilitySelected(FacilityId),
    /// The map settled after centering on a facility
    PopupSettled(FacilityId),
    /// A marker on the canvas was clicked
    MarkerClicked(PopupTarget),
    /// The map background was clicked
    MapClicked,
    ClosePopup,
    /// User clicked "Locate me"
    LocateMe,
    /// The location request completed
    LocationResolved(Result<Fix, LocationError>),
    /// User clicked "Reset view"
    ResetView,
    ZoomIn,
    ZoomOut,
    /// Canvas drag in screen pixels
    Pan(Vector),
    ToastExpired(ToastId),
    ToastRemoved(ToastId),
}

impl HealthMap {
    /// Create a new instance of the application
    fn new(controller: Controller, locator: Locator) -> (Self, Task<Message>) {
        (HealthMap { controller, locator }, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let effects = match message {
            Message::SearchChanged(value) => self.controller.search(value),
            Message::FilterSelected(filter) => self.controller.select_filter(filter),
            Message::FacilitySelected(id) => self.controller.focus_facility(id),
            Message::PopupSettled(id) => {
                self.controller.popup_settled(id);
                Vec::new()
            }
            Message::MarkerClicked(target) => {
                self.controller.marker_clicked(target);
                Vec::new()
            }
            Message::MapClicked | Message::ClosePopup => {
                self.controller.close_popup();
                Vec::new()
            }
            Message::LocateMe => self.controller.locate(chrono::Utc::now()),
            Message::LocationResolved(result) => self.controller.location_resolved(result),
            Message::ResetView => self.controller.reset(),
            Message::ZoomIn => {
                self.controller.zoom_in();
                Vec::new()
            }
            Message::ZoomOut => {
                self.controller.zoom_out();
                Vec::new()
            }
            Message::Pan(delta) => {
                self.controller.pan(delta.x, delta.y);
                Vec::new()
            }
            Message::ToastExpired(id) => {
                // Only the toast still on screen gets an exit transition
                if self.controller.toast_expired(id) {
                    return delay(EXIT_DURATION, Message::ToastRemoved(id));
                }
                Vec::new()
            }
            Message::ToastRemoved(id) => {
                self.controller.toast_removed(id);
                Vec::new()
            }
        };

        Task::batch(effects.into_iter().map(|effect| self.schedule(effect)))
    }

    /// Turn a controller effect into a background task
    fn schedule(&self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::ExpireToast(id) => delay(DISPLAY_DURATION, Message::ToastExpired(id)),
            Effect::OpenPopupWhenSettled(id) => delay(POPUP_SETTLE_DELAY, Message::PopupSettled(id)),
            Effect::RequestLocation(options) => {
                let locator = self.locator.clone();
                Task::perform(
                    async move { locator.locate(options).await },
                    Message::LocationResolved,
                )
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let map = canvas(ui::map_canvas::MapCanvas {
            map: self.controller.map(),
            attribution: self.controller.tile_attribution(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let zoom_controls = column![
            button(text("+").size(18)).on_press(Message::ZoomIn).width(36.0),
            button(text("−").size(18)).on_press(Message::ZoomOut).width(36.0),
        ]
        .spacing(4);

        let mut layers = stack![
            map,
            container(zoom_controls).padding(12),
        ];

        if let Some(content) = self.popup_content() {
            layers = layers.push(
                container(ui::popup::view(content))
                    .width(Length::Fill)
                    .padding(12)
                    .align_x(Horizontal::Center)
                    .align_y(Vertical::Top),
            );
        }

        if let Some(toast) = self.controller.notifications().current() {
            layers = layers.push(
                container(ui::toast::view(toast))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .padding(16)
                    .align_x(Horizontal::Right)
                    .align_y(Vertical::Bottom),
            );
        }

        row![
            ui::sidebar::view(&self.controller),
            layers.width(Length::Fill).height(Length::Fill),
        ]
        .into()
    }

    fn popup_content(&self) -> Option<PopupContent> {
        match self.controller.map().popup()? {
            PopupTarget::Facility(_) => self.controller.popup_facility().map(PopupContent::facility),
            PopupTarget::UserLocation => self
                .controller
                .map()
                .user_marker()
                .map(PopupContent::user_location),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Deliver `message` after `duration`
fn delay(duration: std::time::Duration, message: Message) -> Task<Message> {
    Task::perform(tokio::time::sleep(duration), move |_| message.clone())
}

/// Load configuration and dataset, and build the controller
fn bootstrap() -> error::Result<(Controller, Locator)> {
    let config = AppConfig::load()?;
    let store = FacilityStore::load(config.dataset.as_deref())?;

    let locator = Locator::new(geolocation::provider_for(&config.location));
    let controller = Controller::new(store, config.map, locator.is_available());

    Ok((controller, locator))
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("health_map=info")),
        )
        .init();

    let (controller, locator) = match bootstrap() {
        Ok(parts) => parts,
        Err(err) => {
            error!(error = %err, "startup failed");
            std::process::exit(1);
        }
    };

    let stats = controller.statistics();
    info!(
        total = stats.total,
        hospitals = stats.hospitals,
        emergency = stats.emergency,
        "health map initialized"
    );

    iced::application("Health Facilities Map", HealthMap::update, HealthMap::view)
        .theme(HealthMap::theme)
        .centered()
        .run_with(move || HealthMap::new(controller, locator))
}
