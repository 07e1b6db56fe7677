/// Sidebar: statistics, search, locate/reset, filter tabs and the facility list
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length};

use crate::controller::Controller;
use crate::state::interaction::Filter;
use crate::state::store::Statistics;
use crate::sync::ListRow;
use crate::Message;

pub const SIDEBAR_WIDTH: f32 = 360.0;

pub fn view(controller: &Controller) -> Element<'_, Message> {
    let state = controller.state();
    let geolocation = controller.geolocation();

    let search = text_input("Search facilities or services...", &state.search_text)
        .on_input(Message::SearchChanged)
        .padding(10);

    let locate = button(text(geolocation.button_label()))
        .on_press_maybe((!geolocation.is_pending()).then_some(Message::LocateMe))
        .padding(8);
    let reset = button(text("Reset view"))
        .on_press(Message::ResetView)
        .style(button::secondary)
        .padding(8);

    let tabs: Row<'_, Message> = Row::with_children(Filter::TABS.into_iter().map(|filter| {
        button(text(filter.tab_label()).size(13))
            .on_press(Message::FilterSelected(filter))
            .style(if filter == state.filter {
                button::primary
            } else {
                button::secondary
            })
            .padding([6, 10])
            .into()
    }))
    .spacing(6);

    let active = controller.list().active();
    let rows = controller.list().rows();
    let list: Element<'_, Message> = if rows.is_empty() {
        text("No facilities match the current filters").size(14).into()
    } else {
        scrollable(
            Column::with_children(rows.iter().map(|row| list_row(row, active == Some(row.id))))
                .spacing(6),
        )
        .height(Length::Fill)
        .into()
    };

    let content = column![
        text("Health Facilities").size(26),
        statistics(controller.statistics()),
        search,
        row![locate, reset].spacing(8),
        tabs,
        list,
    ]
    .spacing(14)
    .padding(16);

    container(content)
        .width(SIDEBAR_WIDTH)
        .height(Length::Fill)
        .into()
}

fn statistics(stats: Statistics) -> Element<'static, Message> {
    let stat = |value: usize, label: &'static str| {
        column![text(value.to_string()).size(22), text(label).size(12)]
            .align_x(Alignment::Center)
            .width(Length::Fill)
    };

    row![
        stat(stats.total, "Facilities"),
        stat(stats.hospitals, "Hospitals"),
        stat(stats.emergency, "Emergency"),
    ]
    .spacing(8)
    .into()
}

fn list_row(row: &ListRow, active: bool) -> Element<'_, Message> {
    let content = column![
        text(&row.name).size(15),
        text(row.kind_label).size(12),
        text(&row.contact).size(12),
    ]
    .spacing(2);

    button(content)
        .on_press(Message::FacilitySelected(row.id))
        .style(if active { button::primary } else { button::text })
        .width(Length::Fill)
        .padding(10)
        .into()
}
