/// Gallery screen: the grid of past creations
///
/// Pure list rendering over `state::gallery`; the order is whatever the
/// service returned (newest first).

use iced::widget::{button, column, container, horizontal_space, image, row, scrollable, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::gallery::{Gallery, GalleryEntry};
use crate::Message;

/// Build the gallery screen
pub fn view<'a>(gallery: &'a Gallery, status: &'a str) -> Element<'a, Message> {
    let header = row![
        button("Back").on_press(Message::CloseGallery).padding(8),
        horizontal_space(),
        text("Your Magical Creations").size(28),
        horizontal_space(),
    ]
    .align_y(Alignment::Center);

    let count = gallery.entries().len();
    let headline = if count == 1 {
        "1 personalized illustration".to_string()
    } else {
        format!("{} personalized illustrations", count)
    };

    let body: Element<Message> = if gallery.is_loading() {
        centered_note("Loading gallery...")
    } else if gallery.entries().is_empty() {
        centered_note("No creations yet")
    } else {
        let mut grid = Wrap::new().spacing(16.0).line_spacing(16.0);
        for (index, entry) in gallery.entries().iter().enumerate() {
            grid = grid.push(card(index, entry));
        }
        scrollable(container(grid).width(Length::Fill).padding(8)).into()
    };

    let content = column![header, text(headline).size(16), body, text(status).size(14)]
        .spacing(24)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn centered_note(note: &str) -> Element<'_, Message> {
    container(text(note).size(16))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// One creation: preview, date, download
fn card(index: usize, entry: &GalleryEntry) -> Element<'_, Message> {
    let picture: Element<Message> = match &entry.preview {
        Some(handle) => image(handle.clone()).width(240).into(),
        None => text("Preview unavailable").size(14).into(),
    };

    column![
        picture,
        text(display_date(&entry.image.created_at)).size(12),
        button("Download")
            .on_press(Message::DownloadGalleryItem(index))
            .padding(8),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}

/// Render the service's ISO-8601 timestamp as a short date, falling back to
/// the raw string when it does not parse
fn display_date(created_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(created_at)
        .map(|date| date.format("%b %e, %Y").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}
