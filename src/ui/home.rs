/// Home screen: the transformation workspace
///
/// Mirrors the workflow's stages without owning any logic of its own. With
/// no photo selected it shows the upload zone; afterwards the side-by-side
/// original/personalized comparison with the action buttons the current
/// stage allows. In-flight stages disable their triggering button.

use iced::widget::{button, column, container, horizontal_space, image, row, text};
use iced::{Alignment, Element, Length};

use crate::photo::LocalPhoto;
use crate::state::workflow::{Stage, Workflow};
use crate::Message;

/// Build the home screen
pub fn view<'a>(workflow: &'a Workflow, status: &'a str) -> Element<'a, Message> {
    let header = row![
        text("Magic Portrait").size(28),
        horizontal_space(),
        button("Gallery").on_press(Message::OpenGallery).padding(8),
    ]
    .align_y(Alignment::Center);

    let body: Element<Message> = match workflow.photo() {
        None => upload_zone(),
        Some(photo) => workspace(workflow, photo),
    };

    let content = column![header, body, text(status).size(14)]
        .spacing(24)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// The empty-state drop target shown before any selection
fn upload_zone() -> Element<'static, Message> {
    let content = column![
        text("Transform Photos into Whimsical Art").size(40),
        text("Upload a child's photo and watch as AI creates a magical illustrated character")
            .size(16),
        text("Drag & drop a photo anywhere in this window, or").size(14),
        button("Select Photo").on_press(Message::SelectPhoto).padding(12),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Side-by-side comparison plus the stage-appropriate actions
fn workspace<'a>(workflow: &'a Workflow, photo: &'a LocalPhoto) -> Element<'a, Message> {
    let original = panel("Original", image(photo.preview.clone()).width(Length::Fill).into());

    let personalized: Element<Message> = if matches!(workflow.stage(), Stage::Generating) {
        text("Creating magic...").size(16).into()
    } else if let Some(handle) = workflow.result_preview() {
        image(handle.clone()).width(Length::Fill).into()
    } else {
        text("Your magical illustration will appear here").size(16).into()
    };
    let personalized = panel("Personalized", personalized);

    let comparison = row![original, personalized].spacing(24);

    column![comparison, actions(workflow)].spacing(24).into()
}

/// A labelled image panel
fn panel<'a>(label: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    column![
        text(label).size(16),
        container(body)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    ]
    .spacing(8)
    .width(Length::Fill)
    .into()
}

fn actions(workflow: &Workflow) -> Element<'_, Message> {
    let busy = workflow.is_busy();
    let mut buttons = row![].spacing(12);

    // Transform disappears once an upload succeeded; the chain takes over
    if workflow.uploaded().is_none() {
        let label = if matches!(workflow.stage(), Stage::Uploading) {
            "Uploading..."
        } else {
            "Transform Now"
        };
        let mut transform = button(label).padding(12);
        if !busy {
            transform = transform.on_press(Message::Transform);
        }
        buttons = buttons.push(transform);
    }

    if workflow.result().is_some() {
        buttons = buttons.push(button("Download").on_press(Message::Download).padding(12));

        let label = if matches!(workflow.stage(), Stage::Generating) {
            "Regenerating..."
        } else {
            "Regenerate"
        };
        let mut regenerate = button(label).padding(12);
        if !busy {
            regenerate = regenerate.on_press(Message::Regenerate);
        }
        buttons = buttons.push(regenerate);
    }

    buttons = buttons.push(button("Start Over").on_press(Message::Reset).padding(12));

    container(buttons)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
