use iced::event::Event;
use iced::window;
use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

// Declare the application modules
mod api;
mod photo;
mod state;
mod ui;

use api::{ApiClient, PersonalizedImage, UploadedPhoto, TRANSFORM_PROMPT};
use state::gallery::Gallery;
use state::workflow::{GenerateOutcome, RequestToken, UploadOutcome, Workflow, WorkflowError};

/// Main application state
struct MagicPortrait {
    /// Client for the personalization service
    client: ApiClient,
    /// The one-photo transformation workflow
    workflow: Workflow,
    /// Past creations fetched from the service
    gallery: Gallery,
    /// Which screen is showing
    screen: Screen,
    /// Status message to display to the user
    status: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    Home,
    Gallery,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Select Photo"
    SelectPhoto,
    /// User dropped a file onto the window
    FileDropped(PathBuf),
    /// User clicked "Transform Now"
    Transform,
    /// Upload call resolved
    UploadFinished(RequestToken, Result<UploadedPhoto, String>),
    /// Generation call resolved
    GenerateFinished(RequestToken, Result<PersonalizedImage, String>),
    /// User clicked "Regenerate" on a completed (or failed) generation
    Regenerate,
    /// User clicked "Download" on the current result
    Download,
    /// User clicked "Download" on a gallery card
    DownloadGalleryItem(usize),
    /// User clicked "Start Over"
    Reset,
    /// User opened the gallery screen
    OpenGallery,
    /// User went back to the home screen
    CloseGallery,
    /// Gallery fetch resolved
    GalleryLoaded(Result<Vec<PersonalizedImage>, String>),
}

impl MagicPortrait {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let client = ApiClient::from_env();
        println!("✨ Magic Portrait ready (service at {})", client.base_url());

        (
            MagicPortrait {
                client,
                workflow: Workflow::new(),
                gallery: Gallery::new(),
                screen: Screen::Home,
                status: String::from("Select a photo to begin."),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectPhoto => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
                    .pick_file();

                if let Some(path) = file {
                    self.select_photo(path);
                }

                Task::none()
            }
            Message::FileDropped(path) => {
                // Dropped files only mean something on the home screen
                if self.screen == Screen::Home {
                    self.select_photo(path);
                }

                Task::none()
            }
            Message::Transform => self.start_upload(),
            Message::UploadFinished(token, result) => {
                match self.workflow.finish_upload(token, result) {
                    UploadOutcome::Uploaded { has_face } => {
                        self.status = if has_face {
                            String::from("Photo uploaded successfully! Face detected ✓")
                        } else {
                            String::from("Photo uploaded successfully! Ready to transform.")
                        };
                        println!("📤 Upload complete (face detected: {})", has_face);

                        // Upload success chains straight into generation
                        self.start_generate()
                    }
                    UploadOutcome::Failed(error) => {
                        eprintln!("⚠️  {}", error);
                        self.status = error.to_string();
                        Task::none()
                    }
                    UploadOutcome::Stale => Task::none(),
                }
            }
            Message::GenerateFinished(token, result) => {
                match self.workflow.finish_generate(token, result) {
                    GenerateOutcome::Completed => {
                        println!("🎨 Illustration ready");
                        self.status =
                            String::from("Magic complete! ✨ Your personalized illustration is ready.");
                    }
                    GenerateOutcome::Failed(error) => {
                        eprintln!("⚠️  {}", error);
                        self.status = error.to_string();
                    }
                    GenerateOutcome::Stale => {}
                }

                Task::none()
            }
            Message::Regenerate => self.start_generate(),
            Message::Download => {
                let outcome = self.workflow.result().map(photo::download::save_personalized);

                match outcome {
                    Some(Ok(Some(_))) => self.status = String::from("Downloaded!"),
                    Some(Err(error)) => {
                        eprintln!("⚠️  {}", error);
                        self.status = error;
                    }
                    _ => {}
                }

                Task::none()
            }
            Message::DownloadGalleryItem(index) => {
                let outcome = self
                    .gallery
                    .entries()
                    .get(index)
                    .map(|entry| photo::download::save_personalized(&entry.image));

                match outcome {
                    Some(Ok(Some(_))) => self.status = String::from("Downloaded!"),
                    Some(Err(error)) => {
                        eprintln!("⚠️  {}", error);
                        self.status = error;
                    }
                    _ => {}
                }

                Task::none()
            }
            Message::Reset => {
                self.workflow.reset();
                self.status = String::from("Select a photo to begin.");

                Task::none()
            }
            Message::OpenGallery => {
                self.screen = Screen::Gallery;
                self.gallery.begin_load();

                let client = self.client.clone();
                Task::perform(async move { client.gallery().await }, Message::GalleryLoaded)
            }
            Message::CloseGallery => {
                self.screen = Screen::Home;

                Task::none()
            }
            Message::GalleryLoaded(result) => {
                match self.gallery.finish_load(result) {
                    Ok(count) => println!("🖼️  Gallery loaded: {} creations", count),
                    Err(error) => {
                        eprintln!("⚠️  Failed to load gallery: {}", error);
                        self.status = format!("Failed to load gallery: {}", error);
                    }
                }

                Task::none()
            }
        }
    }

    /// Validate and take ownership of a newly selected photo
    fn select_photo(&mut self, path: PathBuf) {
        match self.workflow.select(path) {
            Ok(()) => {
                let name = self
                    .workflow
                    .photo()
                    .map(|photo| photo.file_name.clone())
                    .unwrap_or_default();
                self.status = format!("Selected {} - ready to transform.", name);
            }
            Err(error) => {
                eprintln!("⚠️  Rejected selection: {}", error);
                self.status = error.to_string();
            }
        }
    }

    /// Kick off the upload stage, if the workflow allows it
    fn start_upload(&mut self) -> Task<Message> {
        match self.workflow.begin_upload() {
            Ok((token, path)) => {
                self.status = String::from("Uploading photo...");

                let client = self.client.clone();
                Task::perform(async move { client.upload(path).await }, move |result| {
                    Message::UploadFinished(token, result)
                })
            }
            // A call is already in flight; drop the duplicate invocation
            Err(WorkflowError::RequestPending) => Task::none(),
            Err(error) => {
                self.status = error.to_string();
                Task::none()
            }
        }
    }

    /// Kick off the generation stage, if the workflow allows it
    fn start_generate(&mut self) -> Task<Message> {
        match self.workflow.begin_generate() {
            Ok((token, photo_id)) => {
                self.status = String::from("Creating magic...");

                let client = self.client.clone();
                Task::perform(
                    async move { client.generate(photo_id, TRANSFORM_PROMPT.to_string()).await },
                    move |result| Message::GenerateFinished(token, result),
                )
            }
            Err(WorkflowError::RequestPending) => Task::none(),
            Err(error) => {
                self.status = error.to_string();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Home => ui::home::view(&self.workflow, &self.status),
            Screen::Gallery => ui::gallery::view(&self.gallery, &self.status),
        }
    }

    /// Listen for files dropped onto the window
    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    iced::application(
        "Magic Portrait",
        MagicPortrait::update,
        MagicPortrait::view,
    )
    .subscription(MagicPortrait::subscription)
    .theme(MagicPortrait::theme)
    .centered()
    .run_with(MagicPortrait::new)
}
