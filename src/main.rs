use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{event, window, Alignment, Color, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod download;
mod state;
mod ui;
mod upload;

use api::{BackendClient, NetworkError};
use config::Config;
use download::DownloadError;
use state::data::{BackgroundOption, ResultImage, UploadedImage};
use state::notify::Notification;
use state::session::{Session, ValidationError};
use ui::toast::Toasts;
use ui::uploader::{DropEvent, DropZone};
use upload::UploadError;

/// Main application state
struct ProfileApp {
    config: Config,
    /// Unusable when the configured base URL doesn't parse
    client: Result<BackendClient, NetworkError>,
    /// Everything the user has chosen so far
    session: Session,
    drop_zone: DropZone,
    toasts: Toasts,
    /// Catalog thumbnails by background name
    previews: HashMap<String, Handle>,
    upload_preview: Option<Handle>,
    result_preview: Option<Handle>,
    /// Where the last download went
    saved_to: Option<PathBuf>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Startup catalog request finished
    CatalogLoaded(Result<Vec<BackgroundOption>, NetworkError>),
    /// Thumbnail bytes for one background arrived
    PreviewLoaded(String, Result<Vec<u8>, NetworkError>),
    /// User clicked the drop zone
    PickImage,
    /// File drag-and-drop activity over the window
    FileDrop(DropEvent),
    /// A picked or dropped file was read (or rejected)
    ImageLoaded(Result<UploadedImage, UploadError>),
    BackgroundSelected(String),
    /// User clicked "Generate Profile Picture"
    Generate,
    /// Processing request finished
    Processed(Result<ResultImage, NetworkError>),
    Download,
    Downloaded(Result<PathBuf, DownloadError>),
    /// User clicked "Start Over"
    Reset,
    DismissToast(u64),
    Tick(Instant),
}

impl ProfileApp {
    /// Create the application and kick off the catalog fetch
    fn new(config: Config) -> (Self, Task<Message>) {
        let client = BackendClient::new(&config);

        let mut app = ProfileApp {
            config,
            client: client.clone(),
            session: Session::new(),
            drop_zone: DropZone::new(),
            toasts: Toasts::default(),
            previews: HashMap::new(),
            upload_preview: None,
            result_preview: None,
            saved_to: None,
        };

        let fetch = match client {
            Ok(client) => {
                info!(api_url = %client.base_url(), "RCB profile picture generator starting");
                fetch_catalog(client)
            }
            Err(err) => {
                // Same outcome as a failed catalog request
                if let Some(notification) = app.session.catalog_loaded(Err(err)) {
                    app.notify(notification);
                }
                Task::none()
            }
        };

        (app, fetch)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::CatalogLoaded(outcome) => match self.session.catalog_loaded(outcome) {
                Some(notification) => {
                    self.notify(notification);
                    Task::none()
                }
                None => match &self.client {
                    Ok(client) => Task::batch(
                        self.session
                            .catalog()
                            .iter()
                            .map(|option| load_preview(client.clone(), option)),
                    ),
                    Err(_) => Task::none(),
                },
            },
            Message::PreviewLoaded(name, Ok(bytes)) => {
                self.previews.insert(name, Handle::from_bytes(bytes));
                Task::none()
            }
            Message::PreviewLoaded(name, Err(err)) => {
                warn!(background = %name, %err, "preview unavailable");
                Task::none()
            }
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select Your Photo")
                    .add_filter("Images", &upload::ACCEPTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => load_upload(path),
                    None => Task::none(),
                }
            }
            Message::FileDrop(event) => match self.drop_zone.handle(event, Instant::now()) {
                Some(path) => load_upload(path),
                None => Task::none(),
            },
            Message::ImageLoaded(Ok(image)) => {
                self.upload_preview = Some(Handle::from_bytes(image.bytes.clone()));
                self.session.upload(image);
                Task::none()
            }
            Message::ImageLoaded(Err(err)) => {
                // Rejected files produce no upload
                warn!(%err, "image rejected");
                Task::none()
            }
            Message::BackgroundSelected(name) => {
                if !self.session.select_background(&name) {
                    warn!(background = %name, "ignoring selection outside the catalog");
                }
                Task::none()
            }
            Message::Generate => match self.session.begin_processing() {
                Ok(request) => match self.client.clone() {
                    Ok(client) => Task::perform(
                        async move { client.process_image(&request.image, &request.background).await },
                        Message::Processed,
                    ),
                    Err(err) => {
                        let notification = self.session.processing_finished(Err(err));
                        self.notify(notification);
                        Task::none()
                    }
                },
                Err(ValidationError::MissingInput) => {
                    self.notify(Notification::missing_input());
                    Task::none()
                }
                Err(ValidationError::Busy) => {
                    debug!("generate ignored, request already in flight");
                    Task::none()
                }
            },
            Message::Processed(outcome) => {
                let notification = self.session.processing_finished(outcome);
                if let Some(result) = self.session.result() {
                    self.result_preview = Some(Handle::from_bytes(result.bytes.clone()));
                }
                self.saved_to = None;
                self.notify(notification);
                Task::none()
            }
            Message::Download => match self.session.result() {
                Some(result) => Task::perform(
                    download::save_result(self.config.download_dir.clone(), result.bytes.clone()),
                    Message::Downloaded,
                ),
                None => Task::none(),
            },
            Message::Downloaded(Ok(path)) => {
                self.saved_to = Some(path);
                Task::none()
            }
            Message::Downloaded(Err(err)) => {
                error!(%err, "download failed");
                Task::none()
            }
            Message::Reset => {
                self.session.reset();
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
            Message::Tick(now) => {
                self.toasts.expire(now);
                Task::none()
            }
        };

        self.drop_stale_previews();
        task
    }

    fn notify(&mut self, notification: Notification) {
        self.toasts.push(notification, Instant::now());
    }

    /// Cached image handles follow the session: no image, no preview
    fn drop_stale_previews(&mut self) {
        if self.session.uploaded().is_none() {
            self.upload_preview = None;
        }
        if self.session.result().is_none() {
            self.result_preview = None;
            self.saved_to = None;
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text("RCB Profile Picture Generator").size(40).color(ui::RCB_RED),
            text("Upload your photo and get a custom RCB-themed profile picture").size(16),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let inputs: Element<Message> = if self.session.is_loading_catalog() {
            container(text("Loading backgrounds...").size(18))
                .width(Length::Fill)
                .height(300)
                .center_x(Length::Fill)
                .center_y(300)
                .into()
        } else {
            row![self.upload_panel(), self.background_panel()]
                .spacing(24)
                .into()
        };

        let generate_label = if self.session.is_processing() {
            "Processing..."
        } else {
            "Generate Profile Picture"
        };
        let generate = button(text(generate_label).size(18))
            .padding([12, 24])
            .style(button::danger)
            .on_press_maybe(self.session.can_generate().then_some(Message::Generate));

        let mut content: Column<Message> = column![header];
        if !self.toasts.is_empty() {
            content = content.push(self.toasts.view());
        }
        content = content
            .push(inputs)
            .push(container(generate).center_x(Length::Fill));

        if let Some(result) = self.result_panel() {
            content = content.push(result);
        }

        content = content.push(
            container(text("© RCB Profile Picture Generator").size(12).color(Color::from_rgb(0.5, 0.5, 0.5)))
                .center_x(Length::Fill),
        );

        scrollable(content.spacing(24).padding(32).max_width(1100))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn upload_panel(&self) -> Element<Message> {
        let mut body = column![self.drop_zone.view()].spacing(12);

        if let Some(handle) = &self.upload_preview {
            body = body.push(
                column![
                    text("Image uploaded").size(13).color(Color::from_rgb(0.2, 0.75, 0.35)),
                    Image::<Handle>::new(handle.clone()).height(200),
                ]
                .spacing(6)
                .width(Length::Fill)
                .align_x(Alignment::Center),
            );
        }

        panel("Upload Your Photo", body)
    }

    fn background_panel(&self) -> Element<Message> {
        panel(
            "Choose Background",
            ui::background_selector::view(
                self.session.catalog(),
                &self.previews,
                self.session.selected_background(),
            ),
        )
    }

    fn result_panel(&self) -> Option<Element<Message>> {
        let handle = self.result_preview.as_ref()?;

        let actions = row![
            button("Download").on_press(Message::Download).style(button::success).padding(10),
            button("Start Over").on_press(Message::Reset).style(button::secondary).padding(10),
        ]
        .spacing(16);

        let mut body = column![Image::<Handle>::new(handle.clone()).height(400), actions]
            .spacing(16)
            .width(Length::Fill)
            .align_x(Alignment::Center);

        if let Some(path) = &self.saved_to {
            body = body.push(text(format!("Saved to {}", path.display())).size(13));
        }

        Some(panel("Your RCB Profile Picture", body))
    }

    fn subscription(&self) -> Subscription<Message> {
        let file_drops = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileDrop(DropEvent::Hovered)),
            Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::FileDrop(DropEvent::Dropped(path)))
            }
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FileDrop(DropEvent::Left)),
            _ => None,
        });

        // Only tick while there is something to expire
        if self.toasts.is_empty() {
            file_drops
        } else {
            Subscription::batch([
                file_drops,
                iced::time::every(Duration::from_millis(500)).map(Message::Tick),
            ])
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Titled card around a section of the window
fn panel<'a>(title: &'a str, body: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(column![text(title).size(20), body.into()].spacing(16))
        .padding(24)
        .width(Length::FillPortion(1))
        .style(container::rounded_box)
        .into()
}

fn fetch_catalog(client: BackendClient) -> Task<Message> {
    Task::perform(
        async move { client.fetch_backgrounds().await },
        Message::CatalogLoaded,
    )
}

fn load_preview(client: BackendClient, option: &BackgroundOption) -> Task<Message> {
    let name = option.name.clone();
    let source = client.resolve(&option.preview);

    Task::perform(
        async move {
            let bytes = match source {
                Ok(source) => client.load_image(source).await,
                Err(err) => Err(err),
            };
            (name, bytes)
        },
        |(name, bytes)| Message::PreviewLoaded(name, bytes),
    )
}

fn load_upload(path: PathBuf) -> Task<Message> {
    Task::perform(async move { upload::load(&path).await }, Message::ImageLoaded)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,rcb_profile_picture=info")),
        )
        .init();

    let config = Config::from_env();

    iced::application(
        "RCB Profile Picture Generator",
        ProfileApp::update,
        ProfileApp::view,
    )
    .subscription(ProfileApp::subscription)
    .theme(ProfileApp::theme)
    .centered()
    .run_with(move || ProfileApp::new(config))
}
