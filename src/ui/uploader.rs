/// Photo drop zone
///
/// Files reach the window as a stream of per-file events: every hovered file
/// produces a `FileHovered`, every dropped one a `FileDropped`. This module
/// folds that stream into "one file per gesture" and renders the zone.
use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{column, container, mouse_area, text};
use iced::{Alignment, Border, Color, Element, Length, Theme};

use crate::Message;

/// `FileDropped` events closer together than this belong to the same drop
const SAME_DROP_WINDOW: Duration = Duration::from_millis(250);

/// Window file events the drop zone cares about
#[derive(Debug, Clone, PartialEq)]
pub enum DropEvent {
    Hovered,
    Dropped(PathBuf),
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Hovering,
    /// A file of this drop was already handed over
    Dropped { at: Instant },
}

#[derive(Debug)]
pub struct DropZone {
    gesture: Gesture,
}

impl DropZone {
    pub fn new() -> Self {
        DropZone { gesture: Gesture::Idle }
    }

    /// Whether a drag is currently over the window
    pub fn is_drag_active(&self) -> bool {
        self.gesture == Gesture::Hovering
    }

    /// Feed one window event; returns the file to load, if any.
    /// Only the first file of a drop is returned.
    pub fn handle(&mut self, event: DropEvent, now: Instant) -> Option<PathBuf> {
        match event {
            DropEvent::Hovered => {
                self.gesture = match self.gesture {
                    Gesture::Dropped { at } if now.duration_since(at) < SAME_DROP_WINDOW => self.gesture,
                    _ => Gesture::Hovering,
                };
                None
            }
            DropEvent::Left => {
                self.gesture = Gesture::Idle;
                None
            }
            DropEvent::Dropped(path) => match self.gesture {
                Gesture::Dropped { at } if now.duration_since(at) < SAME_DROP_WINDOW => None,
                _ => {
                    self.gesture = Gesture::Dropped { at: now };
                    Some(path)
                }
            },
        }
    }

    /// Bordered drop target; clicking it opens the file picker
    pub fn view(&self) -> Element<'_, Message> {
        let active = self.is_drag_active();

        let prompt = if active {
            "Drop your image here"
        } else {
            "Drag & drop your image here, or click to select"
        };

        let content = column![
            text(prompt).size(16).color(if active { super::RCB_RED } else { Color::WHITE }),
            text("Supports JPG, PNG, GIF (max 5MB)").size(13).color(Color::from_rgb(0.55, 0.55, 0.55)),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let zone = container(content)
            .padding(24)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .style(move |_theme: &Theme| zone_style(active));

        mouse_area(zone).on_press(Message::PickImage).into()
    }
}

impl Default for DropZone {
    fn default() -> Self {
        Self::new()
    }
}

fn zone_style(active: bool) -> container::Style {
    let (border_color, background) = if active {
        (super::RCB_RED, Color::from_rgba(1.0, 1.0, 1.0, 0.08))
    } else {
        (Color::from_rgb(0.4, 0.4, 0.4), Color::from_rgba(1.0, 1.0, 1.0, 0.03))
    };

    container::Style {
        background: Some(background.into()),
        border: Border {
            color: border_color,
            width: 2.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    }
}
