/// Transient notification stack
///
/// Toasts stay on screen for [`TOAST_DURATION`] unless the user closes them.
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{Border, Color, Element, Length, Theme};

use crate::state::notify::{Level, Notification};
use crate::Message;

pub const TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Toast {
    id: u64,
    notification: Notification,
    shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    /// Show a notification; returns its id
    pub fn push(&mut self, notification: Notification, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast { id, notification, shown_at: now });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    /// Drop every toast older than [`TOAST_DURATION`]
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < TOAST_DURATION);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn view(&self) -> Element<'_, Message> {
        Column::with_children(self.items.iter().map(toast_view))
            .spacing(8)
            .width(Length::Fill)
            .into()
    }
}

fn toast_view(toast: &Toast) -> Element<'_, Message> {
    let notification = &toast.notification;
    let accent = accent(notification.level);

    let body = column![
        text(notification.title).size(15).color(accent),
        text(notification.description).size(14),
    ]
    .spacing(2);

    let close = button(text("×").size(16))
        .on_press(Message::DismissToast(toast.id))
        .style(button::text);

    container(row![body, Space::with_width(Length::Fill), close])
        .padding(12)
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Color::from_rgb(0.15, 0.15, 0.15).into()),
            border: Border {
                color: accent,
                width: 1.5,
                radius: 6.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn accent(level: Level) -> Color {
    match level {
        Level::Success => Color::from_rgb(0.2, 0.75, 0.35),
        Level::Warning => Color::from_rgb(0.95, 0.7, 0.2),
        Level::Error => super::RCB_RED,
    }
}
