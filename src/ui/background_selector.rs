/// Background picker: a fixed two-column grid of catalog thumbnails
use std::collections::HashMap;

use iced::widget::image::{Handle, Image};
use iced::widget::{column, container, mouse_area, text, Column, Row, Space};
use iced::{Alignment, Border, Color, ContentFit, Element, Length, Theme};

use crate::state::data::BackgroundOption;
use crate::Message;

const COLUMNS: usize = 2;
const THUMBNAIL_HEIGHT: f32 = 100.0;

/// How the selector lays out a catalog
#[derive(Debug, PartialEq)]
pub enum Layout<'a> {
    /// Nothing to choose from
    Placeholder,
    /// Rows of at most two options, in catalog order
    Grid(Vec<&'a [BackgroundOption]>),
}

pub fn layout(catalog: &[BackgroundOption]) -> Layout<'_> {
    if catalog.is_empty() {
        Layout::Placeholder
    } else {
        Layout::Grid(catalog.chunks(COLUMNS).collect())
    }
}

/// Render the selector. `previews` maps background names to loaded thumbnails.
pub fn view<'a>(
    catalog: &'a [BackgroundOption],
    previews: &'a HashMap<String, Handle>,
    selected: Option<&'a str>,
) -> Element<'a, Message> {
    let rows = match layout(catalog) {
        Layout::Placeholder => {
            return container(text("No background images available").color(Color::from_rgb(0.55, 0.55, 0.55)))
                .padding(16)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .into();
        }
        Layout::Grid(rows) => rows,
    };

    let grid = rows.into_iter().map(|row| {
        let mut tiles: Vec<Element<'a, Message>> = row
            .iter()
            .map(|option| tile(option, previews.get(&option.name), selected == Some(option.name.as_str())))
            .collect();
        // Keep a lone last tile at half width
        while tiles.len() < COLUMNS {
            tiles.push(Space::with_width(Length::FillPortion(1)).into());
        }
        Row::with_children(tiles).spacing(12).into()
    });

    Column::with_children(grid).spacing(12).into()
}

fn tile<'a>(option: &'a BackgroundOption, preview: Option<&Handle>, is_selected: bool) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match preview {
        Some(handle) => Image::<Handle>::new(handle.clone())
            .width(Length::Fill)
            .height(THUMBNAIL_HEIGHT)
            .content_fit(ContentFit::Cover)
            .into(),
        None => Space::new(Length::Fill, THUMBNAIL_HEIGHT).into(),
    };

    let label = text(option.label())
        .size(12)
        .color(if is_selected { super::RCB_RED } else { Color::from_rgb(0.7, 0.7, 0.7) });

    let content = column![thumbnail, label]
        .spacing(4)
        .align_x(Alignment::Center);

    let framed = container(content)
        .padding(8)
        .width(Length::FillPortion(1))
        .style(move |_theme: &Theme| tile_style(is_selected));

    mouse_area(framed)
        .on_press(Message::BackgroundSelected(option.name.clone()))
        .into()
}

fn tile_style(is_selected: bool) -> container::Style {
    container::Style {
        background: Some(
            if is_selected {
                Color::from_rgba(1.0, 1.0, 1.0, 0.08)
            } else {
                Color::from_rgba(1.0, 1.0, 1.0, 0.02)
            }
            .into(),
        ),
        border: Border {
            color: if is_selected { super::RCB_RED } else { Color::from_rgb(0.3, 0.3, 0.3) },
            width: 2.0,
            radius: 6.0.into(),
        },
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Vec<BackgroundOption> {
        names
            .iter()
            .map(|name| BackgroundOption { name: name.to_string(), preview: format!("/img/{name}") })
            .collect()
    }

    #[test]
    fn test_empty_catalog_is_placeholder() {
        assert_eq!(layout(&[]), Layout::Placeholder);
    }

    #[test]
    fn test_grid_has_two_columns() {
        let options = catalog(&["a.png", "b.png", "c.png"]);

        let Layout::Grid(rows) = layout(&options) else {
            panic!("expected a grid");
        };

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][0].name, "c.png");
    }
}
