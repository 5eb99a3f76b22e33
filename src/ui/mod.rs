/// UI building blocks
///
/// - Photo drop zone and its gesture tracking (uploader.rs)
/// - Background thumbnail grid (background_selector.rs)
/// - Transient notifications (toast.rs)
use iced::Color;

pub mod background_selector;
pub mod toast;
pub mod uploader;

/// Team red used for accents and the selected state
pub const RCB_RED: Color = Color { r: 0.925, g: 0.11, b: 0.141, a: 1.0 };
