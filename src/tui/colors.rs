//! Card colours, one per status style token.

use ratatui::style::Color;

use crate::fields::Status;

/// Used for completed cards
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for in-process cards
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for abandoned cards
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Used for cards without a picked status
pub const SLATE: Color = Color::Rgb(60, 60, 72);
/// Header and status bar
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Background colour for a card's style token.
pub fn card_color(style: Status) -> Color {
    match style.style_token() {
        "completed" => DARK_GREEN,
        "abandoned" => DARK_RED,
        "in-process" => GOLD,
        "no-status" => SLATE,
        _ => Color::DarkGray,
    }
}

/// Readable foreground on top of [`card_color`].
pub fn card_text_color(style: Status) -> Color {
    match card_color(style) {
        GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
