// Color themes
//
// Two built-in palettes selected by name from config. Unknown names fall
// back to dark.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub border: Color,
    /// Focused borders, toast and modal frames
    pub highlight: Color,
    pub background: Color,
    pub foreground: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub muted: Color,
    pub liked: Color,
    pub author: Color,
    pub admin: Color,
    pub error: Color,
    pub warn: Color,
    pub status_bar: Color,
    pub border_type: BorderType,
}

impl Theme {
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            title: Color::Cyan,
            border: Color::DarkGray,
            highlight: Color::LightCyan,
            background: Color::Reset,
            foreground: Color::White,
            selection: Color::Rgb(40, 60, 90),
            selection_fg: Color::White,
            muted: Color::Gray,
            liked: Color::LightRed,
            author: Color::LightYellow,
            admin: Color::LightMagenta,
            error: Color::Red,
            warn: Color::Yellow,
            status_bar: Color::Gray,
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            title: Color::Blue,
            border: Color::Gray,
            highlight: Color::Blue,
            background: Color::Reset,
            foreground: Color::Black,
            selection: Color::Rgb(210, 225, 245),
            selection_fg: Color::Black,
            muted: Color::DarkGray,
            liked: Color::Red,
            author: Color::Rgb(150, 90, 0),
            admin: Color::Magenta,
            error: Color::Red,
            warn: Color::Rgb(180, 120, 0),
            status_bar: Color::DarkGray,
            border_type: BorderType::Plain,
        }
    }
}
