use gitscope_graph::Rgb;
use ratatui::style::Color;
use ratatui::widgets::block::BorderType;

// Panel colors
pub const FOCUSED: Color = Color::Green;
pub const CANVAS_BG: Color = Color::Rgb(0x01, 0x04, 0x09);

// Border style
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

// Text colors
pub const LABEL: Color = Color::White;
pub const MUTED: Color = Color::DarkGray;
pub const NAV_BUTTON_BG: Color = Color::DarkGray;

pub const fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}
