use anstyle::{AnsiColor, Color as AnsiStyleColor, Effects, RgbColor, Style};
use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2);
pub const MARKED: Color = Color::Green;
pub const DIM: Color = Color::DarkGray;
pub const CATEGORY: Color = Color::Gray;

pub const TOOLBAR_BG: Color = Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2);
pub const TOOLBAR_KEY_BG: Color = Color::Rgb(40, 40, 40);
pub const TOOLBAR_KEY_FG: Color = Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2);
pub const TOOLBAR_DESC: Color = Color::Black;

/// Raw RGB tuple shared by the picker and terminal output
pub const ACCENT_RGB: (u8, u8, u8) = (207, 106, 76);

/// Action names and catalog stems in terminal output
pub const NAME: Style = Style::new().fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::BrightGreen)));
/// Titles and commands in terminal output
pub const GRAY: Style = Style::new().fg_color(Some(AnsiStyleColor::Ansi256(anstyle::Ansi256Color(243))));
/// Run header lines
pub const HEADER: Style = Style::new()
    .fg_color(Some(AnsiStyleColor::Rgb(RgbColor(
        ACCENT_RGB.0,
        ACCENT_RGB.1,
        ACCENT_RGB.2,
    ))))
    .effects(Effects::BOLD);
pub const WARNING: Style = Style::new()
    .fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::Yellow)))
    .effects(Effects::BOLD);
pub const ERROR: Style = Style::new()
    .fg_color(Some(AnsiStyleColor::Ansi(AnsiColor::Red)))
    .effects(Effects::BOLD);

/// Wrap `text` in `style` when `color` is set
#[must_use]
pub fn paint(style: Style, text: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{style:#}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_plain_without_color() {
        assert_eq!(paint(NAME, "disk", false), "disk");
    }

    #[test]
    fn test_paint_resets_after_text() {
        let painted = paint(ERROR, "boom", true);
        assert!(painted.starts_with("\x1b["));
        assert!(painted.contains("boom"));
        assert!(painted.ends_with("\x1b[0m"));
    }
}
